//! Full humanoid rigging pass.

use autorig_skeleton::{LimbKind, RigConfig, RigResult, Side, Skeleton};
use autorig_synth::{
    enable_spring_bones_with, symmetrize_names, synthesize_hands_with, synthesize_limb_ik_with,
    synthesize_shoulder_with, synthesize_twist_with, SkinWeightService,
};

/// Runs every synthesizer in the order a host add-on applies them:
/// symmetrize, fingers, arm and leg IK, forearm twist, shoulders, springs.
pub fn rig_humanoid(
    skeleton: &mut Skeleton,
    weights: &mut dyn SkinWeightService,
    config: &RigConfig,
) -> RigResult<()> {
    symmetrize_names(skeleton)?;
    synthesize_hands_with(skeleton, config)?;
    for kind in [LimbKind::Arm, LimbKind::Leg] {
        for side in Side::ALL {
            synthesize_limb_ik_with(skeleton, kind, side, config)?;
        }
    }
    for side in Side::ALL {
        synthesize_twist_with(skeleton, side, weights, config)?;
        synthesize_shoulder_with(skeleton, side, config)?;
    }
    enable_spring_bones_with(skeleton, &config.spring)?;
    Ok(())
}
