//! Forearm twist distribution.

use autorig_skeleton::{CopyRotation, LimbKind, RigConfig, RigResult, Side, Skeleton, Space};

use crate::binder::upsert_constraint;
use crate::collaborators::{SkinWeightService, WeightTransfer};
use crate::names;

/// Influence of sub-bone `index` (zero-based) in a chain of `count`.
pub fn twist_influence(index: usize, count: usize, max_influence: f64) -> f64 {
    (index + 1) as f64 * (max_influence / count as f64)
}

/// Splits the lower arm with default settings.
pub fn synthesize_twist(
    skeleton: &mut Skeleton,
    side: Side,
    weights: &mut dyn SkinWeightService,
) -> RigResult<Vec<String>> {
    synthesize_twist_with(skeleton, side, weights, &RigConfig::default())
}

/// Splits `LowerArm_{Side}` into equal deforming sub-bones that take over its
/// skin weights, each copying a growing share of the next bone's twist.
///
/// The last sub-bone follows `Hand_{Side}`. Returns the sub-bone names.
pub fn synthesize_twist_with(
    skeleton: &mut Skeleton,
    side: Side,
    weights: &mut dyn SkinWeightService,
    config: &RigConfig,
) -> RigResult<Vec<String>> {
    let arm_name = names::lower_limb(LimbKind::Arm, side);
    let hand_name = names::hand(side);
    let count = config.twist.segments;

    let arm = skeleton.require(&arm_name)?;
    skeleton.require(&hand_name)?;
    arm.direction()?;
    let head = arm.head();
    let step = arm.vector() / count as f64;

    let segments: Vec<String> = (1..=count).map(|n| names::twist_segment(n, side)).collect();

    {
        let mut edit = skeleton.edit();
        for (i, name) in segments.iter().enumerate() {
            let segment_head = head + step * i as f64;
            edit.place_bone(name, segment_head, segment_head + step, Some(&arm_name))?;
            edit.set_deform(name, true)?;
        }
        edit.set_deform(&arm_name, false)?;
    }

    for (i, name) in segments.iter().enumerate() {
        let target = segments.get(i + 1).unwrap_or(&hand_name);
        let influence = twist_influence(i, count, config.twist.max_influence);
        upsert_constraint::<CopyRotation, _>(skeleton, name, names::TWIST_FOLLOW, |c| {
            c.target = Some(target.clone());
            c.use_x = false;
            c.use_y = true;
            c.use_z = false;
            c.owner_space = Space::Local;
            c.target_space = Space::Local;
        })?
        .set_influence(influence);
        tracing::debug!(bone = %name, target = %target, influence, "twist follow");
    }

    for name in &segments {
        skeleton
            .bone_mut(name)?
            .set_layer(config.layers.auxiliary)?;
    }

    weights.transfer_weights(
        skeleton,
        &WeightTransfer {
            source: arm_name.clone(),
            targets: segments.clone(),
        },
    )?;

    tracing::info!(%side, segments = count, "synthesized twist chain");
    Ok(segments)
}
