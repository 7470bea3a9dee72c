//! Shoulder follow controller.
//!
//! A twist bone is inserted above the shoulder and tracks a control bone
//! carried by the hand, so the shoulder partially follows arm movement.

use autorig_skeleton::{DampedTrack, LimbKind, RigConfig, RigResult, Side, Skeleton, Vec3};

use crate::binder::upsert_constraint;
use crate::names;

/// Bones produced for one shoulder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoulderRig {
    pub twist: String,
    pub control: String,
}

/// Synthesizes a shoulder controller with default settings.
pub fn synthesize_shoulder(skeleton: &mut Skeleton, side: Side) -> RigResult<ShoulderRig> {
    synthesize_shoulder_with(skeleton, side, &RigConfig::default())
}

/// Inserts `ShoulderTwist_{Side}` between the shoulder and its original
/// parent and makes it track `ShoulderCtrl_{Side}`, which hangs off the hand.
///
/// On re-runs the twist bone's own parent is taken as the original parent,
/// so the hierarchy does not grow.
pub fn synthesize_shoulder_with(
    skeleton: &mut Skeleton,
    side: Side,
    config: &RigConfig,
) -> RigResult<ShoulderRig> {
    let shoulder_name = names::shoulder(side);
    let upper_arm_name = names::upper_limb(LimbKind::Arm, side);
    let hand_name = names::hand(side);
    let twist_name = names::shoulder_twist(side);
    let control_name = names::shoulder_control(side);

    let shoulder = skeleton.require(&shoulder_name)?;
    let upper_arm_head = skeleton.require(&upper_arm_name)?.head();
    skeleton.require(&hand_name)?;

    let direction = shoulder.direction()?;
    let shoulder_head = shoulder.head();
    let shoulder_tail = shoulder.tail();
    let twist_tail = shoulder_head + direction * (shoulder.length() * config.shoulder.twist_ratio);

    let original_parent = match skeleton.bone(&twist_name) {
        Some(twist) => twist.parent().map(str::to_string),
        None => shoulder.parent().map(str::to_string),
    };

    let gap = (upper_arm_head - shoulder_tail).norm();
    let control_head = shoulder_tail + direction * gap;
    let control_tail = control_head + Vec3::z() * config.shoulder.control_length;

    {
        let mut edit = skeleton.edit();
        edit.place_bone(&twist_name, shoulder_head, twist_tail, original_parent.as_deref())?;
        edit.set_parent(&shoulder_name, Some(&twist_name))?;
        edit.place_bone(&control_name, control_head, control_tail, Some(&hand_name))?;
    }
    skeleton
        .bone_mut(&twist_name)?
        .set_layer(config.layers.auxiliary)?;
    skeleton
        .bone_mut(&control_name)?
        .set_layer(config.layers.control)?;

    upsert_constraint::<DampedTrack, _>(skeleton, &twist_name, names::SHOULDER_TRACK, |c| {
        c.target = Some(control_name.clone());
    })?
    .set_influence(config.shoulder.track_influence);

    tracing::info!(
        %side,
        twist = %twist_name,
        control = %control_name,
        parent = ?original_parent,
        "synthesized shoulder controller"
    );
    Ok(ShoulderRig {
        twist: twist_name,
        control: control_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use autorig_skeleton::TrackAxis;
    use pretty_assertions::assert_eq;

    fn torso() -> Skeleton {
        let mut skeleton = Skeleton::new();
        {
            let mut edit = skeleton.edit();
            edit.add_bone("Chest", Vec3::new(0.0, 0.0, 1.2), Vec3::new(0.0, 0.0, 1.4), None)
                .unwrap();
            edit.add_bone(
                "Shoulder_L",
                Vec3::new(0.02, 0.0, 1.4),
                Vec3::new(0.12, 0.0, 1.4),
                Some("Chest"),
            )
            .unwrap();
            edit.add_bone(
                "UpperArm_L",
                Vec3::new(0.15, 0.0, 1.4),
                Vec3::new(0.4, 0.0, 1.4),
                Some("Shoulder_L"),
            )
            .unwrap();
            edit.add_bone(
                "Hand_L",
                Vec3::new(0.65, 0.0, 1.4),
                Vec3::new(0.75, 0.0, 1.4),
                Some("UpperArm_L"),
            )
            .unwrap();
        }
        skeleton
    }

    #[test]
    fn test_twist_inserted() {
        let mut skeleton = torso();
        let rig = synthesize_shoulder(&mut skeleton, Side::Left).unwrap();
        let twist = skeleton.bone(&rig.twist).unwrap();
        assert_eq!(twist.parent(), Some("Chest"));
        assert_relative_eq!(twist.head(), Vec3::new(0.02, 0.0, 1.4));
        assert_relative_eq!(twist.length(), 0.07, epsilon = 1e-12);
        assert_eq!(
            skeleton.bone("Shoulder_L").unwrap().parent(),
            Some("ShoulderTwist_L")
        );
    }

    #[test]
    fn test_control_placement() {
        let mut skeleton = torso();
        let rig = synthesize_shoulder(&mut skeleton, Side::Left).unwrap();
        let control = skeleton.bone(&rig.control).unwrap();
        assert_eq!(control.parent(), Some("Hand_L"));
        assert_relative_eq!(control.head(), Vec3::new(0.15, 0.0, 1.4), epsilon = 1e-12);
        assert_relative_eq!(control.tail(), Vec3::new(0.15, 0.0, 1.45), epsilon = 1e-12);

        let track = skeleton
            .bone(&rig.twist)
            .unwrap()
            .constraint(names::SHOULDER_TRACK)
            .unwrap();
        assert_relative_eq!(track.influence, 0.5);
        let params = track.params::<DampedTrack>().unwrap();
        assert_eq!(params.target.as_deref(), Some("ShoulderCtrl_L"));
        assert_eq!(params.track_axis, TrackAxis::PosY);
    }

    #[test]
    fn test_rerun_keeps_hierarchy() {
        let mut skeleton = torso();
        synthesize_shoulder(&mut skeleton, Side::Left).unwrap();
        let first = skeleton.clone();
        synthesize_shoulder(&mut skeleton, Side::Left).unwrap();
        assert_eq!(skeleton, first);
        assert_eq!(
            skeleton.ancestors("Shoulder_L").unwrap(),
            vec!["ShoulderTwist_L", "Chest"]
        );
    }
}
