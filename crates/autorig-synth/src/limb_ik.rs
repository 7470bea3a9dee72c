//! Two-bone limb IK synthesis.
//!
//! Places an IK target at the end of the lower limb and a pole bone off the
//! bend plane, then wires an IK constraint on the lower limb. Arms also get
//! the hand following the IK target; leg IK targets are rotation-locked.

use autorig_skeleton::naming::finger_segment;
use autorig_skeleton::{
    CopyTransforms, CustomShape, Finger, Ik, LimbKind, LimitRotation, RigConfig, RigResult,
    RotationLimit, ShapeBinding, Side, Skeleton, Space, Vec3, ROOT_BONE,
};

use crate::binder::upsert_constraint;
use crate::geometry::{points_positive_x, pole_direction};
use crate::names;

/// Bones and pole angle produced for one limb.
#[derive(Debug, Clone, PartialEq)]
pub struct LimbIkRig {
    pub ik: String,
    pub pole: String,
    /// Pole angle in radians.
    pub pole_angle: f64,
}

/// Smallest distance from `wrist` to a finger base head on `side`.
fn finger_reach(skeleton: &Skeleton, wrist: &Vec3, side: Side) -> Option<f64> {
    Finger::ALL
        .iter()
        .filter_map(|finger| skeleton.bone(&finger_segment(*finger, 1, side)))
        .map(|bone| (bone.head() - wrist).norm())
        .filter(|distance| *distance > f64::EPSILON)
        .min_by(|a, b| a.total_cmp(b))
}

/// Pole angle for a limb, in degrees.
fn pole_angle_degrees(kind: LimbKind, lower: &Vec3, config: &RigConfig) -> f64 {
    match kind {
        LimbKind::Arm if points_positive_x(lower) => config.limb.arm_pole_angle_pos,
        LimbKind::Arm => config.limb.arm_pole_angle_neg,
        LimbKind::Leg => config.limb.leg_pole_angle,
    }
}

/// Synthesizes a limb IK rig with default settings.
pub fn synthesize_limb_ik(
    skeleton: &mut Skeleton,
    kind: LimbKind,
    side: Side,
) -> RigResult<LimbIkRig> {
    synthesize_limb_ik_with(skeleton, kind, side, &RigConfig::default())
}

/// Synthesizes the IK target, pole and constraints for one limb.
///
/// Requires `Root`, `Upper{Kind}_{Side}` and `Lower{Kind}_{Side}`, plus
/// `Hand_{Side}` for arms. Fails with a degenerate geometry error when the
/// upper and lower limb are parallel.
pub fn synthesize_limb_ik_with(
    skeleton: &mut Skeleton,
    kind: LimbKind,
    side: Side,
    config: &RigConfig,
) -> RigResult<LimbIkRig> {
    let upper_name = names::upper_limb(kind, side);
    let lower_name = names::lower_limb(kind, side);
    let ik_name = names::limb_ik(kind, side);
    let pole_name = names::limb_pole(kind, side);
    let hand_name = names::hand(side);

    skeleton.require(ROOT_BONE)?;
    let upper = skeleton.require(&upper_name)?;
    let lower = skeleton.require(&lower_name)?;
    if kind == LimbKind::Arm {
        skeleton.require(&hand_name)?;
    }

    let upper_vector = upper.vector();
    let upper_length = upper.length();
    let lower_vector = lower.vector();
    let pole_dir = pole_direction(&upper_vector, &lower_vector, kind, side)?;
    let lower_dir = lower.direction()?;
    let joint = lower.head();
    let wrist = lower.tail();

    let ik_size = match kind {
        LimbKind::Arm => finger_reach(skeleton, &wrist, side).unwrap_or_else(|| {
            tracing::warn!(
                %side,
                size = config.limb.fallback_arm_ik_size,
                "no finger base bones found, using fallback arm IK size"
            );
            config.limb.fallback_arm_ik_size
        }),
        LimbKind::Leg => config.limb.leg_ik_size,
    };

    let ik_tail = wrist + lower_dir * ik_size;
    let pole_head = joint + pole_dir * (config.limb.pole_distance_factor * upper_length);
    let pole_tail = pole_head + pole_dir * config.limb.pole_length;
    let pole_angle = pole_angle_degrees(kind, &lower_vector, config).to_radians();

    {
        let mut edit = skeleton.edit();
        edit.place_bone(&ik_name, wrist, ik_tail, Some(ROOT_BONE))?;
        edit.place_bone(&pole_name, pole_head, pole_tail, Some(ROOT_BONE))?;
    }
    for name in [&ik_name, &pole_name] {
        skeleton.bone_mut(name)?.set_layer(config.layers.control)?;
    }

    let chain_count = config.limb.chain_count;
    upsert_constraint::<Ik, _>(skeleton, &lower_name, names::LIMB_IK, |c| {
        c.target = Some(ik_name.clone());
        c.pole_target = Some(pole_name.clone());
        c.chain_count = chain_count;
        c.pole_angle = pole_angle;
    })?;

    match kind {
        LimbKind::Arm => {
            upsert_constraint::<CopyTransforms, _>(skeleton, &hand_name, names::FOLLOW_IK, |c| {
                c.target = Some(ik_name.clone());
                c.owner_space = Space::Local;
                c.target_space = Space::Local;
            })?;
            skeleton
                .bone_mut(&hand_name)?
                .set_layer(config.layers.auxiliary)?;
            skeleton.bone_mut(&ik_name)?.custom_shape =
                Some(ShapeBinding::new(CustomShape::IkTarget));
            skeleton.bone_mut(&pole_name)?.custom_shape = Some(ShapeBinding::new(CustomShape::Pole));
        }
        LimbKind::Leg => {
            upsert_constraint::<LimitRotation, _>(skeleton, &ik_name, names::ROTATION_LOCK, |c| {
                c.x = RotationLimit::locked();
                c.y = RotationLimit::locked();
                c.z = RotationLimit::locked();
            })?;
        }
    }

    tracing::info!(
        %kind,
        %side,
        ik = %ik_name,
        pole = %pole_name,
        ik_size,
        pole_angle,
        "synthesized limb IK"
    );
    Ok(LimbIkRig {
        ik: ik_name,
        pole: pole_name,
        pole_angle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use autorig_skeleton::RigError;
    use pretty_assertions::assert_eq;

    fn arm_skeleton(lower_tail: Vec3) -> Skeleton {
        let mut skeleton = Skeleton::new();
        {
            let mut edit = skeleton.edit();
            edit.add_bone(ROOT_BONE, Vec3::zeros(), Vec3::z() * 0.1, None)
                .unwrap();
            edit.add_bone(
                "UpperArm_L",
                Vec3::new(0.2, 0.0, 1.4),
                Vec3::new(0.5, 0.0, 1.4),
                Some(ROOT_BONE),
            )
            .unwrap();
            edit.add_bone(
                "LowerArm_L",
                Vec3::new(0.5, 0.0, 1.4),
                lower_tail,
                Some("UpperArm_L"),
            )
            .unwrap();
            edit.add_bone("Hand_L", lower_tail, lower_tail + Vec3::x() * 0.1, Some("LowerArm_L"))
                .unwrap();
        }
        skeleton
    }

    #[test]
    fn test_arm_rig() {
        let tail = Vec3::new(0.8, 0.02, 1.4);
        let mut skeleton = arm_skeleton(tail);
        let rig = synthesize_limb_ik(&mut skeleton, LimbKind::Arm, Side::Left).unwrap();
        assert_eq!(rig.ik, "ArmIK_L");
        assert_relative_eq!(rig.pole_angle, std::f64::consts::PI, epsilon = 1e-12);

        let ik = skeleton.bone("ArmIK_L").unwrap();
        assert_eq!(ik.parent(), Some(ROOT_BONE));
        assert_relative_eq!(ik.head(), tail);
        assert_relative_eq!(ik.length(), 0.12, epsilon = 1e-12);

        let lower = skeleton.bone("LowerArm_L").unwrap();
        let params = lower.constraint(names::LIMB_IK).unwrap().params::<Ik>().unwrap();
        assert_eq!(params.chain_count, 2);
        assert_eq!(params.pole_target.as_deref(), Some("ArmPole_L"));

        let hand = skeleton.bone("Hand_L").unwrap();
        assert_eq!(hand.layer, 1);
        assert!(hand.constraint(names::FOLLOW_IK).is_some());
    }

    #[test]
    fn test_arm_ik_size_from_fingers() {
        let tail = Vec3::new(0.8, 0.02, 1.4);
        let mut skeleton = arm_skeleton(tail);
        {
            let mut edit = skeleton.edit();
            let along = |d: f64| tail + Vec3::x() * d;
            edit.add_bone("Index1_L", along(0.09), along(0.12), Some("Hand_L"))
                .unwrap();
            edit.add_bone("Thumb1_L", along(0.05), along(0.07), Some("Hand_L"))
                .unwrap();
        }
        synthesize_limb_ik(&mut skeleton, LimbKind::Arm, Side::Left).unwrap();
        assert_relative_eq!(skeleton.bone("ArmIK_L").unwrap().length(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_pole_placement() {
        let mut skeleton = arm_skeleton(Vec3::new(0.8, 0.02, 1.4));
        synthesize_limb_ik(&mut skeleton, LimbKind::Arm, Side::Left).unwrap();
        let pole = skeleton.bone("ArmPole_L").unwrap();
        let joint = Vec3::new(0.5, 0.0, 1.4);
        assert_relative_eq!((pole.head() - joint).norm(), 1.1 * 0.3, epsilon = 1e-12);
        assert_relative_eq!(pole.length(), 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_limb_fails_without_changes() {
        let mut skeleton = arm_skeleton(Vec3::new(0.8, 0.0, 1.4));
        let before = skeleton.clone();
        let err = synthesize_limb_ik(&mut skeleton, LimbKind::Arm, Side::Left).unwrap_err();
        assert!(matches!(err, RigError::DegenerateGeometry { .. }));
        assert_eq!(skeleton, before);
    }

    #[test]
    fn test_pole_angle_selection() {
        let config = RigConfig::default();
        assert_eq!(pole_angle_degrees(LimbKind::Arm, &Vec3::x(), &config), 180.0);
        assert_eq!(pole_angle_degrees(LimbKind::Arm, &-Vec3::x(), &config), 0.0);
        assert_eq!(pole_angle_degrees(LimbKind::Leg, &Vec3::x(), &config), -90.0);
    }
}
