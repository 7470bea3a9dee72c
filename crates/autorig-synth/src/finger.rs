//! Finger controller synthesis.
//!
//! One control bone per finger drives a three-joint curl: the base segment
//! copies the control's rotation, the tip copies the middle segment, and
//! squeezing the control along Y drives the middle segment's bend through a
//! scripted driver.

use autorig_skeleton::naming::finger_segment;
use autorig_skeleton::{
    AxisBound, AxisBounds, BendingAxis, CopyRotation, CustomShape, Finger, LimitScale,
    QuaternionChannel, RigConfig, RigError, RigResult, ShapeBinding, Side, Skeleton, Space,
    TransformChannel, Vec3,
};

use crate::binder::{set_driver, upsert_constraint};
use crate::names;

/// Driver expression mapping control Y scale to a quaternion component.
///
/// Zero at rest scale, one in magnitude at half scale, negated for negative
/// axes.
pub fn finger_expression(axis: BendingAxis) -> String {
    let base = format!("({} - 1) * 2", names::DRIVER_VARIABLE);
    if axis.is_negative() {
        format!("-{}", base)
    } else {
        base
    }
}

/// Quaternion component driven for a bending axis.
pub fn bending_channel(axis: BendingAxis) -> QuaternionChannel {
    match axis.quaternion_index() {
        1 => QuaternionChannel::X,
        2 => QuaternionChannel::Y,
        _ => QuaternionChannel::Z,
    }
}

/// Default bending axes applied by [`synthesize_hands`].
pub fn default_bending_axis(finger: Finger, side: Side) -> BendingAxis {
    match (finger, side) {
        (Finger::Thumb, Side::Left) => BendingAxis::NegZ,
        (Finger::Thumb, Side::Right) => BendingAxis::PosZ,
        _ => BendingAxis::PosX,
    }
}

/// Synthesizes a finger controller with default settings.
pub fn synthesize_finger(
    skeleton: &mut Skeleton,
    finger: Finger,
    side: Side,
    axis: BendingAxis,
) -> RigResult<String> {
    synthesize_finger_with(skeleton, finger, side, axis, &RigConfig::default())
}

/// Synthesizes the controller for one finger.
///
/// Requires `{Finger}1..3_{Side}` and `Hand_{Side}`. Creates or updates
/// `{Finger}Ctrl_{Side}` and returns its name.
pub fn synthesize_finger_with(
    skeleton: &mut Skeleton,
    finger: Finger,
    side: Side,
    axis: BendingAxis,
    config: &RigConfig,
) -> RigResult<String> {
    let segments: [String; 3] = [1, 2, 3].map(|i| finger_segment(finger, i, side));
    let hand = names::hand(side);
    let control = names::finger_control(finger, side);

    for name in segments.iter().chain([&hand]) {
        skeleton.require(name)?;
    }

    let base_head = skeleton.require(&segments[0])?.head();
    let tip_tail = skeleton.require(&segments[2])?.tail();
    let span = tip_tail - base_head;
    if span.norm() <= f64::EPSILON {
        return Err(RigError::degenerate(format!(
            "finger '{}' has zero span",
            segments[0]
        )));
    }
    let tail = base_head + span * config.finger.control_scale;

    {
        let mut edit = skeleton.edit();
        edit.place_bone(&control, base_head, tail, Some(&hand))?;
    }

    let rotation = if axis.is_z() {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        Vec3::zeros()
    };
    let control_bone = skeleton.bone_mut(&control)?;
    control_bone.custom_shape =
        Some(ShapeBinding::new(CustomShape::FingerControl).with_rotation(rotation));
    control_bone.set_layer(config.layers.control)?;

    for (owner, target) in [(&segments[2], &segments[1]), (&segments[0], &control)] {
        upsert_constraint::<CopyRotation, _>(skeleton, owner, names::BENDING_FOLLOW, |c| {
            c.target = Some(target.to_string());
            c.owner_space = Space::Local;
            c.target_space = Space::Local;
        })?;
    }

    let min_scale_y = config.finger.min_scale_y;
    upsert_constraint::<LimitScale, _>(skeleton, &control, names::SCALE_LIMIT, |c| {
        c.min = AxisBounds {
            x: AxisBound::at(1.0),
            y: AxisBound::at(min_scale_y),
            z: AxisBound::at(1.0),
        };
        c.max = AxisBounds::uniform(AxisBound::at(1.0));
        c.owner_space = Space::Local;
    })?;

    set_driver(
        skeleton,
        &segments[1],
        bending_channel(axis),
        &control,
        TransformChannel::ScaleY,
        &finger_expression(axis),
    )?;

    for segment in &segments {
        skeleton
            .bone_mut(segment)?
            .set_layer(config.layers.auxiliary)?;
    }

    tracing::info!(%finger, %side, %axis, control = %control, "synthesized finger controller");
    Ok(control)
}

/// Synthesizes every finger on both hands with the default axes.
pub fn synthesize_hands(skeleton: &mut Skeleton) -> RigResult<Vec<String>> {
    synthesize_hands_with(skeleton, &RigConfig::default())
}

/// Synthesizes both thumbs, then the remaining fingers side by side.
///
/// Stops at the first failing finger; controllers already synthesized stay.
pub fn synthesize_hands_with(
    skeleton: &mut Skeleton,
    config: &RigConfig,
) -> RigResult<Vec<String>> {
    let mut order = Vec::new();
    for side in Side::ALL {
        order.push((Finger::Thumb, side));
    }
    for side in Side::ALL {
        for finger in &Finger::ALL[1..] {
            order.push((*finger, side));
        }
    }

    let mut controls = Vec::with_capacity(order.len());
    for (finger, side) in order {
        let axis = default_bending_axis(finger, side);
        controls.push(synthesize_finger_with(skeleton, finger, side, axis, config)?);
    }
    Ok(controls)
}
