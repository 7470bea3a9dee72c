//! Vector algebra for limb rigs.
//!
//! Host frame: right-handed, Z up, the character faces -Y and its left side
//! is +X.

use std::f64::consts::{FRAC_PI_2, PI};

use autorig_skeleton::{LimbKind, RigError, RigResult, Side, Vec3};
use nalgebra::{Unit, UnitQuaternion};

/// Below this norm a cross product counts as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Reference frame of a limb at rest: the limb axis and the bend-plane normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbFrame {
    pub axis: Vec3,
    pub normal: Vec3,
}

/// Returns the rest frame for a limb kind and side.
pub fn limb_frame(kind: LimbKind, side: Side) -> LimbFrame {
    match (kind, side) {
        (LimbKind::Arm, Side::Left) => LimbFrame {
            axis: Vec3::x(),
            normal: -Vec3::z(),
        },
        (LimbKind::Arm, Side::Right) => LimbFrame {
            axis: -Vec3::x(),
            normal: Vec3::z(),
        },
        (LimbKind::Leg, _) => LimbFrame {
            axis: -Vec3::z(),
            normal: Vec3::x(),
        },
    }
}

/// Normal of the plane spanned by `upper` and `lower`.
///
/// Fails when the vectors are parallel or either one is zero.
pub fn bend_normal(upper: &Vec3, lower: &Vec3) -> RigResult<Vec3> {
    let normal = upper.cross(lower);
    if normal.norm() <= PARALLEL_EPSILON {
        return Err(RigError::degenerate(
            "upper and lower limb vectors are parallel",
        ));
    }
    Ok(normal)
}

/// Computes the unit pole direction for a two-bone limb.
///
/// The rest pole (the reference normal turned 90 degrees about the limb axis)
/// is carried by the rotation taking the reference normal onto the actual bend
/// normal, so the pole turns with the bend plane. A bend normal exactly
/// opposite the reference normal is reached by a half turn about the limb
/// axis. The result is perpendicular to the bend normal.
pub fn pole_direction(upper: &Vec3, lower: &Vec3, kind: LimbKind, side: Side) -> RigResult<Vec3> {
    let frame = limb_frame(kind, side);
    let normal = bend_normal(upper, lower)?.normalize();
    let axis = Unit::new_normalize(frame.axis);

    let rest_pole = UnitQuaternion::from_axis_angle(&axis, FRAC_PI_2) * frame.normal;
    let align = UnitQuaternion::rotation_between(&frame.normal, &normal)
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&axis, PI));

    let direction = align * rest_pole;
    tracing::debug!(?kind, ?side, ?normal, ?direction, "pole direction");
    Ok(direction)
}

/// Sign of the lower bone's ground-plane cross product against +Y.
///
/// `(x, y) x (0, 1)` reduces to `x`, so this is true when the lower limb
/// points towards +X.
pub fn points_positive_x(lower: &Vec3) -> bool {
    lower.x > 0.0
}
