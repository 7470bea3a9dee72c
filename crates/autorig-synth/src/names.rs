//! Constraint names and synthesized bone names.
//!
//! Constraint names are the idempotency keys: re-running a synthesizer finds
//! the constraint by `(bone, name)` and updates it in place.

use autorig_skeleton::naming::{indexed, sided};
use autorig_skeleton::{Finger, LimbKind, Side};

pub const BENDING_FOLLOW: &str = "AUTORIG_BendingFollow";
pub const SCALE_LIMIT: &str = "AUTORIG_ScaleLimit";
pub const LIMB_IK: &str = "AUTORIG_LimbIK";
pub const FOLLOW_IK: &str = "AUTORIG_FollowIK";
pub const ROTATION_LOCK: &str = "AUTORIG_RotationLock";
pub const TWIST_FOLLOW: &str = "AUTORIG_TwistFollow";
pub const SHOULDER_TRACK: &str = "AUTORIG_ShoulderTrack";

/// Driver variable name used by finger drivers.
pub const DRIVER_VARIABLE: &str = "var";

pub fn hand(side: Side) -> String {
    sided("Hand", side)
}

pub fn finger_control(finger: Finger, side: Side) -> String {
    sided(&format!("{}Ctrl", finger.part()), side)
}

pub fn upper_limb(kind: LimbKind, side: Side) -> String {
    sided(&format!("Upper{}", kind.part()), side)
}

pub fn lower_limb(kind: LimbKind, side: Side) -> String {
    sided(&format!("Lower{}", kind.part()), side)
}

pub fn limb_ik(kind: LimbKind, side: Side) -> String {
    sided(&format!("{}IK", kind.part()), side)
}

pub fn limb_pole(kind: LimbKind, side: Side) -> String {
    sided(&format!("{}Pole", kind.part()), side)
}

pub fn twist_segment(index: usize, side: Side) -> String {
    indexed("LowerArm", index, side)
}

pub fn shoulder(side: Side) -> String {
    sided("Shoulder", side)
}

pub fn shoulder_twist(side: Side) -> String {
    sided("ShoulderTwist", side)
}

pub fn shoulder_control(side: Side) -> String {
    sided("ShoulderCtrl", side)
}
