//! Canonical bone naming: `{Part}{Index}_{Side}`.
//!
//! After symmetrization every humanoid bone is addressable through these
//! helpers (e.g. `Index1_L`, `Hand_R`, `LowerArm_L`, `Root`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name of the skeleton root bone.
pub const ROOT_BONE: &str = "Root";

/// Body side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Character's left (+X).
    #[serde(rename = "L")]
    Left,
    /// Character's right (-X).
    #[serde(rename = "R")]
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Returns the suffix letter used in bone names.
    pub fn letter(&self) -> &'static str {
        match self {
            Side::Left => "L",
            Side::Right => "R",
        }
    }

    /// Returns the opposite side.
    pub fn mirror(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for Side {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "l" => Ok(Side::Left),
            "R" | "r" => Ok(Side::Right),
            _ => Err(ParseNameError::new("side", s)),
        }
    }
}

/// Finger identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    /// All fingers, thumb first.
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    /// Returns the part name used in bone names.
    pub fn part(&self) -> &'static str {
        match self {
            Finger::Thumb => "Thumb",
            Finger::Index => "Index",
            Finger::Middle => "Middle",
            Finger::Ring => "Ring",
            Finger::Little => "Little",
        }
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.part())
    }
}

impl FromStr for Finger {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Finger::ALL
            .into_iter()
            .find(|finger| finger.part().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError::new("finger", s))
    }
}

/// Limb kinds handled by the IK synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimbKind {
    Arm,
    Leg,
}

impl LimbKind {
    /// Returns the part name used in bone names.
    pub fn part(&self) -> &'static str {
        match self {
            LimbKind::Arm => "Arm",
            LimbKind::Leg => "Leg",
        }
    }
}

impl fmt::Display for LimbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.part())
    }
}

impl FromStr for LimbKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Arm" | "arm" => Ok(LimbKind::Arm),
            "Leg" | "leg" => Ok(LimbKind::Leg),
            _ => Err(ParseNameError::new("limb kind", s)),
        }
    }
}

/// Local axis a finger bends around, with sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendingAxis {
    #[serde(rename = "X")]
    PosX,
    #[serde(rename = "-X")]
    NegX,
    #[serde(rename = "Y")]
    PosY,
    #[serde(rename = "-Y")]
    NegY,
    #[serde(rename = "Z")]
    PosZ,
    #[serde(rename = "-Z")]
    NegZ,
}

impl BendingAxis {
    /// Returns the rotation quaternion component index (1 = X, 2 = Y, 3 = Z).
    pub fn quaternion_index(&self) -> usize {
        match self {
            BendingAxis::PosX | BendingAxis::NegX => 1,
            BendingAxis::PosY | BendingAxis::NegY => 2,
            BendingAxis::PosZ | BendingAxis::NegZ => 3,
        }
    }

    /// Returns true for the negative axes.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            BendingAxis::NegX | BendingAxis::NegY | BendingAxis::NegZ
        )
    }

    /// Returns true for Z and -Z.
    pub fn is_z(&self) -> bool {
        matches!(self, BendingAxis::PosZ | BendingAxis::NegZ)
    }

    /// Returns the axis as written in rig commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            BendingAxis::PosX => "X",
            BendingAxis::NegX => "-X",
            BendingAxis::PosY => "Y",
            BendingAxis::NegY => "-Y",
            BendingAxis::PosZ => "Z",
            BendingAxis::NegZ => "-Z",
        }
    }
}

impl fmt::Display for BendingAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BendingAxis {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" => Ok(BendingAxis::PosX),
            "-X" => Ok(BendingAxis::NegX),
            "Y" => Ok(BendingAxis::PosY),
            "-Y" => Ok(BendingAxis::NegY),
            "Z" => Ok(BendingAxis::PosZ),
            "-Z" => Ok(BendingAxis::NegZ),
            _ => Err(ParseNameError::new("bending axis", s)),
        }
    }
}

/// Error returned when a naming token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{value}'")]
pub struct ParseNameError {
    kind: &'static str,
    value: String,
}

impl ParseNameError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Builds `{part}_{side}`.
pub fn sided(part: &str, side: Side) -> String {
    format!("{}_{}", part, side.letter())
}

/// Builds `{part}{index}_{side}`.
pub fn indexed(part: &str, index: usize, side: Side) -> String {
    format!("{}{}_{}", part, index, side.letter())
}

/// Builds a finger segment name, e.g. `Index2_L`.
pub fn finger_segment(finger: Finger, segment: usize, side: Side) -> String {
    indexed(finger.part(), segment, side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_builders() {
        assert_eq!(sided("Hand", Side::Left), "Hand_L");
        assert_eq!(indexed("LowerArm", 3, Side::Right), "LowerArm3_R");
        assert_eq!(finger_segment(Finger::Thumb, 1, Side::Left), "Thumb1_L");
    }

    #[test]
    fn test_bending_axis() {
        let axis: BendingAxis = "-Z".parse().unwrap();
        assert_eq!(axis, BendingAxis::NegZ);
        assert_eq!(axis.quaternion_index(), 3);
        assert!(axis.is_negative());
        assert!(axis.is_z());
        assert_eq!(BendingAxis::PosX.quaternion_index(), 1);
        assert!(!BendingAxis::PosY.is_negative());
        assert!("W".parse::<BendingAxis>().is_err());

        let json = serde_json::to_string(&BendingAxis::NegX).unwrap();
        assert_eq!(json, "\"-X\"");
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("L".parse::<Side>().unwrap(), Side::Left);
        assert_eq!("little".parse::<Finger>().unwrap(), Finger::Little);
        assert_eq!("Leg".parse::<LimbKind>().unwrap(), LimbKind::Leg);
        assert_eq!(
            "Pinky".parse::<Finger>().unwrap_err().to_string(),
            "invalid finger 'Pinky'"
        );
        assert_eq!(Side::Left.mirror(), Side::Right);
        assert_eq!(serde_json::to_string(&Side::Right).unwrap(), "\"R\"");
    }
}
