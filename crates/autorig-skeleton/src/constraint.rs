//! Bone constraint types.
//!
//! A constraint is identified by the `(bone, name)` pair; the typed
//! parameters live in [`ConstraintKind`], one struct per constraint type.

use serde::{Deserialize, Serialize};

// =============================================================================
// Shared Types
// =============================================================================

/// Coordinate space a constraint reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    /// World space (host default).
    #[default]
    World,
    /// Bone-local space.
    Local,
}

/// Track axis options for damped track constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackAxis {
    #[serde(rename = "X")]
    PosX,
    #[serde(rename = "-X")]
    NegX,
    /// Positive Y axis (the bone's own direction).
    #[default]
    #[serde(rename = "Y")]
    PosY,
    #[serde(rename = "-Y")]
    NegY,
    #[serde(rename = "Z")]
    PosZ,
    #[serde(rename = "-Z")]
    NegZ,
}

impl TrackAxis {
    /// Returns the host track axis name.
    pub fn host_name(&self) -> &'static str {
        match self {
            TrackAxis::PosX => "TRACK_X",
            TrackAxis::NegX => "TRACK_NEGATIVE_X",
            TrackAxis::PosY => "TRACK_Y",
            TrackAxis::NegY => "TRACK_NEGATIVE_Y",
            TrackAxis::PosZ => "TRACK_Z",
            TrackAxis::NegZ => "TRACK_NEGATIVE_Z",
        }
    }
}

/// A single enable flag plus bound value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisBound {
    pub enabled: bool,
    pub value: f64,
}

impl AxisBound {
    /// Creates an enabled bound.
    pub fn at(value: f64) -> Self {
        Self {
            enabled: true,
            value,
        }
    }

    /// Creates a disabled bound that keeps `value` for later enabling.
    pub fn disabled(value: f64) -> Self {
        Self {
            enabled: false,
            value,
        }
    }
}

/// Per-axis bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisBounds {
    pub x: AxisBound,
    pub y: AxisBound,
    pub z: AxisBound,
}

impl AxisBounds {
    /// Same bound on every axis.
    pub fn uniform(bound: AxisBound) -> Self {
        Self {
            x: bound,
            y: bound,
            z: bound,
        }
    }
}

/// Rotation limit on one axis, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotationLimit {
    pub enabled: bool,
    pub min: f64,
    pub max: f64,
}

impl RotationLimit {
    /// A limit that pins the axis to zero rotation.
    pub fn locked() -> Self {
        Self {
            enabled: true,
            min: 0.0,
            max: 0.0,
        }
    }
}

// =============================================================================
// Typed Parameters
// =============================================================================

/// Copies the rotation of a target bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyRotation {
    pub target: Option<String>,
    pub use_x: bool,
    pub use_y: bool,
    pub use_z: bool,
    pub owner_space: Space,
    pub target_space: Space,
}

impl Default for CopyRotation {
    fn default() -> Self {
        Self {
            target: None,
            use_x: true,
            use_y: true,
            use_z: true,
            owner_space: Space::World,
            target_space: Space::World,
        }
    }
}

/// Copies the full transform of a target bone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyTransforms {
    pub target: Option<String>,
    pub owner_space: Space,
    pub target_space: Space,
}

/// Clamps the owner's scale per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitScale {
    pub min: AxisBounds,
    pub max: AxisBounds,
    pub owner_space: Space,
}

impl Default for LimitScale {
    fn default() -> Self {
        Self {
            min: AxisBounds::uniform(AxisBound::disabled(1.0)),
            max: AxisBounds::uniform(AxisBound::disabled(1.0)),
            owner_space: Space::World,
        }
    }
}

/// Clamps the owner's rotation per axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitRotation {
    pub x: RotationLimit,
    pub y: RotationLimit,
    pub z: RotationLimit,
    pub owner_space: Space,
}

/// Two-target inverse kinematics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ik {
    pub target: Option<String>,
    pub pole_target: Option<String>,
    /// Number of bones affected, counting the owner.
    pub chain_count: u32,
    /// Pole angle in radians.
    pub pole_angle: f64,
}

/// Points the owner's track axis at a target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DampedTrack {
    pub target: Option<String>,
    pub track_axis: TrackAxis,
}

// =============================================================================
// Constraint
// =============================================================================

/// Constraint type with its typed parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintKind {
    CopyRotation(CopyRotation),
    CopyTransforms(CopyTransforms),
    LimitScale(LimitScale),
    LimitRotation(LimitRotation),
    Ik(Ik),
    DampedTrack(DampedTrack),
}

impl ConstraintKind {
    /// Returns the type name (e.g., "CopyRotation").
    pub fn type_name(&self) -> &'static str {
        match self {
            ConstraintKind::CopyRotation(_) => CopyRotation::TYPE_NAME,
            ConstraintKind::CopyTransforms(_) => CopyTransforms::TYPE_NAME,
            ConstraintKind::LimitScale(_) => LimitScale::TYPE_NAME,
            ConstraintKind::LimitRotation(_) => LimitRotation::TYPE_NAME,
            ConstraintKind::Ik(_) => Ik::TYPE_NAME,
            ConstraintKind::DampedTrack(_) => DampedTrack::TYPE_NAME,
        }
    }

    /// Returns every bone this constraint references.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            ConstraintKind::CopyRotation(p) => p.target.as_deref().into_iter().collect(),
            ConstraintKind::CopyTransforms(p) => p.target.as_deref().into_iter().collect(),
            ConstraintKind::Ik(p) => p
                .target
                .as_deref()
                .into_iter()
                .chain(p.pole_target.as_deref())
                .collect(),
            ConstraintKind::DampedTrack(p) => p.target.as_deref().into_iter().collect(),
            ConstraintKind::LimitScale(_) | ConstraintKind::LimitRotation(_) => Vec::new(),
        }
    }

    fn target_slots(&mut self) -> Vec<&mut Option<String>> {
        match self {
            ConstraintKind::CopyRotation(p) => vec![&mut p.target],
            ConstraintKind::CopyTransforms(p) => vec![&mut p.target],
            ConstraintKind::Ik(p) => vec![&mut p.target, &mut p.pole_target],
            ConstraintKind::DampedTrack(p) => vec![&mut p.target],
            ConstraintKind::LimitScale(_) | ConstraintKind::LimitRotation(_) => Vec::new(),
        }
    }
}

/// A named constraint attached to one bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Constraint {
    /// Name, unique per bone.
    pub name: String,
    /// Blend weight in [0, 1].
    pub influence: f64,
    /// Type and parameters.
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Creates a constraint with default parameters for `P`.
    pub fn new<P: ConstraintParams>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            influence: 1.0,
            kind: P::default().into(),
        }
    }

    /// Returns the type name.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Returns the typed parameters when the constraint is a `P`.
    pub fn params<P: ConstraintParams>(&self) -> Option<&P> {
        P::from_kind(&self.kind)
    }

    /// Returns the typed parameters mutably when the constraint is a `P`.
    pub fn params_mut<P: ConstraintParams>(&mut self) -> Option<&mut P> {
        P::from_kind_mut(&mut self.kind)
    }

    /// Sets the influence, clamped to [0, 1].
    pub fn set_influence(&mut self, influence: f64) -> &mut Self {
        self.influence = influence.clamp(0.0, 1.0);
        self
    }

    /// Rewrites references to bone `from` so they point at `to`.
    pub fn retarget(&mut self, from: &str, to: &str) -> usize {
        let mut count = 0;
        for slot in self.kind.target_slots() {
            if slot.as_deref() == Some(from) {
                *slot = Some(to.to_string());
                count += 1;
            }
        }
        count
    }
}

/// Typed constraint parameters that can be wrapped into [`ConstraintKind`].
pub trait ConstraintParams: Default + Into<ConstraintKind> {
    /// Type name reported in errors.
    const TYPE_NAME: &'static str;

    /// Borrows the parameters out of a kind of the same type.
    fn from_kind(kind: &ConstraintKind) -> Option<&Self>;

    /// Mutably borrows the parameters out of a kind of the same type.
    fn from_kind_mut(kind: &mut ConstraintKind) -> Option<&mut Self>;
}

macro_rules! constraint_params {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for ConstraintKind {
                fn from(params: $ty) -> Self {
                    ConstraintKind::$ty(params)
                }
            }

            impl ConstraintParams for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_kind(kind: &ConstraintKind) -> Option<&Self> {
                    match kind {
                        ConstraintKind::$ty(params) => Some(params),
                        _ => None,
                    }
                }

                fn from_kind_mut(kind: &mut ConstraintKind) -> Option<&mut Self> {
                    match kind {
                        ConstraintKind::$ty(params) => Some(params),
                        _ => None,
                    }
                }
            }
        )*
    };
}

constraint_params!(
    CopyRotation,
    CopyTransforms,
    LimitScale,
    LimitRotation,
    Ik,
    DampedTrack,
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_constraint_serde() {
        let mut constraint = Constraint::new::<CopyRotation>("Follow");
        if let Some(params) = constraint.params_mut::<CopyRotation>() {
            params.target = Some("Index2_L".into());
            params.use_x = false;
            params.owner_space = Space::Local;
        }

        let json = serde_json::to_string(&constraint).unwrap();
        assert!(json.contains("\"type\":\"copy_rotation\""));
        assert!(json.contains("\"owner_space\":\"local\""));

        let parsed: Constraint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, constraint);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Constraint::new::<Ik>("IK").type_name(), "Ik");
        assert_eq!(
            Constraint::new::<DampedTrack>("Track").type_name(),
            "DampedTrack"
        );
        assert!(Constraint::new::<Ik>("IK").params::<LimitScale>().is_none());
    }

    #[test]
    fn test_defaults() {
        let copy = CopyRotation::default();
        assert!(copy.use_x && copy.use_y && copy.use_z);
        assert_eq!(copy.owner_space, Space::World);

        let scale = LimitScale::default();
        assert!(!scale.min.y.enabled);
        assert_eq!(scale.max.x.value, 1.0);

        assert_eq!(TrackAxis::default().host_name(), "TRACK_Y");
        assert_eq!(RotationLimit::locked().max, 0.0);
    }

    #[test]
    fn test_retarget() {
        let mut constraint = Constraint::new::<Ik>("IK");
        if let Some(ik) = constraint.params_mut::<Ik>() {
            ik.target = Some("J_Bip_L_Hand".into());
            ik.pole_target = Some("J_Bip_L_Hand".into());
        }
        assert_eq!(constraint.retarget("J_Bip_L_Hand", "Hand_L"), 2);
        assert_eq!(constraint.kind.targets(), vec!["Hand_L", "Hand_L"]);
        assert_eq!(constraint.retarget("Missing", "Other"), 0);
    }

    #[test]
    fn test_influence_clamped() {
        let mut constraint = Constraint::new::<CopyTransforms>("Follow");
        constraint.set_influence(1.5);
        assert_eq!(constraint.influence, 1.0);
        constraint.set_influence(-0.5);
        assert_eq!(constraint.influence, 0.0);
    }
}
