//! Tunable synthesis constants.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};

use crate::bone::LAYER_COUNT;
use crate::error::{RigError, RigResult};

/// Default spring bone name pattern: hair, bust and skirt chains.
pub const DEFAULT_SPRING_PATTERN: &str =
    r"^((Hair|Bust)\d+|Skirt(Side|Front|Back)(_end)?_\d+)_(L|R|\d+)$";

// =============================================================================
// Root
// =============================================================================

/// All synthesis settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RigConfig {
    #[serde(default)]
    pub finger: FingerConfig,
    #[serde(default)]
    pub limb: LimbConfig,
    #[serde(default)]
    pub twist: TwistConfig,
    #[serde(default)]
    pub shoulder: ShoulderConfig,
    #[serde(default)]
    pub layers: LayerConfig,
    #[serde(default)]
    pub spring: SpringSettings,
}

impl RigConfig {
    /// Parses and validates a config document.
    pub fn from_json(json: &str) -> RigResult<Self> {
        let config: RigConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> RigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> RigResult<()> {
        positive("finger.control_scale", self.finger.control_scale)?;
        unit_interval("finger.min_scale_y", self.finger.min_scale_y)?;
        positive("limb.leg_ik_size", self.limb.leg_ik_size)?;
        positive("limb.fallback_arm_ik_size", self.limb.fallback_arm_ik_size)?;
        positive("limb.pole_distance_factor", self.limb.pole_distance_factor)?;
        positive("limb.pole_length", self.limb.pole_length)?;
        if self.twist.segments == 0 {
            return Err(invalid("twist.segments", "must be at least 1".to_string()));
        }
        unit_interval("twist.max_influence", self.twist.max_influence)?;
        positive("shoulder.twist_ratio", self.shoulder.twist_ratio)?;
        unit_interval("shoulder.track_influence", self.shoulder.track_influence)?;
        positive("shoulder.control_length", self.shoulder.control_length)?;
        layer("layers.control", self.layers.control)?;
        layer("layers.auxiliary", self.layers.auxiliary)?;
        unit_interval("spring.stiffness", self.spring.stiffness)?;
        unit_interval("spring.damping", self.spring.damping)?;
        Ok(())
    }
}

fn invalid(field: &'static str, message: String) -> RigError {
    RigError::InvalidConfig { field, message }
}

fn positive(field: &'static str, value: f64) -> RigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {}", value)))
    }
}

fn unit_interval(field: &'static str, value: f64) -> RigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in [0, 1], got {}", value)))
    }
}

fn layer(field: &'static str, value: u8) -> RigResult<()> {
    if value < LAYER_COUNT {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("must be below {}, got {}", LAYER_COUNT, value),
        ))
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Finger controller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FingerConfig {
    /// Control length as a multiple of the finger's span.
    #[serde(default = "default_control_scale")]
    pub control_scale: f64,
    /// Lowest Y scale the control can be squeezed to.
    #[serde(default = "default_min_scale_y")]
    pub min_scale_y: f64,
}

fn default_control_scale() -> f64 {
    1.5
}

fn default_min_scale_y() -> f64 {
    0.5
}

impl Default for FingerConfig {
    fn default() -> Self {
        Self {
            control_scale: default_control_scale(),
            min_scale_y: default_min_scale_y(),
        }
    }
}

/// Limb IK settings. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimbConfig {
    #[serde(default = "default_ik_size")]
    pub leg_ik_size: f64,
    /// Arm IK size used when no finger base bone is found.
    #[serde(default = "default_ik_size")]
    pub fallback_arm_ik_size: f64,
    /// Pole distance from the joint as a multiple of the upper limb length.
    #[serde(default = "default_pole_distance_factor")]
    pub pole_distance_factor: f64,
    #[serde(default = "default_ik_size")]
    pub pole_length: f64,
    /// Arm pole angle when the lower arm points towards +X.
    #[serde(default = "default_arm_pole_angle_pos")]
    pub arm_pole_angle_pos: f64,
    /// Arm pole angle otherwise.
    #[serde(default)]
    pub arm_pole_angle_neg: f64,
    #[serde(default = "default_leg_pole_angle")]
    pub leg_pole_angle: f64,
    #[serde(default = "default_chain_count")]
    pub chain_count: u32,
}

fn default_ik_size() -> f64 {
    0.12
}

fn default_pole_distance_factor() -> f64 {
    1.1
}

fn default_arm_pole_angle_pos() -> f64 {
    180.0
}

fn default_leg_pole_angle() -> f64 {
    -90.0
}

fn default_chain_count() -> u32 {
    2
}

impl Default for LimbConfig {
    fn default() -> Self {
        Self {
            leg_ik_size: default_ik_size(),
            fallback_arm_ik_size: default_ik_size(),
            pole_distance_factor: default_pole_distance_factor(),
            pole_length: default_ik_size(),
            arm_pole_angle_pos: default_arm_pole_angle_pos(),
            arm_pole_angle_neg: 0.0,
            leg_pole_angle: default_leg_pole_angle(),
            chain_count: default_chain_count(),
        }
    }
}

/// Twist chain settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwistConfig {
    #[serde(default = "default_segments")]
    pub segments: usize,
    /// Influence of the last sub-bone.
    #[serde(default = "default_max_influence")]
    pub max_influence: f64,
}

fn default_segments() -> usize {
    3
}

fn default_max_influence() -> f64 {
    0.9
}

impl Default for TwistConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            max_influence: default_max_influence(),
        }
    }
}

/// Shoulder controller settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShoulderConfig {
    /// Twist bone length as a fraction of the shoulder length.
    #[serde(default = "default_twist_ratio")]
    pub twist_ratio: f64,
    #[serde(default = "default_track_influence")]
    pub track_influence: f64,
    #[serde(default = "default_control_length")]
    pub control_length: f64,
}

fn default_twist_ratio() -> f64 {
    0.7
}

fn default_track_influence() -> f64 {
    0.5
}

fn default_control_length() -> f64 {
    0.05
}

impl Default for ShoulderConfig {
    fn default() -> Self {
        Self {
            twist_ratio: default_twist_ratio(),
            track_influence: default_track_influence(),
            control_length: default_control_length(),
        }
    }
}

/// Visibility layer assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Layer of bones the user manipulates.
    #[serde(default)]
    pub control: u8,
    /// Layer of bones driven by controls.
    #[serde(default = "default_auxiliary_layer")]
    pub auxiliary: u8,
}

fn default_auxiliary_layer() -> u8 {
    1
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            control: 0,
            auxiliary: default_auxiliary_layer(),
        }
    }
}

/// Spring bone tagging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpringSettings {
    #[serde(default = "default_spring_pattern")]
    pub pattern: String,
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default)]
    pub gravity: f64,
}

fn default_spring_pattern() -> String {
    DEFAULT_SPRING_PATTERN.to_string()
}

fn default_stiffness() -> f64 {
    0.3
}

fn default_damping() -> f64 {
    0.5
}

impl Default for SpringSettings {
    fn default() -> Self {
        Self {
            pattern: default_spring_pattern(),
            stiffness: default_stiffness(),
            damping: default_damping(),
            gravity: 0.0,
        }
    }
}
