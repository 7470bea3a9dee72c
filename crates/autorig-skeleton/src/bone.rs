//! Bone entity, custom shapes and spring parameters.

use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::driver::{Driver, QuaternionChannel};
use crate::error::{RigError, RigResult};
use crate::Vec3;

/// Number of visibility layers a bone can be assigned to.
pub const LAYER_COUNT: u8 = 32;

fn default_true() -> bool {
    true
}

fn is_zero(layer: &u8) -> bool {
    *layer == 0
}

/// Visual-only control shapes, keyed by fixed asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomShape {
    /// Grip handle drawn for finger controls.
    FingerControl,
    /// Handle drawn for IK targets.
    IkTarget,
    /// Marker drawn for IK pole targets.
    Pole,
}

impl CustomShape {
    /// Returns the asset name the shape provider resolves.
    pub fn asset_name(&self) -> &'static str {
        match self {
            CustomShape::FingerControl => "AUTORIG_FingerBoneShape",
            CustomShape::IkTarget => "AUTORIG_IkTargetShape",
            CustomShape::Pole => "AUTORIG_PoleShape",
        }
    }
}

/// A custom shape assigned to a bone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapeBinding {
    pub shape: CustomShape,
    /// Euler rotation applied to the shape, in radians.
    #[serde(default = "Vec3::zeros")]
    pub rotation: Vec3,
}

impl ShapeBinding {
    /// Binds a shape without rotation.
    pub fn new(shape: CustomShape) -> Self {
        Self {
            shape,
            rotation: Vec3::zeros(),
        }
    }

    /// Sets the shape rotation.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Spring simulation parameters consumed by the host's physics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpringParams {
    pub enabled: bool,
    /// Whether rotation is simulated as well as location.
    pub rotation: bool,
    pub stiffness: f64,
    pub damping: f64,
    pub gravity: f64,
}

/// A named rigid segment of the skeleton.
///
/// Geometry, parent and deform flag are structural: they change only through
/// an [`EditScope`](crate::EditScope). Everything else (layer, shape, spring
/// parameters, constraints, drivers) is behavior and may change at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bone {
    head: Vec3,
    tail: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(default = "default_true")]
    deform: bool,
    /// Organizational visibility layer.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub layer: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_shape: Option<ShapeBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring: Option<SpringParams>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    drivers: Vec<Driver>,
}

impl Bone {
    pub(crate) fn new(head: Vec3, tail: Vec3, parent: Option<String>, deform: bool) -> Self {
        Self {
            head,
            tail,
            parent,
            deform,
            layer: 0,
            custom_shape: None,
            spring: None,
            constraints: Vec::new(),
            drivers: Vec::new(),
        }
    }

    pub fn head(&self) -> Vec3 {
        self.head
    }

    pub fn tail(&self) -> Vec3 {
        self.tail
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn deform(&self) -> bool {
        self.deform
    }

    /// Returns `tail - head`.
    pub fn vector(&self) -> Vec3 {
        self.tail - self.head
    }

    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Returns the normalized bone direction.
    ///
    /// Fails with a degenerate geometry error for zero-length bones.
    pub fn direction(&self) -> RigResult<Vec3> {
        self.vector()
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| RigError::degenerate("zero-length bone has no direction"))
    }

    pub(crate) fn set_head(&mut self, head: Vec3) {
        self.head = head;
    }

    pub(crate) fn set_tail(&mut self, tail: Vec3) {
        self.tail = tail;
    }

    pub(crate) fn set_parent(&mut self, parent: Option<String>) {
        self.parent = parent;
    }

    pub(crate) fn set_deform(&mut self, deform: bool) {
        self.deform = deform;
    }

    /// Moves the bone to a single visibility layer.
    pub fn set_layer(&mut self, layer: u8) -> RigResult<()> {
        if layer >= LAYER_COUNT {
            return Err(RigError::InvalidConfig {
                field: "layer",
                message: format!("layer {} is outside 0..{}", layer, LAYER_COUNT),
            });
        }
        self.layer = layer;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Constraints
    // -------------------------------------------------------------------------

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn constraint_mut(&mut self, name: &str) -> Option<&mut Constraint> {
        self.constraints.iter_mut().find(|c| c.name == name)
    }

    /// Returns the constraint named `name`, inserting `create()` if absent.
    ///
    /// At most one constraint per name ever exists on a bone.
    pub fn constraint_entry<F>(&mut self, name: &str, create: F) -> &mut Constraint
    where
        F: FnOnce() -> Constraint,
    {
        let index = match self.constraints.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                let mut constraint = create();
                constraint.name = name.to_string();
                self.constraints.push(constraint);
                self.constraints.len() - 1
            }
        };
        &mut self.constraints[index]
    }

    pub(crate) fn constraints_mut(&mut self) -> impl Iterator<Item = &mut Constraint> {
        self.constraints.iter_mut()
    }

    // -------------------------------------------------------------------------
    // Drivers
    // -------------------------------------------------------------------------

    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn driver(&self, channel: QuaternionChannel) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.channel == channel)
    }

    /// Removes the driver on `channel`, if any.
    pub fn remove_driver(&mut self, channel: QuaternionChannel) -> Option<Driver> {
        let index = self.drivers.iter().position(|d| d.channel == channel)?;
        Some(self.drivers.remove(index))
    }

    /// Installs `driver`, replacing whatever drove the same channel.
    pub fn add_driver(&mut self, driver: Driver) -> &mut Driver {
        self.remove_driver(driver.channel);
        self.drivers.push(driver);
        let last = self.drivers.len() - 1;
        &mut self.drivers[last]
    }

    pub(crate) fn drivers_mut(&mut self) -> impl Iterator<Item = &mut Driver> {
        self.drivers.iter_mut()
    }
}
