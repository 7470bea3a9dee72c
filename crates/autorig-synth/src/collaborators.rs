//! External collaborators: skin weight repaint and custom shape assets.
//!
//! Synthesis only requests these services; hosts supply the real
//! implementations. [`RecordedWeights`] and [`BuiltinShapes`] cover headless
//! use.

use std::collections::BTreeMap;

use autorig_skeleton::{CustomShape, RigError, RigResult, Skeleton, Vec3};
use serde::{Deserialize, Serialize};

// =============================================================================
// Skin Weights
// =============================================================================

/// Request to move vertex weights from one bone onto several new bones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTransfer {
    /// Bone whose weights are removed.
    pub source: String,
    /// Bones that receive weights by proximity.
    pub targets: Vec<String>,
}

/// Rebinds mesh vertex influence to new bones.
pub trait SkinWeightService {
    /// Transfers weights from `transfer.source` to `transfer.targets`.
    fn transfer_weights(&mut self, skeleton: &Skeleton, transfer: &WeightTransfer)
        -> RigResult<()>;
}

/// Records transfer requests instead of repainting a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedWeights {
    pub transfers: Vec<WeightTransfer>,
}

impl RecordedWeights {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SkinWeightService for RecordedWeights {
    fn transfer_weights(
        &mut self,
        skeleton: &Skeleton,
        transfer: &WeightTransfer,
    ) -> RigResult<()> {
        let missing = std::iter::once(&transfer.source)
            .chain(&transfer.targets)
            .find(|name| !skeleton.contains(name));
        if let Some(name) = missing {
            return Err(RigError::SkinWeight {
                source_bone: transfer.source.clone(),
                message: format!("bone '{}' does not exist", name),
            });
        }
        self.transfers.push(transfer.clone());
        Ok(())
    }
}

// =============================================================================
// Shapes
// =============================================================================

/// Wireframe outline for a custom bone shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAsset {
    pub name: String,
    pub vertices: Vec<Vec3>,
    pub edges: Vec<[usize; 2]>,
}

/// Resolves custom shape assets by their fixed names.
pub trait ShapeLibrary {
    /// Returns the asset for `shape`, or `None` if the host has none.
    fn resolve(&self, shape: CustomShape) -> Option<ShapeAsset>;
}

/// Built-in outlines. Only the finger control grip has a built-in mesh.
#[derive(Debug, Clone, Default)]
pub struct BuiltinShapes {
    overrides: BTreeMap<&'static str, ShapeAsset>,
}

impl BuiltinShapes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset for `shape`, replacing the built-in one.
    pub fn with_asset(
        mut self,
        shape: CustomShape,
        vertices: Vec<Vec3>,
        edges: Vec<[usize; 2]>,
    ) -> Self {
        let name = shape.asset_name();
        self.overrides.insert(
            name,
            ShapeAsset {
                name: name.to_string(),
                vertices,
                edges,
            },
        );
        self
    }

    fn finger_grip() -> ShapeAsset {
        ShapeAsset {
            name: CustomShape::FingerControl.asset_name().to_string(),
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.9, 0.0),
                Vec3::new(-0.05, 0.9, 0.0),
                Vec3::new(-0.05, 1.0, 0.0),
                Vec3::new(0.05, 1.0, 0.0),
                Vec3::new(0.05, 0.9, 0.0),
            ],
            edges: vec![[0, 1], [2, 3], [3, 4], [4, 5], [5, 2]],
        }
    }
}

impl ShapeLibrary for BuiltinShapes {
    fn resolve(&self, shape: CustomShape) -> Option<ShapeAsset> {
        if let Some(asset) = self.overrides.get(shape.asset_name()) {
            return Some(asset.clone());
        }
        match shape {
            CustomShape::FingerControl => Some(Self::finger_grip()),
            CustomShape::IkTarget | CustomShape::Pole => None,
        }
    }
}

/// Lists the shapes referenced by bones that `library` cannot resolve.
pub fn unresolved_shapes(skeleton: &Skeleton, library: &dyn ShapeLibrary) -> Vec<CustomShape> {
    let mut missing = Vec::new();
    for (_, bone) in skeleton.bones() {
        if let Some(binding) = &bone.custom_shape {
            if !missing.contains(&binding.shape) && library.resolve(binding.shape).is_none() {
                missing.push(binding.shape);
            }
        }
    }
    missing
}
