//! AutoRig Skeleton Graph
//!
//! This crate provides the data model that rig synthesis operates on: a
//! name-keyed forest of bones with head/tail geometry, typed constraints,
//! scripted drivers and the structural edit scope.
//!
//! # Example
//!
//! ```
//! use autorig_skeleton::{Skeleton, SkeletonMode, Vec3};
//!
//! let mut skeleton = Skeleton::new();
//! {
//!     let mut edit = skeleton.edit();
//!     edit.add_bone("Root", Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0), None).unwrap();
//!     edit.add_bone("Hand_L", Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.2, 0.0, 1.0), Some("Root"))
//!         .unwrap();
//! }
//! assert_eq!(skeleton.mode(), SkeletonMode::Object);
//! assert_eq!(skeleton.children("Root"), vec!["Hand_L"]);
//! ```
//!
//! # Modules
//!
//! - [`skeleton`]: The skeleton graph and JSON documents
//! - [`edit`]: Structural edit scope guard
//! - [`bone`]: Bones, custom shapes and spring parameters
//! - [`constraint`]: Tagged constraint types
//! - [`driver`]: Scripted drivers on quaternion channels
//! - [`expression`]: Driver expression parser and evaluator
//! - [`naming`]: Canonical bone names
//! - [`config`]: Synthesis settings
//! - [`error`]: Error taxonomy

pub mod bone;
pub mod config;
pub mod constraint;
pub mod driver;
pub mod edit;
pub mod error;
pub mod expression;
pub mod naming;
pub mod skeleton;

/// 3D vector used for bone geometry.
pub type Vec3 = nalgebra::Vector3<f64>;

// Re-export commonly used types at the crate root
pub use bone::{Bone, CustomShape, ShapeBinding, SpringParams, LAYER_COUNT};
pub use config::{
    FingerConfig, LayerConfig, LimbConfig, RigConfig, ShoulderConfig, SpringSettings,
    TwistConfig, DEFAULT_SPRING_PATTERN,
};
pub use constraint::{
    AxisBound, AxisBounds, Constraint, ConstraintKind, ConstraintParams, CopyRotation,
    CopyTransforms, DampedTrack, Ik, LimitRotation, LimitScale, RotationLimit, Space, TrackAxis,
};
pub use driver::{Driver, DriverVariable, QuaternionChannel, TransformChannel};
pub use edit::EditScope;
pub use error::{ErrorCategory, RigError, RigResult};
pub use expression::{Expr, ExpressionError};
pub use naming::{BendingAxis, Finger, LimbKind, ParseNameError, Side, ROOT_BONE};
pub use skeleton::{Skeleton, SkeletonMode};
