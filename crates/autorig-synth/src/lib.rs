//! AutoRig Synthesis Engine
//!
//! Procedural control rigs for humanoid skeletons: finger curl controllers,
//! two-bone limb IK, forearm twist chains and shoulder followers, plus the
//! name symmetrizer that brings vendor skeletons into canonical naming.
//!
//! Every synthesizer is idempotent. Bones are created or reused by name,
//! constraints are upserted by `(bone, name)` and drivers are replaced per
//! `(bone, channel)`, so running a synthesizer twice leaves the skeleton
//! exactly as one run did.
//!
//! # Example
//!
//! ```
//! use autorig_skeleton::{BendingAxis, Finger, Side, Skeleton, Vec3};
//! use autorig_synth::{symmetrize_names, synthesize_finger};
//!
//! let mut skeleton = Skeleton::new();
//! {
//!     let mut edit = skeleton.edit();
//!     edit.add_bone("J_Bip_L_Hand", Vec3::new(0.0, -0.5, 0.0), Vec3::zeros(), None).unwrap();
//!     edit.add_bone("J_Bip_L_Index1", Vec3::zeros(), Vec3::y(), Some("J_Bip_L_Hand")).unwrap();
//!     edit.add_bone("J_Bip_L_Index2", Vec3::y(), Vec3::y() * 2.0, Some("J_Bip_L_Index1")).unwrap();
//!     edit.add_bone("J_Bip_L_Index3", Vec3::y() * 2.0, Vec3::y() * 3.0, Some("J_Bip_L_Index2"))
//!         .unwrap();
//! }
//!
//! symmetrize_names(&mut skeleton).unwrap();
//! let control = synthesize_finger(&mut skeleton, Finger::Index, Side::Left, BendingAxis::PosX)
//!     .unwrap();
//! assert_eq!(control, "IndexCtrl_L");
//! assert_eq!(skeleton.bone(&control).unwrap().tail(), Vec3::new(0.0, 4.5, 0.0));
//! ```
//!
//! # Modules
//!
//! - [`symmetrize`]: Vendor prefix to canonical name rewriting
//! - [`binder`]: Idempotent constraint and driver upserts
//! - [`finger`]: Finger controllers
//! - [`limb_ik`]: Arm and leg IK rigs
//! - [`twist`]: Forearm twist chains
//! - [`shoulder`]: Shoulder followers
//! - [`spring`]: Spring bone tagging
//! - [`geometry`]: Pole direction and handedness
//! - [`collaborators`]: Skin weight and shape asset services
//! - [`names`]: Constraint and bone names

pub mod binder;
pub mod collaborators;
pub mod finger;
pub mod geometry;
pub mod limb_ik;
pub mod names;
pub mod shoulder;
pub mod spring;
pub mod symmetrize;
pub mod twist;

pub use binder::{set_driver, upsert_constraint};
pub use collaborators::{
    unresolved_shapes, BuiltinShapes, RecordedWeights, ShapeAsset, ShapeLibrary,
    SkinWeightService, WeightTransfer,
};
pub use finger::{
    finger_expression, synthesize_finger, synthesize_finger_with, synthesize_hands,
    synthesize_hands_with,
};
pub use geometry::pole_direction;
pub use limb_ik::{synthesize_limb_ik, synthesize_limb_ik_with, LimbIkRig};
pub use shoulder::{synthesize_shoulder, synthesize_shoulder_with, ShoulderRig};
pub use spring::{enable_spring_bones, enable_spring_bones_with};
pub use symmetrize::{canonical_name, plan_renames, symmetrize_names};
pub use twist::{synthesize_twist, synthesize_twist_with};
