//! AutoRig End-to-End Test Infrastructure
//!
//! This crate provides integration tests across the skeleton model and the
//! synthesizers:
//!
//! - Scenarios: each synthesizer on a full humanoid
//! - **Idempotence**: re-running synthesis leaves a byte-identical skeleton
//! - Documents: skeleton and config JSON on disk
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p autorig-tests
//! ```
//!
//! ## Fixtures
//!
//! [`fixtures::HumanoidFixture`] builds a bent-limb humanoid with canonical
//! names or vendor (`J_Bip_*`) names:
//!
//! ```rust
//! use autorig_tests::fixtures::HumanoidFixture;
//!
//! let skeleton = HumanoidFixture::new().vrm().without_springs().build();
//! assert!(skeleton.contains("J_Bip_L_Hand"));
//! ```

pub mod fixtures;
pub mod idempotence;
pub mod pipeline;

pub use fixtures::{humanoid, vrm_humanoid, HumanoidFixture, Naming};
pub use idempotence::{verify_idempotent, IdempotenceResult, LineDiff};
pub use pipeline::rig_humanoid;
