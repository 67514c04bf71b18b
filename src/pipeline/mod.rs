//! The declaration-bundling pipeline.
//!
//! Each output target flows through the same stages in order: entry
//! discovery, declaration emission, umbrella module synthesis, bundling,
//! and the final header rewrite. Intermediate artifacts created along the
//! way are tracked in a [`cleanup::CleanupSet`] and swept on every exit
//! path. [`orchestrator::Generator`] ties the stages together and runs
//! them once per requested target.

pub mod bundle;
pub mod cleanup;
pub mod diagnostics;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod orchestrator;
pub mod settings;
pub mod tsconfig;
pub mod virtual_module;
pub mod write;

pub use error::{Error, Result};
pub use orchestrator::{Generator, RunSummary, TargetReport};
pub use settings::{GenerateOptions, OutputTarget, OutputTargetBuilder, RedistributionRule};
