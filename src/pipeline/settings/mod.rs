//! Generation settings.
//!
//! [`GenerateOptions`] describes a whole run; each [`OutputTarget`] in it
//! describes one bundled declaration file. Targets deserialize from the JSON
//! configuration file with camelCase keys, or are assembled from CLI flags
//! through [`OutputTargetBuilder`].

mod builder;
mod options;
mod target;

pub use builder::OutputTargetBuilder;
pub use options::GenerateOptions;
pub use target::{OutputTarget, RedistributionRule};
