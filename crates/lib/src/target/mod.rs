//! Targets and builder configurations.
//!
//! - [`TargetRegistry`] validates and caches every project's target map
//! - [`compose`] merges base options, a named configuration and caller
//!   overrides into a [`BuilderConfiguration`]

mod compose;
mod registry;
mod types;

pub use compose::compose;
pub use registry::TargetRegistry;
pub use types::*;
