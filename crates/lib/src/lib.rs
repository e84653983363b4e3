//! wright-lib: Core types and logic for Wright
//!
//! This crate provides the builder orchestration engine:
//! - `Workspace`: the read-only project model loaded from `wright.json`
//! - `TargetRegistry`: validated, cached target maps per project
//! - `BuilderCatalog`: builder discovery through package and builders manifests
//! - `Architect`: composes builder configurations and runs builders

pub mod architect;
pub mod builder;
pub mod consts;
pub mod manifest;
pub mod platform;
pub mod target;
pub mod workspace;

pub use architect::{Architect, ArchitectError};
pub use builder::{BuildEvent, Builder, BuilderContext, BuilderDescription, BuilderFactory};
pub use target::{BuilderConfiguration, TargetSpecifier};
pub use workspace::Workspace;
