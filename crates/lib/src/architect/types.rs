//! Error type for builder orchestration.

use thiserror::Error;

use crate::builder::LoadError;
use crate::workspace::SchemaError;

/// Errors that can occur while composing, resolving or running a builder.
#[derive(Debug, Error)]
pub enum ArchitectError {
  /// The project does not exist in the workspace.
  #[error("Project '{0}' could not be found in workspace.")]
  ProjectNotFound(String),

  /// The project has no target with this name.
  #[error("Target '{target}' could not be found in project '{project}'.")]
  TargetNotFound { project: String, target: String },

  /// The target has no configuration with this name.
  #[error("Configuration '{configuration}' could not be found in project '{project}'.")]
  ConfigurationNotFound { project: String, configuration: String },

  /// Builder discovery failed.
  #[error("Builder '{builder}' cannot be resolved: {reason}.")]
  BuilderCannotBeResolved { builder: String, reason: String },

  /// Instantiation was requested for a builder that was never discovered.
  #[error("Builder {0} could not be found.")]
  BuilderNotFound(String),

  /// Targets were read before the registry was loaded.
  #[error("Architect needs to be loaded before Architect is used.")]
  NotLoaded,

  /// Schema validation failed.
  #[error(transparent)]
  Schema(#[from] SchemaError),

  /// The builder's implementation module could not be loaded.
  #[error(transparent)]
  Load(#[from] LoadError),
}
