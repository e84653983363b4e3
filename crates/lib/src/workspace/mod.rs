//! Workspace model.
//!
//! A workspace is described by a `wright.json` file at its root:
//!
//! ```json
//! {
//!   "version": 1,
//!   "projects": {
//!     "app": {
//!       "root": "apps/app",
//!       "sourceRoot": "apps/app/src",
//!       "projectType": "application",
//!       "targets": {
//!         "build": { "builder": "@acme/tools:exec", "options": { "command": "make" } }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! The workspace is read-only once loaded. Target maps are exposed raw and
//! validated by the target registry.

pub mod host;
pub mod schema;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::consts::{WORKSPACE_FILENAME, WORKSPACE_VERSION};
use crate::manifest::{ManifestError, load_json_file};

pub use host::{FsHost, Host};
pub use schema::{JsonSchemaValidator, SchemaError, SchemaValidator, SchemaViolation};

/// Kind of project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
  Application,
  Library,
}

impl fmt::Display for ProjectType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProjectType::Application => write!(f, "application"),
      ProjectType::Library => write!(f, "library"),
    }
  }
}

/// Project metadata copied into every builder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  /// Project root, relative to the workspace root.
  pub root: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_root: Option<String>,
  pub project_type: ProjectType,
}

/// A project entry as written in the workspace file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDef {
  #[serde(flatten)]
  pub project: Project,
  /// Raw, unvalidated target map.
  #[serde(default = "empty_targets")]
  pub targets: Value,
}

fn empty_targets() -> Value {
  Value::Object(Default::default())
}

#[derive(Debug, Deserialize)]
struct WorkspaceFile {
  version: u32,
  #[serde(default)]
  projects: BTreeMap<String, ProjectDef>,
}

/// Errors that can occur when loading a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
  /// Failed to read or parse the workspace file.
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  /// The workspace file does not have the expected shape.
  #[error("invalid workspace file {}: {source}", .path.display())]
  Invalid {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Workspace file version is not supported.
  #[error("unsupported workspace version {0}, expected {WORKSPACE_VERSION}")]
  UnsupportedVersion(u32),
}

/// The set of projects a builder can be run against.
pub struct Workspace {
  root: PathBuf,
  projects: BTreeMap<String, ProjectDef>,
  host: Arc<dyn Host>,
  validator: Arc<dyn SchemaValidator>,
}

impl fmt::Debug for Workspace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Workspace")
      .field("root", &self.root)
      .field("projects", &self.projects.keys().collect::<Vec<_>>())
      .finish_non_exhaustive()
  }
}

impl Workspace {
  /// Create a workspace from in-memory project definitions.
  pub fn new(root: impl Into<PathBuf>, projects: BTreeMap<String, ProjectDef>) -> Self {
    Self {
      root: root.into(),
      projects,
      host: Arc::new(FsHost),
      validator: Arc::new(JsonSchemaValidator),
    }
  }

  /// Replace the host used for file access.
  pub fn with_host(mut self, host: Arc<dyn Host>) -> Self {
    self.host = host;
    self
  }

  /// Replace the schema validator.
  pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
    self.validator = validator;
    self
  }

  /// Load a workspace file. The workspace root is the file's directory.
  pub async fn load(path: &Path) -> Result<Self, WorkspaceError> {
    Self::load_with_host(path, Arc::new(FsHost)).await
  }

  /// Load a workspace file through `host`.
  pub async fn load_with_host(path: &Path, host: Arc<dyn Host>) -> Result<Self, WorkspaceError> {
    debug!(path = %path.display(), "loading workspace");

    let value = load_json_file(host.as_ref(), path).await?;
    let file: WorkspaceFile = serde_json::from_value(value).map_err(|source| WorkspaceError::Invalid {
      path: path.to_path_buf(),
      source,
    })?;

    if file.version != WORKSPACE_VERSION {
      return Err(WorkspaceError::UnsupportedVersion(file.version));
    }

    let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(Self::new(root, file.projects).with_host(host))
  }

  /// Find the nearest workspace file in `start` or one of its ancestors.
  pub fn discover(start: &Path) -> Option<PathBuf> {
    start
      .ancestors()
      .map(|dir| dir.join(WORKSPACE_FILENAME))
      .find(|candidate| candidate.is_file())
  }

  /// Directory containing the workspace file.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Host used to read manifests and schemas.
  pub fn host(&self) -> Arc<dyn Host> {
    self.host.clone()
  }

  /// Names of all projects, in sorted order.
  pub fn list_project_names(&self) -> Vec<String> {
    self.projects.keys().cloned().collect()
  }

  /// Metadata for the named project.
  pub fn get_project(&self, name: &str) -> Option<&Project> {
    self.projects.get(name).map(|def| &def.project)
  }

  /// Raw target map of the named project.
  pub fn get_project_targets(&self, name: &str) -> Option<&Value> {
    self.projects.get(name).map(|def| &def.targets)
  }

  /// Validate `data` against `schema` with the workspace's validator.
  pub fn validate_against_schema(&self, data: &Value, schema: &Value) -> Result<Value, SchemaError> {
    self.validator.validate(data, schema)
  }
}
