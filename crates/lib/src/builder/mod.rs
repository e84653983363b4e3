//! Builders and builder discovery.
//!
//! A builder is identified as `<package>:<builder>`. Discovery reads the
//! package's manifest, follows its `builders` field to a builders manifest
//! and from there to the builder's option schema and implementation module.
//! Implementation modules are provided by a [`ModuleLoader`].

pub mod builtin;
mod catalog;
mod loader;
mod resolve;

use std::fmt;
use std::sync::{Arc, Weak};

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Span;

use crate::architect::Architect;
use crate::target::BuilderConfiguration;
use crate::workspace::{Host, Workspace};

pub use catalog::{BuilderCatalog, split_builder_id};
pub use loader::{LoadError, ModuleLoader, StaticModules};
pub use resolve::{PackageResolver, ResolveConfig};

/// One outcome reported by a running builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEvent {
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl BuildEvent {
  pub fn success() -> Self {
    Self {
      success: true,
      message: None,
    }
  }

  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: Some(message.into()),
    }
  }
}

/// Stream of outcomes produced by one builder run.
pub type BuildOutput = BoxStream<'static, BuildEvent>;

/// A unit of work bound to a builder identifier.
///
/// Builders report their own failures through [`BuildEvent::success`].
pub trait Builder: Send + Sync {
  fn run(&self, config: BuilderConfiguration) -> BuildOutput;
}

/// Constructs builder instances. One factory is cached per builder
/// identifier; every invocation gets a new instance.
pub trait BuilderFactory: Send + Sync {
  fn construct(&self, context: BuilderContext) -> Box<dyn Builder>;
}

impl<F> BuilderFactory for F
where
  F: Fn(BuilderContext) -> Box<dyn Builder> + Send + Sync,
{
  fn construct(&self, context: BuilderContext) -> Box<dyn Builder> {
    self(context)
  }
}

/// Resolved metadata of a builder, independent of any invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderDescription {
  /// Builder identifier, `<package>:<builder>`.
  pub name: String,
  /// JSON schema for the builder's options.
  pub schema: Value,
  pub description: String,
}

/// Everything a builder instance gets besides its configuration.
#[derive(Clone)]
pub struct BuilderContext {
  /// Span builder logs are recorded under. `Span::none()` discards them.
  pub logger: Span,
  pub host: Arc<dyn Host>,
  pub workspace: Arc<Workspace>,
  /// The architect running this builder, for nested runs.
  pub architect: Weak<Architect>,
  /// Additional caller-supplied fields.
  pub extra: Map<String, Value>,
}

impl fmt::Debug for BuilderContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BuilderContext")
      .field("logger", &self.logger)
      .field("workspace", &self.workspace)
      .field("extra", &self.extra)
      .finish_non_exhaustive()
  }
}

/// Caller-supplied context fields; anything set here wins over the defaults.
#[derive(Clone, Default)]
pub struct PartialContext {
  pub logger: Option<Span>,
  pub host: Option<Arc<dyn Host>>,
  pub workspace: Option<Arc<Workspace>>,
  pub architect: Option<Weak<Architect>>,
  pub extra: Map<String, Value>,
}

impl PartialContext {
  pub fn with_logger(mut self, logger: Span) -> Self {
    self.logger = Some(logger);
    self
  }

  pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
    self.extra.insert(key.into(), value);
    self
  }

  /// Overlay these fields onto `defaults`.
  pub fn apply(self, defaults: BuilderContext) -> BuilderContext {
    let mut extra = defaults.extra;
    extra.extend(self.extra);

    BuilderContext {
      logger: self.logger.unwrap_or(defaults.logger),
      host: self.host.unwrap_or(defaults.host),
      workspace: self.workspace.unwrap_or(defaults.workspace),
      architect: self.architect.unwrap_or(defaults.architect),
      extra,
    }
  }
}
