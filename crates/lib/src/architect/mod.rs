//! Builder orchestration.
//!
//! [`Architect`] owns the target registry and builder catalog of one
//! workspace. Running a builder configuration is a strict sequence:
//! 1. assemble the builder context
//! 2. describe the builder (discovery on first use)
//! 3. validate the options against the builder's schema and keep the
//!    validator's normalized output
//! 4. instantiate the builder
//! 5. run it and hand its output stream to the caller
//!
//! Any failure aborts the sequence; nothing after it runs.

mod types;

use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::{Span, debug, info};

use crate::builder::{
  BuildOutput, Builder, BuilderCatalog, BuilderContext, BuilderDescription, ModuleLoader, PackageResolver,
  PartialContext, ResolveConfig,
};
use crate::target::{BuilderConfiguration, TargetRegistry, TargetSpecifier, compose};
use crate::workspace::{SchemaError, SchemaViolation, Workspace};

pub use types::ArchitectError;

/// Resolves and runs builders for the targets of one workspace.
///
/// All caches live as long as the architect and are never shared between
/// architects.
pub struct Architect {
  workspace: Arc<Workspace>,
  registry: TargetRegistry,
  catalog: BuilderCatalog,
  this: Weak<Architect>,
}

impl Architect {
  /// Create an architect resolving packages with the default configuration.
  pub fn new(workspace: Arc<Workspace>, loader: Arc<dyn ModuleLoader>) -> Arc<Self> {
    Self::with_config(workspace, loader, ResolveConfig::default())
  }

  pub fn with_config(workspace: Arc<Workspace>, loader: Arc<dyn ModuleLoader>, config: ResolveConfig) -> Arc<Self> {
    Arc::new_cyclic(|this| Self {
      workspace,
      registry: TargetRegistry::new(),
      catalog: BuilderCatalog::new(PackageResolver::new(config), loader),
      this: this.clone(),
    })
  }

  pub fn workspace(&self) -> &Arc<Workspace> {
    &self.workspace
  }

  /// Validate and cache every project's targets. Later calls do nothing.
  pub async fn load(&self) -> Result<&Self, ArchitectError> {
    self.registry.load(&self.workspace).await?;
    Ok(self)
  }

  /// Names of the targets of `project`.
  pub fn list_project_targets(&self, project: &str) -> Result<Vec<String>, ArchitectError> {
    self.registry.list_targets(project)
  }

  /// Compose the configuration for `specifier`. Options are not validated.
  pub fn get_builder_configuration(&self, specifier: &TargetSpecifier) -> Result<BuilderConfiguration, ArchitectError> {
    compose(&self.workspace, &self.registry, specifier)
  }

  /// Describe the builder named by `builder_id`.
  pub async fn get_builder_description(&self, builder_id: &str) -> Result<Arc<BuilderDescription>, ArchitectError> {
    self.catalog.describe(&self.workspace, builder_id).await
  }

  /// Validate `config.options` against `description`'s schema, replacing
  /// them with the validator's normalized output.
  pub fn validate_builder_options(
    &self,
    mut config: BuilderConfiguration,
    description: &BuilderDescription,
  ) -> Result<BuilderConfiguration, ArchitectError> {
    let options = Value::Object(std::mem::take(&mut config.options));
    let validated = self.workspace.validate_against_schema(&options, &description.schema)?;

    config.options = match validated {
      Value::Object(options) => options,
      _ => {
        return Err(
          SchemaError::Validation {
            violations: vec![SchemaViolation {
              instance_path: String::new(),
              message: "builder options must be an object".to_string(),
            }],
          }
          .into(),
        );
      }
    };

    Ok(config)
  }

  /// Construct a new instance of the builder `description` names.
  pub async fn get_builder(
    &self,
    description: &BuilderDescription,
    context: BuilderContext,
  ) -> Result<Box<dyn Builder>, ArchitectError> {
    self.catalog.instantiate(description, context).await
  }

  /// Run the builder of `config`.
  ///
  /// Fields set in `partial` replace the default context: a no-op logger,
  /// this architect, and the workspace with its host.
  pub async fn run(&self, config: BuilderConfiguration, partial: PartialContext) -> Result<BuildOutput, ArchitectError> {
    let context = partial.apply(self.default_context());

    let description = self.get_builder_description(&config.builder).await?;
    let config = self.validate_builder_options(config, &description)?;
    debug!(builder = %config.builder, "builder options validated");

    let builder = self.get_builder(&description, context).await?;

    info!(builder = %config.builder, root = %config.root, "running builder");
    Ok(builder.run(config))
  }

  /// Compose, then run, the configuration for `specifier`.
  pub async fn run_target(
    &self,
    specifier: &TargetSpecifier,
    partial: PartialContext,
  ) -> Result<BuildOutput, ArchitectError> {
    let config = self.get_builder_configuration(specifier)?;
    self.run(config, partial).await
  }

  fn default_context(&self) -> BuilderContext {
    BuilderContext {
      logger: Span::none(),
      host: self.workspace.host(),
      workspace: self.workspace.clone(),
      architect: self.this.clone(),
      extra: Default::default(),
    }
  }
}
