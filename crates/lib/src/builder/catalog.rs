//! Builder discovery and instantiation.
//!
//! # Discovery
//!
//! For `<package>:<builder>`:
//! 1. resolve `<package>` to its `package.json`
//! 2. read the manifest's `builders` field, a path relative to the manifest
//! 3. read that builders manifest and validate it
//! 4. look up `<builder>` and root its `class` and `schema` paths at the
//!    builders manifest's directory
//! 5. read the option schema
//!
//! # Caching
//!
//! Three maps, all keyed by builder identifier and never invalidated:
//! rewritten builders-manifest entries and descriptions are filled in by
//! [`BuilderCatalog::describe`], factories by [`BuilderCatalog::instantiate`].
//! Concurrent discovery of the same identifier may read the same files
//! twice; both runs store equivalent entries.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{Builder, BuilderContext, BuilderDescription, BuilderFactory, ModuleLoader, PackageResolver};
use crate::architect::ArchitectError;
use crate::manifest::schemas::builders_schema;
use crate::manifest::{BuilderPaths, BuildersManifest, PackageManifest, join_normalized, load_json_file};
use crate::workspace::{Host, SchemaError, Workspace};

/// Split `<package>:<builder>` on its first colon.
///
/// Returns `None` unless both segments are non-empty.
pub fn split_builder_id(builder_id: &str) -> Option<(&str, &str)> {
  builder_id
    .split_once(':')
    .filter(|(package, builder)| !package.is_empty() && !builder.is_empty())
}

fn cannot_resolve(builder_id: &str, reason: impl Into<String>) -> ArchitectError {
  ArchitectError::BuilderCannotBeResolved {
    builder: builder_id.to_string(),
    reason: reason.into(),
  }
}

/// Read a file of the discovery chain; any failure leaves the builder unresolved.
async fn read_json(host: &dyn Host, builder_id: &str, path: &Path) -> Result<Value, ArchitectError> {
  load_json_file(host, path)
    .await
    .map_err(|e| cannot_resolve(builder_id, e.to_string()))
}

/// Resolves builder identifiers to descriptions and instances.
pub struct BuilderCatalog {
  resolver: PackageResolver,
  loader: Arc<dyn ModuleLoader>,
  paths: RwLock<HashMap<String, BuilderPaths>>,
  descriptions: RwLock<HashMap<String, Arc<BuilderDescription>>>,
  factories: RwLock<HashMap<String, Arc<dyn BuilderFactory>>>,
}

impl BuilderCatalog {
  pub fn new(resolver: PackageResolver, loader: Arc<dyn ModuleLoader>) -> Self {
    Self {
      resolver,
      loader,
      paths: RwLock::default(),
      descriptions: RwLock::default(),
      factories: RwLock::default(),
    }
  }

  /// Describe `builder_id`, running discovery on the first request.
  pub async fn describe(
    &self,
    workspace: &Workspace,
    builder_id: &str,
  ) -> Result<Arc<BuilderDescription>, ArchitectError> {
    if let Some(description) = self.descriptions.read().await.get(builder_id) {
      return Ok(description.clone());
    }

    let (package, builder_name) =
      split_builder_id(builder_id).ok_or_else(|| cannot_resolve(builder_id, "expected '<package>:<builder>'"))?;

    debug!(builder = %builder_id, "discovering builder");

    let host = workspace.host();

    let package_json = self
      .resolver
      .resolve(package, workspace.root())
      .await
      .ok_or_else(|| cannot_resolve(builder_id, format!("package '{}' not found", package)))?;

    let package_manifest: PackageManifest = serde_json::from_value(read_json(host.as_ref(), builder_id, &package_json).await?)
      .map_err(|e| cannot_resolve(builder_id, format!("invalid package manifest: {}", e)))?;

    let builders_entry = package_manifest
      .builders
      .filter(|entry| !entry.is_empty())
      .ok_or_else(|| cannot_resolve(builder_id, format!("package '{}' declares no builders", package)))?;

    let package_dir = package_json.parent().unwrap_or(Path::new(""));
    let builders_json = join_normalized(package_dir, &builders_entry);

    let raw = read_json(host.as_ref(), builder_id, &builders_json).await?;
    let validated = workspace.validate_against_schema(&raw, &builders_schema()?)?;
    let mut manifest: BuildersManifest = serde_json::from_value(validated).map_err(SchemaError::from)?;

    let entry = manifest.builders.remove(builder_name).ok_or_else(|| {
      cannot_resolve(
        builder_id,
        format!("package '{}' has no builder named '{}'", package, builder_name),
      )
    })?;

    let builders_dir = builders_json.parent().unwrap_or(Path::new(""));
    let paths = BuilderPaths {
      class: join_normalized(builders_dir, &entry.class),
      schema: join_normalized(builders_dir, &entry.schema),
      description: entry.description,
    };

    self.paths.write().await.insert(builder_id.to_string(), paths.clone());

    let schema = read_json(host.as_ref(), builder_id, &paths.schema).await?;
    let description = Arc::new(BuilderDescription {
      name: builder_id.to_string(),
      schema,
      description: paths.description,
    });

    self
      .descriptions
      .write()
      .await
      .insert(builder_id.to_string(), description.clone());

    info!(builder = %builder_id, class = %paths.class.display(), "builder resolved");
    Ok(description)
  }

  /// Rewritten builders-manifest entry cached by discovery.
  pub async fn builder_paths(&self, builder_id: &str) -> Option<BuilderPaths> {
    self.paths.read().await.get(builder_id).cloned()
  }

  /// Construct a new instance of the builder `description` names.
  ///
  /// The builder must have been discovered through [`BuilderCatalog::describe`].
  pub async fn instantiate(
    &self,
    description: &BuilderDescription,
    context: BuilderContext,
  ) -> Result<Box<dyn Builder>, ArchitectError> {
    let name = &description.name;

    let cached = self.factories.read().await.get(name).cloned();
    let factory = match cached {
      Some(factory) => factory,
      None => {
        let paths = self
          .builder_paths(name)
          .await
          .ok_or_else(|| ArchitectError::BuilderNotFound(name.clone()))?;

        debug!(builder = %name, class = %paths.class.display(), "loading builder module");
        let factory = self.loader.load(&paths.class)?;
        self.factories.write().await.insert(name.clone(), factory.clone());
        factory
      }
    };

    Ok(factory.construct(context))
  }
}
