//! Builder implementation modules.
//!
//! Discovery ends with the path of a builder's implementation module (the
//! `class` entry of its builders manifest). A [`ModuleLoader`] turns that
//! path into a [`BuilderFactory`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::BuilderFactory;

/// Errors that can occur when loading a builder module.
#[derive(Debug, Error)]
pub enum LoadError {
  /// No module is available for the path.
  #[error("no builder module available for {}", .0.display())]
  NotFound(PathBuf),
}

/// Loads the factory exported by a builder module.
pub trait ModuleLoader: Send + Sync {
  fn load(&self, class: &Path) -> Result<Arc<dyn BuilderFactory>, LoadError>;
}

/// Compiled-in table of builder modules.
///
/// A class path matches a module registered under exactly that path first,
/// then a module registered under its name (the file stem, so `./exec` and
/// `./exec.js` both match `exec`).
#[derive(Clone, Default)]
pub struct StaticModules {
  by_path: HashMap<PathBuf, Arc<dyn BuilderFactory>>,
  by_name: HashMap<String, Arc<dyn BuilderFactory>>,
}

impl fmt::Debug for StaticModules {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StaticModules")
      .field("by_path", &self.by_path.keys().collect::<Vec<_>>())
      .field("by_name", &self.by_name.keys().collect::<Vec<_>>())
      .finish()
  }
}

impl StaticModules {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register `factory` as the module named `name`.
  pub fn register(&mut self, name: impl Into<String>, factory: Arc<dyn BuilderFactory>) -> &mut Self {
    self.by_name.insert(name.into(), factory);
    self
  }

  /// Register `factory` as the module at `path`.
  pub fn register_path(&mut self, path: impl Into<PathBuf>, factory: Arc<dyn BuilderFactory>) -> &mut Self {
    self.by_path.insert(path.into(), factory);
    self
  }
}

impl ModuleLoader for StaticModules {
  fn load(&self, class: &Path) -> Result<Arc<dyn BuilderFactory>, LoadError> {
    if let Some(factory) = self.by_path.get(class) {
      return Ok(factory.clone());
    }

    class
      .file_stem()
      .and_then(|stem| stem.to_str())
      .and_then(|name| self.by_name.get(name))
      .cloned()
      .ok_or_else(|| LoadError::NotFound(class.to_path_buf()))
  }
}
