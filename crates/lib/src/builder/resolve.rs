//! Package manifest resolution.
//!
//! A package name resolves to `<dir>/<package>/package.json`, searched in:
//! 1. the workspace root itself, when the name is a path (`./tools`, `/opt/tools`)
//! 2. `<modules_dir>` of the workspace root and of each of its ancestors
//! 3. each environment-wide search path

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{MODULES_DIR, PACKAGE_MANIFEST};
use crate::platform::paths::package_search_paths;

/// Configuration for package resolution.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
  /// Name of the local package directory.
  pub modules_dir: String,

  /// Environment-wide package roots, searched after local ones.
  pub search_paths: Vec<PathBuf>,
}

impl Default for ResolveConfig {
  fn default() -> Self {
    Self {
      modules_dir: MODULES_DIR.to_string(),
      search_paths: package_search_paths(),
    }
  }
}

impl ResolveConfig {
  /// Local-only resolution, without environment-wide search paths.
  pub fn local() -> Self {
    Self {
      modules_dir: MODULES_DIR.to_string(),
      search_paths: Vec::new(),
    }
  }
}

/// Resolves package names to package manifest paths.
#[derive(Debug, Clone, Default)]
pub struct PackageResolver {
  config: ResolveConfig,
}

impl PackageResolver {
  pub fn new(config: ResolveConfig) -> Self {
    Self { config }
  }

  /// Candidate package manifest paths for `package`, in lookup order.
  pub fn candidates(&self, package: &str, basedir: &Path) -> Vec<PathBuf> {
    if is_path_like(package) {
      return vec![basedir.join(package).join(PACKAGE_MANIFEST)];
    }

    let local = basedir
      .ancestors()
      .map(|dir| dir.join(&self.config.modules_dir).join(package).join(PACKAGE_MANIFEST));
    let global = self
      .config
      .search_paths
      .iter()
      .map(|dir| dir.join(package).join(PACKAGE_MANIFEST));

    local.chain(global).collect()
  }

  /// Resolve `package` from `basedir` to the real path of its manifest.
  pub async fn resolve(&self, package: &str, basedir: &Path) -> Option<PathBuf> {
    for candidate in self.candidates(package, basedir) {
      let is_file = tokio::fs::metadata(&candidate)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);

      if is_file {
        debug!(package, path = %candidate.display(), "resolved package");
        return Some(dunce::canonicalize(&candidate).unwrap_or(candidate));
      }
    }

    debug!(package, basedir = %basedir.display(), "package not found");
    None
  }
}

fn is_path_like(package: &str) -> bool {
  package.starts_with('.') || Path::new(package).is_absolute()
}
