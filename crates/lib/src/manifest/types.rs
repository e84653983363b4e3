use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The fields of a package manifest the engine cares about.
///
/// Package manifests carry many unrelated fields; only `builders` is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
  /// Path of the builders manifest, relative to the package manifest.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub builders: Option<String>,
}

/// A builders manifest: `{ "builders": { "<name>": { class, schema, description } } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildersManifest {
  pub builders: BTreeMap<String, BuilderPaths>,
}

/// One builder entry of a builders manifest.
///
/// As read from disk `class` and `schema` are relative to the builders
/// manifest. Once cached they are rewritten to be rooted at its directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderPaths {
  pub class: PathBuf,
  pub schema: PathBuf,
  pub description: String,
}
