//! Manifest loading.
//!
//! Every document the engine reads (workspace file, package manifests,
//! builders manifests, builder schemas) is parsed as relaxed JSON: comments
//! and trailing commas are accepted.

pub mod schemas;
mod types;

use std::io;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::workspace::Host;

pub use types::*;

/// Errors that can occur when loading a manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// Failed to read the file.
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The file is not valid UTF-8.
  #[error("{} is not valid UTF-8", .path.display())]
  Utf8 { path: PathBuf },

  /// Failed to parse the file as relaxed JSON.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: json5::Error,
  },
}

/// Read `path` through `host` and parse it as relaxed JSON.
pub async fn load_json_file(host: &dyn Host, path: &Path) -> Result<Value, ManifestError> {
  debug!(path = %path.display(), "loading json file");

  let bytes = host.read(path).await.map_err(|source| ManifestError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let text = String::from_utf8(bytes).map_err(|_| ManifestError::Utf8 {
    path: path.to_path_buf(),
  })?;

  parse_relaxed(&text).map_err(|source| ManifestError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Parse relaxed JSON text.
pub fn parse_relaxed(text: &str) -> Result<Value, json5::Error> {
  json5::from_str(text)
}

/// Join `relative` onto `base` and lexically resolve `.` and `..`.
///
/// An absolute `relative` replaces `base`, as with [`Path::join`].
pub fn join_normalized(base: &Path, relative: impl AsRef<Path>) -> PathBuf {
  let mut normalized = PathBuf::new();

  for component in base.join(relative).components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !normalized.pop() {
          normalized.push(component);
        }
      }
      other => normalized.push(other),
    }
  }

  normalized
}
