mod describe;
mod run;
mod targets;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

use wright_lib::Architect;
use wright_lib::Workspace;
use wright_lib::builder::builtin::builtin_modules;
use wright_lib::consts::{WORKSPACE_ENV, WORKSPACE_FILENAME};

pub use describe::cmd_describe;
pub use run::cmd_run;
pub use targets::cmd_targets;

/// Locate the workspace file: explicit path, then `WRIGHT_WORKSPACE`, then
/// the nearest `wright.json` above the current directory.
fn locate_workspace(explicit: Option<&Path>) -> Result<PathBuf> {
  if let Some(path) = explicit {
    return Ok(path.to_path_buf());
  }

  if let Some(path) = std::env::var_os(WORKSPACE_ENV) {
    return Ok(PathBuf::from(path));
  }

  let cwd = std::env::current_dir().context("Failed to read current directory")?;
  Workspace::discover(&cwd).ok_or_else(|| anyhow!("No {} found in {} or its parents", WORKSPACE_FILENAME, cwd.display()))
}

/// Load the workspace and a ready architect with the built-in builders.
async fn open_architect(explicit: Option<&Path>) -> Result<Arc<Architect>> {
  let path = locate_workspace(explicit)?;
  let workspace = Workspace::load(&path)
    .await
    .with_context(|| format!("Failed to load workspace: {}", path.display()))?;

  let architect = Architect::new(Arc::new(workspace), Arc::new(builtin_modules()));
  architect.load().await.context("Failed to load project targets")?;
  Ok(architect)
}

/// Parse a `key=value` option override. Values are JSON when they parse as
/// JSON, strings otherwise.
fn parse_override(raw: &str) -> Result<(String, Value)> {
  let Some((key, value)) = raw.split_once('=') else {
    bail!("Invalid option '{}', expected key=value", raw);
  };
  if key.is_empty() {
    bail!("Invalid option '{}', key is empty", raw);
  }

  let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
  Ok((key.to_string(), value))
}
