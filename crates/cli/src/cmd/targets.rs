//! Implementation of the `wright targets` command.

use std::path::Path;

use anyhow::{Context, Result};

use wright_lib::TargetSpecifier;

use super::open_architect;
use crate::output::{OutputFormat, TargetRow, print_targets};

/// List the targets of a project with the builder each one uses.
pub fn cmd_targets(workspace: Option<&Path>, project: &str, output: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let architect = rt.block_on(open_architect(workspace))?;

  let mut rows = Vec::new();
  for target in architect.list_project_targets(project)? {
    let config = architect.get_builder_configuration(&TargetSpecifier::new(project, &target))?;
    rows.push(TargetRow {
      target,
      builder: config.builder,
    });
  }

  print_targets(project, &rows, output)
}
