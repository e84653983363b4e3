//! Implementation of the `wright describe` command.

use std::path::Path;

use anyhow::{Context, Result};

use super::open_architect;
use crate::output::{OutputFormat, print_description};

/// Print a builder's description and the options its schema declares.
pub fn cmd_describe(workspace: Option<&Path>, builder: &str, output: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let description = rt.block_on(async {
    let architect = open_architect(workspace).await?;
    architect
      .get_builder_description(builder)
      .await
      .with_context(|| format!("Failed to describe {}", builder))
  })?;

  print_description(&description, output)
}
