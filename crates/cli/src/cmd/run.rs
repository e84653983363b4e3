//! Implementation of the `wright run` command.
//!
//! Composes the configuration of a target, runs its builder and reports every
//! event the builder emits.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use futures::StreamExt;
use serde_json::Map;
use tracing::info_span;

use wright_lib::TargetSpecifier;
use wright_lib::builder::PartialContext;

use super::{open_architect, parse_override};
use crate::output::{format_duration, print_error, print_event, print_info, print_success, symbols};

/// Execute the run command.
///
/// Returns whether every event reported by the builder was successful.
pub fn cmd_run(workspace: Option<&Path>, target: &str, options: &[String]) -> Result<bool> {
  let mut specifier = TargetSpecifier::parse(target)
    .ok_or_else(|| anyhow!("Invalid target '{}', expected project:target[:configuration]", target))?;

  if !options.is_empty() {
    let mut overrides = Map::new();
    for raw in options {
      let (key, value) = parse_override(raw)?;
      overrides.insert(key, value);
    }
    specifier = specifier.with_overrides(overrides);
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(run(workspace, &specifier))
}

async fn run(workspace: Option<&Path>, specifier: &TargetSpecifier) -> Result<bool> {
  let started = Instant::now();
  let architect = open_architect(workspace).await?;

  let config = architect
    .get_builder_configuration(specifier)
    .with_context(|| format!("Failed to configure {}", specifier))?;
  print_info(&format!("{} {} {}", specifier, symbols::ARROW, config.builder));

  let span = info_span!("builder", project = %specifier.project, target = %specifier.target);
  let context = PartialContext::default()
    .with_logger(span)
    .with_extra("target", serde_json::Value::String(specifier.to_string()));

  let mut output = architect
    .run(config, context)
    .await
    .with_context(|| format!("Failed to run {}", specifier))?;

  let mut success = true;
  let mut events = 0usize;
  while let Some(event) = output.next().await {
    events += 1;
    success &= event.success;
    print_event(&event);
  }

  if events == 0 {
    print_error("builder finished without reporting a result");
    return Ok(false);
  }

  let elapsed = format_duration(started.elapsed());
  if success {
    print_success(&format!("{} succeeded in {}", specifier, elapsed));
  } else {
    print_error(&format!("{} failed after {}", specifier, elapsed));
  }

  Ok(success)
}
