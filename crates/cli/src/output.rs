//! Terminal rendering for build events, target listings and builder
//! descriptions.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde_json::{Value, json};

use wright_lib::{BuildEvent, BuilderDescription};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Text shown for a build event, or `None` for a silent success.
fn event_message(event: &BuildEvent) -> Option<String> {
  match (event.success, event.message.as_deref()) {
    (true, message) => message.map(str::to_string),
    (false, message) => Some(message.unwrap_or("builder reported a failure").to_string()),
  }
}

/// Print one event emitted by a running builder. Failures go to stderr.
pub fn print_event(event: &BuildEvent) {
  let Some(message) = event_message(event) else {
    return;
  };
  if event.success {
    print_info(&message);
  } else {
    print_error(&message);
  }
}

/// A target and the builder it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRow {
  pub target: String,
  pub builder: String,
}

fn targets_json(rows: &[TargetRow]) -> serde_json::Map<String, Value> {
  rows
    .iter()
    .map(|row| (row.target.clone(), json!({ "builder": row.builder })))
    .collect()
}

pub fn print_targets(project: &str, rows: &[TargetRow], format: OutputFormat) -> anyhow::Result<()> {
  if format.is_json() {
    return print_json(&targets_json(rows));
  }

  println!("Targets of {}:", project);
  for row in rows {
    print_stat(&row.target, &row.builder);
  }
  Ok(())
}

/// `(name, summary)` for every property an option schema declares.
fn option_rows(schema: &Value) -> Vec<(String, String)> {
  let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
    return Vec::new();
  };

  properties
    .iter()
    .map(|(name, property)| {
      let kind = property.get("type").and_then(Value::as_str).unwrap_or("any");
      let summary = match property.get("description").and_then(Value::as_str) {
        Some(text) => format!("{} - {}", kind, text),
        None => kind.to_string(),
      };
      (name.clone(), summary)
    })
    .collect()
}

pub fn print_description(description: &BuilderDescription, format: OutputFormat) -> anyhow::Result<()> {
  if format.is_json() {
    return print_json(description);
  }

  println!("{}", description.name);
  println!("  {}", description.description);

  let options = option_rows(&description.schema);
  if !options.is_empty() {
    println!();
    println!("Options:");
    for (name, summary) in options {
      print_stat(&name, &summary);
    }
  }
  Ok(())
}
