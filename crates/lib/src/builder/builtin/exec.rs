//! Exec builder.
//!
//! Runs a shell command for a project:
//!
//! ```json
//! { "command": "cargo build", "cwd": "crates/app", "env": { "RUSTFLAGS": "-Dwarnings" } }
//! ```
//!
//! `cwd` is relative to the workspace root and defaults to the project root.

use std::collections::BTreeMap;
use std::path::PathBuf;

use futures::StreamExt;
use futures::stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;
use tracing::{Instrument, debug, info};

use crate::builder::{BuildEvent, BuildOutput, Builder, BuilderContext};
use crate::target::BuilderConfiguration;

/// Options accepted by the exec builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecOptions {
  /// Command line, passed to the shell.
  pub command: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cwd: Option<String>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub env: BTreeMap<String, String>,
  /// Shell to run the command with instead of the platform default.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub shell: Option<String>,
}

/// Runs a shell command and reports whether it exited successfully.
#[derive(Debug)]
pub struct ExecBuilder {
  context: BuilderContext,
}

impl ExecBuilder {
  pub fn factory(context: BuilderContext) -> Box<dyn Builder> {
    Box::new(Self { context })
  }
}

impl Builder for ExecBuilder {
  fn run(&self, config: BuilderConfiguration) -> BuildOutput {
    let span = self.context.logger.clone();
    let workspace_root = self.context.workspace.root().to_path_buf();

    let task = async move {
      let options: ExecOptions = match serde_json::from_value(Value::Object(config.options)) {
        Ok(options) => options,
        Err(e) => return BuildEvent::failure(format!("invalid exec options: {}", e)),
      };

      let cwd = workspace_root.join(options.cwd.as_deref().unwrap_or(&config.root));
      execute(&options, cwd).await
    };

    stream::once(task.instrument(span)).boxed()
  }
}

async fn execute(options: &ExecOptions, cwd: PathBuf) -> BuildEvent {
  info!(command = %options.command, cwd = %cwd.display(), "executing command");

  let (shell, shell_args) = get_shell(options.shell.as_deref());

  let mut command = Command::new(&shell);
  command
    .args(&shell_args)
    .arg(&options.command)
    .current_dir(&cwd)
    .envs(&options.env);

  let output = match command.output().await {
    Ok(output) => output,
    Err(e) => return BuildEvent::failure(format!("failed to spawn {}: {}", shell, e)),
  };

  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);
  if !stdout.is_empty() {
    info!(stdout = %stdout.trim_end(), "command stdout");
  }
  if !stderr.is_empty() {
    debug!(stderr = %stderr.trim_end(), "command stderr");
  }

  if output.status.success() {
    BuildEvent::success()
  } else {
    let code = output
      .status
      .code()
      .map(|c| c.to_string())
      .unwrap_or_else(|| "signal".to_string());
    BuildEvent::failure(format!("command failed with exit code {}: {}", code, options.command))
  }
}

/// Shell and the argument used to pass it a command.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    ("cmd.exe".to_string(), vec!["/C".to_string()])
  }
}
