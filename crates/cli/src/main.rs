mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_describe, cmd_run, cmd_targets};
use output::{OutputFormat, print_error};

/// wright - run builders for workspace targets
#[derive(Parser)]
#[command(name = "wright")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the workspace file (default: nearest wright.json)
  #[arg(short, long, global = true)]
  workspace: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the builder of a target
  Run {
    /// Target to run, as project:target[:configuration]
    target: String,

    /// Override a builder option (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,
  },

  /// List the targets of a project
  Targets {
    /// Project name
    project: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
  },

  /// Describe a builder
  Describe {
    /// Builder identifier, as package:builder
    builder: String,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(true) => {}
    Ok(false) => std::process::exit(1),
    Err(e) => {
      print_error(&format!("{:#}", e));
      std::process::exit(1);
    }
  }
}

fn run(cli: Cli) -> Result<bool> {
  let workspace = cli.workspace.as_deref();

  match cli.command {
    Commands::Run { target, options } => cmd_run(workspace, &target, &options),
    Commands::Targets { project, output } => cmd_targets(workspace, &project, output).map(|_| true),
    Commands::Describe { builder, output } => cmd_describe(workspace, &builder, output).map(|_| true),
  }
}
