//! dist-assets CLI
//!
//! - `build`: assemble the bundler configuration and write the version stamp
//! - `tag`: print asset tags for a page
//! - `version`: print the current cache-busting token

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dist_assets::DeploymentMode;
use dist_assets::commands::{self, BuildCommand, TagCommand};

#[derive(Parser)]
#[command(name = "dist-assets")]
#[command(author, version, about = "Bundler configuration and cache-busted asset tags", long_about = None)]
struct Cli {
  /// Project root containing dist_assets.config.json
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the bundler configuration; production and debug builds also write the version stamp
  Build {
    /// Build mode; detected from the trailing bundler arguments when omitted
    #[arg(long)]
    mode: Option<DeploymentMode>,

    /// Write the configuration JSON to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Bundler invocation arguments (e.g. `webpack-dev-server`, `production`)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
  },

  /// Print asset tags for the given files
  Tag {
    /// Filenames relative to the dist directory
    #[arg(required = true)]
    files: Vec<String>,

    /// Mode the served assets were built in
    #[arg(long)]
    mode: DeploymentMode,

    /// Public base URL of the application
    #[arg(long)]
    app_url: String,

    /// URL of the request being rendered; defaults to the application URL
    #[arg(long)]
    request_url: Option<String>,

    /// Link stylesheets outside production too
    #[arg(long)]
    always_link_css: bool,
  },

  /// Print the build token from the version stamp
  Version,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Build { mode, out, args } => {
      let command = BuildCommand { mode, out, args };
      let artifacts = commands::build(&cli.root, &command)?;
      if command.out.is_none() {
        println!("{}", artifacts.config_json);
      }
    }
    Commands::Tag {
      files,
      mode,
      app_url,
      request_url,
      always_link_css,
    } => {
      let command = TagCommand {
        files,
        mode,
        app_url,
        request_url,
        always_link_css,
      };
      println!("{}", commands::tags(&cli.root, &command));
    }
    Commands::Version => println!("{}", commands::version(&cli.root)),
  }

  Ok(())
}
