//! Bodies of the `dist-assets` subcommands, kept apart from argument parsing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::builder::{BuildArtifacts, BuildOrchestrator};
use crate::config::ProjectConfig;
use crate::mode::DeploymentMode;
use crate::project::BuildContext;
use crate::tags::{AssetTagResolver, StylesheetPolicy};
use crate::version::read_build_version;

/// Options of the `build` subcommand.
#[derive(Debug, Clone, Default)]
pub struct BuildCommand {
  /// Explicit mode; wins over anything in `args`.
  pub mode: Option<DeploymentMode>,
  /// Write the configuration JSON here instead of returning it for stdout.
  pub out: Option<PathBuf>,
  /// Bundler invocation arguments used for mode detection.
  pub args: Vec<String>,
}

impl BuildCommand {
  /// Mode this invocation builds for.
  pub fn resolved_mode(&self) -> DeploymentMode {
    self
      .mode
      .unwrap_or_else(|| DeploymentMode::from_args(&self.args))
  }
}

/// Options of the `tag` subcommand.
#[derive(Debug, Clone)]
pub struct TagCommand {
  /// Filenames relative to the dist directory.
  pub files: Vec<String>,
  /// Mode the served assets were built in.
  pub mode: DeploymentMode,
  /// Public base URL of the application.
  pub app_url: String,
  /// URL of the request being rendered, the application URL when absent.
  pub request_url: Option<String>,
  /// Link stylesheets outside production too.
  pub always_link_css: bool,
}

/// Run a build. The configuration JSON is written to `out` when set; the caller prints it
/// otherwise.
pub fn build(root: &Path, command: &BuildCommand) -> Result<BuildArtifacts> {
  let config = ProjectConfig::discover(root);
  let layout = config.to_layout();
  let package = config.package_identity(root);
  let orchestrator = BuildOrchestrator::new(BuildContext {
    project_root: root,
    layout: &layout,
    entries: &config.entries,
    package: &package,
  });

  let mode = command.resolved_mode();
  let artifacts = orchestrator
    .run(mode)
    .with_context(|| format!("{mode} build failed"))?;

  if let Some(path) = &command.out {
    fs::write(path, &artifacts.config_json)
      .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote bundler configuration");
  }

  Ok(artifacts)
}

/// Render the tags for `command.files`, one per line.
pub fn tags(root: &Path, command: &TagCommand) -> String {
  let config = ProjectConfig::discover(root);
  let mut settings = config.resolver_settings(root, command.mode, command.app_url.clone());
  if command.always_link_css {
    settings.stylesheet_policy = StylesheetPolicy::AlwaysLink;
  }

  let request_url = command.request_url.as_deref().unwrap_or(&command.app_url);
  AssetTagResolver::new(&settings, request_url).resolve_all(&command.files)
}

/// Current cache-busting token.
pub fn version(root: &Path) -> String {
  let config = ProjectConfig::discover(root);
  read_build_version(&config.to_layout().version_stamp_path(root))
}
