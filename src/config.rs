//! Project configuration loader describing the dist layout, entries and tag policy.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{DistAssetsError, Result};
use crate::mode::DeploymentMode;
use crate::models::EntryPoint;
use crate::project::DistLayout;
use crate::tags::{ResolverSettings, StylesheetPolicy};
use crate::version::PackageIdentity;

/// File looked up in the project root by [`ProjectConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "dist_assets.config.json";

/// Discoverable project configuration describing filesystem layout and output paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  /// Web root relative to the project root.
  pub content_base: String,
  /// Output directory inside the web root, also the URL segment for built assets.
  pub out_path: String,
  /// Version stamp filename inside the output directory.
  pub version_file: String,
  /// Development server host.
  pub dev_server_host: String,
  /// Development server port.
  pub dev_server_port: u16,
  /// Named bundler entry points.
  pub entries: BTreeMap<String, EntryPoint>,
  /// `package.json` consulted for the stamp's name and version.
  pub package_json: String,
  /// Name used in the stamp when `package.json` is unavailable.
  pub app_name: String,
  /// Version used in the stamp when `package.json` is unavailable.
  pub app_version: String,
  /// Request URLs containing this marker never use the dev server.
  pub testing_domain_marker: String,
  /// Whether stylesheets get a tag outside production.
  pub stylesheet_policy: StylesheetPolicy,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    let layout = DistLayout::default();
    Self {
      content_base: layout.content_base,
      out_path: layout.out_path,
      version_file: layout.version_file,
      dev_server_host: layout.dev_server_host,
      dev_server_port: layout.dev_server_port,
      entries: BTreeMap::new(),
      package_json: "package.json".into(),
      app_name: "app".into(),
      app_version: "0.0.0".into(),
      testing_domain_marker: ".xip.io".into(),
      stylesheet_policy: StylesheetPolicy::default(),
    }
  }
}

impl ProjectConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to default
  /// values so downstream callers can continue operating with sensible assumptions.
  pub fn discover(project_root: &Path) -> Self {
    let candidate = project_root.join(DEFAULT_CONFIG_FILE);
    match Self::load(&candidate) {
      Ok(Some(config)) => config,
      Ok(None) => {
        debug!(path = %candidate.display(), "no project configuration, using defaults");
        Self::default()
      }
      Err(err) => {
        warn!(error = %err, "ignoring project configuration");
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file. A missing file is `Ok(None)`.
  pub fn load(path: &Path) -> Result<Option<Self>> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(source) => {
        return Err(DistAssetsError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    serde_json::from_str(&content)
      .map(Some)
      .map_err(|source| DistAssetsError::Parse {
        path: path.to_path_buf(),
        source,
      })
  }

  /// Convert the configuration into an owned layout description.
  pub fn to_layout(&self) -> DistLayout {
    DistLayout {
      content_base: self.content_base.clone(),
      out_path: self.out_path.clone(),
      version_file: self.version_file.clone(),
      dev_server_host: self.dev_server_host.clone(),
      dev_server_port: self.dev_server_port,
    }
  }

  /// Stamp identity from `package.json`, or the configured fallback.
  pub fn package_identity(&self, project_root: &Path) -> PackageIdentity {
    PackageIdentity::from_package_json(&project_root.join(&self.package_json)).unwrap_or_else(
      || PackageIdentity {
        name: self.app_name.clone(),
        version: self.app_version.clone(),
      },
    )
  }

  /// Settings for rendering asset tags of an application served at `app_url`.
  pub fn resolver_settings(
    &self,
    project_root: &Path,
    mode: DeploymentMode,
    app_url: impl Into<String>,
  ) -> ResolverSettings {
    let layout = self.to_layout();
    ResolverSettings {
      mode,
      app_url: app_url.into(),
      dev_server_url: layout.dev_server_public_path(),
      testing_domain_marker: self.testing_domain_marker.clone(),
      dist_segment: layout.dist_segment().to_string(),
      version_stamp_path: layout.version_stamp_path(project_root),
      stylesheet_policy: self.stylesheet_policy,
    }
  }
}
