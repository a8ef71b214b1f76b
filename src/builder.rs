//! Build orchestrator assembling bundler configurations and writing the version stamp.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::asset_paths::FileType;
use crate::bundle::loaders::rules_for;
use crate::bundle::plugins::{minimizers_for, plugins_for};
use crate::error::Result;
use crate::mode::DeploymentMode;
use crate::models::{
  BundlerConfig, DevServerConfig, ModuleConfig, OptimizationConfig, OutputConfig, ResolveConfig,
};
use crate::project::BuildContext;
use crate::version::VersionStamp;

const RESOLVE_EXTENSIONS: [&str; 2] = [".js", ".jsx"];
const INLINE_SOURCE_MAP: &str = "inline-source-map";

/// Everything one build run produced.
#[derive(Debug)]
pub struct BuildArtifacts {
  /// Mode the configuration was assembled for.
  pub mode: DeploymentMode,
  /// Configuration handed to the bundler.
  pub config: BundlerConfig,
  /// `config` serialised as prettified JSON.
  pub config_json: String,
  /// Path of the version stamp, when this mode writes one.
  pub version_stamp: Option<PathBuf>,
}

/// Turns a [`DeploymentMode`] into a bundler configuration.
pub struct BuildOrchestrator<'a> {
  context: BuildContext<'a>,
}

impl<'a> BuildOrchestrator<'a> {
  /// Create an orchestrator for the provided build context.
  pub fn new(context: BuildContext<'a>) -> Self {
    Self { context }
  }

  /// Configuration for `mode`, stamped with the current time.
  pub fn build(&self, mode: DeploymentMode) -> BundlerConfig {
    self.build_at(mode, Utc::now())
  }

  /// Configuration for `mode` as if the build started at `built_at`.
  pub fn build_at(&self, mode: DeploymentMode, built_at: DateTime<Utc>) -> BundlerConfig {
    let stamp = self.stamp(built_at);
    self.assemble(mode, &stamp)
  }

  /// Assemble the configuration and, for file builds, write the version stamp.
  pub fn run(&self, mode: DeploymentMode) -> Result<BuildArtifacts> {
    self.run_at(mode, Utc::now())
  }

  /// [`Self::run`] with an explicit build instant.
  pub fn run_at(
    &self,
    mode: DeploymentMode,
    built_at: DateTime<Utc>,
  ) -> Result<BuildArtifacts> {
    let stamp = self.stamp(built_at);
    let config = self.assemble(mode, &stamp);
    let config_json = serde_json::to_string_pretty(&config)?;

    let version_stamp = if mode.writes_version_stamp() {
      let path = self
        .context
        .layout
        .version_stamp_path(self.context.project_root);
      stamp.write_to(&path)?;
      Some(path)
    } else {
      debug!(%mode, "dev server build, skipping version stamp");
      None
    };

    info!(
      %mode,
      rules = config.module.rules.len(),
      plugins = config.plugins.len(),
      "assembled bundler configuration"
    );

    Ok(BuildArtifacts {
      mode,
      config,
      config_json,
      version_stamp,
    })
  }

  fn stamp(&self, built_at: DateTime<Utc>) -> VersionStamp {
    VersionStamp::new(self.context.package.clone(), built_at)
  }

  fn assemble(&self, mode: DeploymentMode, stamp: &VersionStamp) -> BundlerConfig {
    let layout = self.context.layout;
    let development = mode == DeploymentMode::Development;

    let output = OutputConfig {
      path: layout.dist_dir(self.context.project_root),
      public_path: development.then(|| layout.dev_server_public_path()),
      filename: "[name].js".into(),
    };

    let rules = FileType::ALL
      .into_iter()
      .flat_map(|file_type| rules_for(mode, file_type, layout))
      .collect();

    BundlerConfig {
      entry: self.context.entries.clone(),
      output,
      resolve: ResolveConfig {
        extensions: RESOLVE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
      },
      optimization: OptimizationConfig {
        node_env: mode.node_env().into(),
        minimizer: minimizers_for(mode),
      },
      devtool: (!mode.is_production()).then(|| INLINE_SOURCE_MAP.to_string()),
      dev_server: development.then(|| self.dev_server()),
      plugins: plugins_for(mode, layout, stamp),
      module: ModuleConfig { rules },
      bail: mode.is_production(),
    }
  }

  fn dev_server(&self) -> DevServerConfig {
    let layout = self.context.layout;
    let headers = BTreeMap::from([
      ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
      (
        "Access-Control-Allow-Methods".to_string(),
        "GET, POST, PUT, DELETE, PATCH, OPTIONS".to_string(),
      ),
      (
        "Access-Control-Allow-Headers".to_string(),
        "X-Requested-With, content-type, Authorization".to_string(),
      ),
    ]);

    DevServerConfig {
      headers,
      public_path: layout.dev_server_public_path(),
      content_base: layout.content_base_dir(self.context.project_root),
      hot: true,
      hot_only: false,
      port: layout.dev_server_port,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asset_paths::asset_output_name;
  use crate::models::{EntryPoint, VendorScope};
  use crate::project::DistLayout;
  use crate::version::{PackageIdentity, read_build_version};
  use chrono::TimeZone;
  use std::path::Path;
  use tempfile::tempdir;

  fn entries() -> BTreeMap<String, EntryPoint> {
    BTreeMap::from([("app".to_string(), EntryPoint::Single("./src/app.js".into()))])
  }

  fn package() -> PackageIdentity {
    PackageIdentity {
      name: "app".into(),
      version: "1.0.0".into(),
    }
  }

  fn built_at() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
  }

  #[test]
  fn production_config_minifies_and_bails() {
    let layout = DistLayout::default();
    let (entries, package) = (entries(), package());
    let orchestrator = BuildOrchestrator::new(BuildContext {
      project_root: Path::new("/srv/app"),
      layout: &layout,
      entries: &entries,
      package: &package,
    });

    let config = orchestrator.build_at(DeploymentMode::Production, built_at());

    assert!(config.bail);
    assert_eq!(config.devtool, None);
    assert_eq!(config.optimization.node_env, "production");
    assert_eq!(config.optimization.minimizer.len(), 2);
    assert_eq!(config.output.path, PathBuf::from("/srv/app/public/dist"));
    assert_eq!(config.output.public_path, None);
    assert!(config.has_plugin("mini-css-extract-plugin"));
    assert!(config.has_plugin("webpack-version-file"));
    assert!(config.dev_server.is_none());
  }

  #[test]
  fn development_config_serves_from_dev_server() {
    let layout = DistLayout::default();
    let (entries, package) = (entries(), package());
    let orchestrator = BuildOrchestrator::new(BuildContext {
      project_root: Path::new("/srv/app"),
      layout: &layout,
      entries: &entries,
      package: &package,
    });

    let config = orchestrator.build_at(DeploymentMode::Development, built_at());
    let dev_server = config.dev_server.as_ref().unwrap();

    assert_eq!(
      config.output.public_path.as_deref(),
      Some("http://localhost:8080/dist/")
    );
    assert_eq!(dev_server.port, 8080);
    assert!(dev_server.hot);
    assert_eq!(dev_server.headers["Access-Control-Allow-Origin"], "*");
    assert_eq!(dev_server.content_base, PathBuf::from("/srv/app/public"));
    assert!(!config.has_plugin("webpack-version-file"));
    assert!(config.has_plugin("webpack.HotModuleReplacementPlugin"));
    assert_eq!(config.devtool.as_deref(), Some("inline-source-map"));
  }

  #[test]
  fn rules_follow_file_type_order() {
    let layout = DistLayout::default();
    let (entries, package) = (entries(), package());
    let orchestrator = BuildOrchestrator::new(BuildContext {
      project_root: Path::new("."),
      layout: &layout,
      entries: &entries,
      package: &package,
    });

    let config = orchestrator.build_at(DeploymentMode::Debug, built_at());
    let order: Vec<FileType> = config.module.rules.iter().map(|rule| rule.file_type).collect();

    assert_eq!(
      order,
      [
        FileType::Asset,
        FileType::Asset,
        FileType::Css,
        FileType::Sass,
        FileType::Less,
        FileType::Stylus,
        FileType::Js,
      ]
    );
    assert_eq!(
      config.module.rules.last().unwrap().vendor,
      VendorScope::Excluded
    );
  }

  #[test]
  fn package_assets_keep_their_package_directory() {
    let layout = DistLayout::default();
    let (entries, package) = (entries(), package());
    let orchestrator = BuildOrchestrator::new(BuildContext {
      project_root: Path::new("/srv/app"),
      layout: &layout,
      entries: &entries,
      package: &package,
    });

    let config = orchestrator.build_at(DeploymentMode::Production, built_at());
    let name_for = |path: &str| {
      let loaders = config.loaders_for(path).unwrap();
      let options = loaders[0].options.as_ref().unwrap();
      options["name"].as_str().unwrap().to_string()
    };

    let vendored = "/srv/app/node_modules/font-awesome/fonts/fa.woff";
    assert_eq!(name_for(vendored), "vendors/[1]/assets/[name].[ext]");
    assert_eq!(
      name_for(vendored).replace("[1]", "font-awesome"),
      asset_output_name(vendored)
    );

    let local = "/srv/app/resources/fonts/fa.woff";
    assert_eq!(name_for(local), asset_output_name(local));

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("vendors/[1]/assets/[name].[ext]"));
  }

  #[test]
  fn run_writes_stamp_for_file_builds_only() {
    let temp = tempdir().unwrap();
    let layout = DistLayout::default();
    let (entries, package) = (entries(), package());
    let orchestrator = BuildOrchestrator::new(BuildContext {
      project_root: temp.path(),
      layout: &layout,
      entries: &entries,
      package: &package,
    });

    let dev = orchestrator
      .run_at(DeploymentMode::Development, built_at())
      .unwrap();
    assert!(dev.version_stamp.is_none());
    assert!(!layout.version_stamp_path(temp.path()).exists());

    let prod = orchestrator
      .run_at(DeploymentMode::Production, built_at())
      .unwrap();
    let stamp_path = prod.version_stamp.unwrap();
    assert_eq!(stamp_path, layout.version_stamp_path(temp.path()));
    assert_eq!(read_build_version(&stamp_path), "1700000000");
    assert!(prod.config_json.contains("\"bail\": true"));
  }
}
