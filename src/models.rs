//! Data structures describing one bundler run.
//!
//! Everything here serialises to the JSON shape the bundler's config file expects, so a thin
//! JavaScript shim can `require` the output of `dist-assets build` directly.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::asset_paths::{FileType, VENDOR_DIRS_PATTERN, is_vendor_path};

/// Source files behind one named entry point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum EntryPoint {
  /// A single module.
  Single(String),
  /// Several modules bundled into one chunk.
  Many(Vec<String>),
}

/// Complete configuration for one bundler invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
  /// Named entry points.
  pub entry: BTreeMap<String, EntryPoint>,
  /// Where and how bundles are written.
  pub output: OutputConfig,
  /// Module resolution settings.
  pub resolve: ResolveConfig,
  /// Optimisation profile.
  pub optimization: OptimizationConfig,
  /// Source map style, when one is generated.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub devtool: Option<String>,
  /// Live-reload server, development builds only.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dev_server: Option<DevServerConfig>,
  /// Plugins in registration order.
  pub plugins: Vec<PluginSpec>,
  /// Per-file-type transformation rules.
  pub module: ModuleConfig,
  /// Abort on the first error instead of emitting partial output.
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub bail: bool,
}

impl BundlerConfig {
  /// Loader chain the bundler would apply to `path`, if any rule claims it.
  pub fn loaders_for(&self, path: &str) -> Option<&[Loader]> {
    let file_type = FileType::classify(path)?;
    self
      .module
      .rules
      .iter()
      .find(|rule| rule.file_type == file_type && rule.vendor.admits(path))
      .map(|rule| rule.loaders.as_slice())
  }

  /// Whether a plugin with the given package name is registered.
  pub fn has_plugin(&self, name: &str) -> bool {
    self.plugins.iter().any(|plugin| plugin.name() == name)
  }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
  /// Absolute directory bundles are written to.
  pub path: PathBuf,
  /// URL prefix for emitted assets when they are not served from `path`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub public_path: Option<String>,
  /// Bundle filename template.
  pub filename: String,
}

/// Module resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveConfig {
  /// Extensions tried when an import omits one.
  pub extensions: Vec<String>,
}

/// Optimisation profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationConfig {
  /// Value substituted for `process.env.NODE_ENV`.
  pub node_env: String,
  /// Minifiers, empty outside production.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub minimizer: Vec<PluginSpec>,
}

/// Live-reload development server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServerConfig {
  /// Headers attached to every response.
  pub headers: BTreeMap<String, String>,
  /// URL prefix bundles are served under.
  pub public_path: String,
  /// Directory static files are served from.
  pub content_base: PathBuf,
  /// Enable hot module replacement.
  pub hot: bool,
  /// Refuse full page reloads when a hot update fails.
  pub hot_only: bool,
  /// Listening port.
  pub port: u16,
}

/// Transformation rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleConfig {
  /// Rules in match order.
  pub rules: Vec<Rule>,
}

/// Loader chain applied to one file type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
  /// File type the rule matches, serialised as its pattern.
  #[serde(rename = "test")]
  pub file_type: FileType,
  /// Loaders, last one runs first.
  #[serde(rename = "use")]
  pub loaders: Vec<Loader>,
  /// Which side of the third-party package boundary the rule covers.
  #[serde(flatten)]
  pub vendor: VendorScope,
}

impl Rule {
  /// Rule covering every file of `file_type`.
  pub fn new(file_type: FileType, loaders: Vec<Loader>) -> Self {
    Self {
      file_type,
      loaders,
      vendor: VendorScope::Any,
    }
  }

  /// Restrict the rule to one side of the package boundary.
  pub fn scoped(mut self, vendor: VendorScope) -> Self {
    self.vendor = vendor;
    self
  }

  /// Whether this rule claims `path`.
  pub fn applies_to(&self, path: &str) -> bool {
    self.file_type.matches(path) && self.vendor.admits(path)
  }
}

/// Restriction of a rule relative to `node_modules`/`bower_components`.
///
/// Serialises as nothing, an `include` key or an `exclude` key carrying the vendor pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VendorScope {
  /// No restriction.
  #[default]
  Any,
  /// Only paths inside package directories.
  Only,
  /// Only paths outside package directories.
  Excluded,
}

impl VendorScope {
  /// Whether `path` falls on this side of the boundary.
  pub fn admits(self, path: &str) -> bool {
    match self {
      VendorScope::Any => true,
      VendorScope::Only => is_vendor_path(path),
      VendorScope::Excluded => !is_vendor_path(path),
    }
  }
}

impl Serialize for VendorScope {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let key = match self {
      VendorScope::Any => None,
      VendorScope::Only => Some("include"),
      VendorScope::Excluded => Some("exclude"),
    };

    let mut map = serializer.serialize_map(Some(key.iter().len()))?;
    if let Some(key) = key {
      map.serialize_entry(key, VENDOR_DIRS_PATTERN)?;
    }
    map.end()
  }
}

/// One loader and its options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loader {
  /// Package name or path of the loader.
  pub loader: String,
  /// Loader options.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub options: Option<Value>,
}

impl Loader {
  /// Loader with options.
  pub fn new(loader: impl Into<String>, options: Value) -> Self {
    Self {
      loader: loader.into(),
      options: Some(options),
    }
  }

  /// Loader without options.
  pub fn bare(loader: impl Into<String>) -> Self {
    Self {
      loader: loader.into(),
      options: None,
    }
  }
}

/// Data injected into the version-file template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionFileData {
  /// Unix timestamp of the build.
  pub build_string: i64,
}

/// Plugins the orchestrator knows how to register.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "plugin", content = "options", rename_all_fields = "camelCase")]
pub enum PluginSpec {
  /// Pull stylesheets out of the script bundle into standalone files.
  #[serde(rename = "mini-css-extract-plugin")]
  ExtractCss {
    /// Stylesheet filename template.
    filename: String,
  },
  /// Write the version stamp.
  #[serde(rename = "webpack-version-file")]
  VersionFile {
    /// Stamp path relative to the project root.
    output: PathBuf,
    /// Template values.
    data: VersionFileData,
    /// Stamp template.
    template_string: String,
  },
  /// Hot module replacement runtime.
  #[serde(rename = "webpack.HotModuleReplacementPlugin")]
  HotModuleReplacement,
  /// Readable module names in hot-update logs.
  #[serde(rename = "webpack.NamedModulesPlugin")]
  NamedModules,
  /// Script minifier.
  #[serde(rename = "uglifyjs-webpack-plugin")]
  UglifyJs {
    /// Emit source maps for minified output.
    source_map: bool,
    /// Options forwarded to the minifier.
    uglify_options: Value,
  },
  /// Stylesheet minifier.
  #[serde(rename = "optimize-css-assets-webpack-plugin")]
  MinifyCss,
}

impl PluginSpec {
  /// Package name the plugin is registered under.
  pub fn name(&self) -> &'static str {
    match self {
      PluginSpec::ExtractCss { .. } => "mini-css-extract-plugin",
      PluginSpec::VersionFile { .. } => "webpack-version-file",
      PluginSpec::HotModuleReplacement => "webpack.HotModuleReplacementPlugin",
      PluginSpec::NamedModules => "webpack.NamedModulesPlugin",
      PluginSpec::UglifyJs { .. } => "uglifyjs-webpack-plugin",
      PluginSpec::MinifyCss => "optimize-css-assets-webpack-plugin",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn entry_points_accept_strings_and_lists() {
    let entries: BTreeMap<String, EntryPoint> =
      serde_json::from_str(r#"{"app": "./app.js", "admin": ["./polyfill.js", "./admin.js"]}"#)
        .unwrap();

    assert_eq!(entries["app"], EntryPoint::Single("./app.js".into()));
    assert_eq!(
      entries["admin"],
      EntryPoint::Many(vec!["./polyfill.js".into(), "./admin.js".into()])
    );
  }

  #[test]
  fn rule_serialises_test_use_and_exclude() {
    let rule = Rule::new(FileType::Js, vec![Loader::bare("babel-loader")])
      .scoped(VendorScope::Excluded);

    assert_eq!(
      serde_json::to_value(&rule).unwrap(),
      json!({
        "test": r"\.jsx?$",
        "use": [{ "loader": "babel-loader" }],
        "exclude": "(node_modules|bower_components)",
      })
    );
  }

  #[test]
  fn rule_without_exclusion_omits_the_key() {
    let rule = Rule::new(FileType::Css, Vec::new());

    let value = serde_json::to_value(&rule).unwrap();
    assert!(value.get("exclude").is_none());
    assert!(value.get("include").is_none());
  }

  #[test]
  fn vendor_only_rule_serialises_include() {
    let rule = Rule::new(FileType::Asset, Vec::new()).scoped(VendorScope::Only);

    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(value["include"], "(node_modules|bower_components)");
    assert!(rule.applies_to("node_modules/slick/ajax-loader.gif"));
    assert!(!rule.applies_to("resources/img/logo.png"));
  }

  #[test]
  fn plugins_serialise_with_name_and_options() {
    let plugin = PluginSpec::VersionFile {
      output: PathBuf::from("public/dist/version.txt"),
      data: VersionFileData {
        build_string: 1_700_000_000,
      },
      template_string: "t".into(),
    };

    assert_eq!(
      serde_json::to_value(&plugin).unwrap(),
      json!({
        "plugin": "webpack-version-file",
        "options": {
          "output": "public/dist/version.txt",
          "data": { "buildString": 1_700_000_000 },
          "templateString": "t",
        },
      })
    );
    assert_eq!(
      serde_json::to_value(PluginSpec::NamedModules).unwrap(),
      json!({ "plugin": "webpack.NamedModulesPlugin" })
    );
  }
}
