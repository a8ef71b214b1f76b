//! Plugin and minimizer registration per deployment mode.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::mode::DeploymentMode;
use crate::models::{PluginSpec, VersionFileData};
use crate::project::DistLayout;
use crate::version::{STAMP_TEMPLATE, VersionStamp};

/// Plugins registered for `mode`. File builds get the stamp plugin fed from `stamp`.
pub fn plugins_for(
  mode: DeploymentMode,
  layout: &DistLayout,
  stamp: &VersionStamp,
) -> Vec<PluginSpec> {
  match mode {
    DeploymentMode::Development => vec![PluginSpec::HotModuleReplacement, PluginSpec::NamedModules],
    DeploymentMode::Production | DeploymentMode::Debug => vec![
      PluginSpec::ExtractCss {
        filename: "[name].css".into(),
      },
      PluginSpec::VersionFile {
        output: relative_stamp_path(layout),
        data: VersionFileData {
          build_string: stamp.built_at.timestamp(),
        },
        template_string: STAMP_TEMPLATE.into(),
      },
    ],
  }
}

/// Minifiers, production only.
pub fn minimizers_for(mode: DeploymentMode) -> Vec<PluginSpec> {
  if !mode.is_production() {
    return Vec::new();
  }

  vec![
    PluginSpec::UglifyJs {
      source_map: false,
      uglify_options: json!({
        "output": { "comments": false },
        "compress": { "warnings": false },
      }),
    },
    PluginSpec::MinifyCss,
  ]
}

fn relative_stamp_path(layout: &DistLayout) -> PathBuf {
  layout.version_stamp_path(Path::new(""))
}
