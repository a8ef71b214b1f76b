//! Rules and loader chains per file type and deployment mode.

use serde_json::json;

use crate::asset_paths::{
  ASSET_NAME_TEMPLATE, FileType, VENDOR_ASSET_NAME_TEMPLATE, VENDOR_PACKAGE_PATTERN,
};
use crate::mode::DeploymentMode;
use crate::models::{Loader, Rule, VendorScope};
use crate::project::DistLayout;

/// Loader exported by the CSS extract plugin.
pub const EXTRACT_CSS_LOADER: &str = "mini-css-extract-plugin/loader";

/// Rules for `file_type`, in match order.
///
/// Assets get two rules so package assets are copied under `vendors/<package>/`. Scripts
/// inside package directories are left untranspiled.
pub fn rules_for(mode: DeploymentMode, file_type: FileType, layout: &DistLayout) -> Vec<Rule> {
  if file_type.is_stylesheet() {
    return vec![Rule::new(file_type, stylesheet_chain(mode, preprocessor(file_type)))];
  }

  match file_type {
    FileType::Asset => vec![
      Rule::new(file_type, vec![file_loader(mode, layout, VendorScope::Only)])
        .scoped(VendorScope::Only),
      Rule::new(file_type, vec![file_loader(mode, layout, VendorScope::Excluded)])
        .scoped(VendorScope::Excluded),
    ],
    _ => vec![Rule::new(file_type, vec![babel_loader(mode)]).scoped(VendorScope::Excluded)],
  }
}

fn preprocessor(file_type: FileType) -> Option<&'static str> {
  match file_type {
    FileType::Sass => Some("sass-loader"),
    FileType::Less => Some("less-loader"),
    FileType::Stylus => Some("stylus-loader"),
    _ => None,
  }
}

fn stylesheet_chain(mode: DeploymentMode, preprocessor: Option<&str>) -> Vec<Loader> {
  let mut chain = vec![stylesheet_sink(mode), css_loader(), postcss_loader()];
  if let Some(loader) = preprocessor {
    chain.push(Loader::new(loader, json!({ "sourceMap": true })));
  }
  chain
}

// Development injects styles from the script bundle; file builds extract them.
fn stylesheet_sink(mode: DeploymentMode) -> Loader {
  match mode {
    DeploymentMode::Development => Loader::new("style-loader", json!({ "sourceMap": true })),
    DeploymentMode::Production | DeploymentMode::Debug => Loader::bare(EXTRACT_CSS_LOADER),
  }
}

fn css_loader() -> Loader {
  Loader::new("css-loader", json!({ "url": true, "sourceMap": true }))
}

fn postcss_loader() -> Loader {
  Loader::new(
    "postcss-loader",
    json!({
      "ident": "postcss",
      "plugins": ["postcss-cssnext"],
      "sourceMap": true,
    }),
  )
}

fn file_loader(mode: DeploymentMode, layout: &DistLayout, scope: VendorScope) -> Loader {
  let mut options = if scope == VendorScope::Only {
    json!({ "name": VENDOR_ASSET_NAME_TEMPLATE, "regExp": VENDOR_PACKAGE_PATTERN })
  } else {
    json!({ "name": ASSET_NAME_TEMPLATE })
  };
  if mode == DeploymentMode::Development {
    options["publicPath"] = json!(layout.dev_server_public_path());
  }
  Loader::new("file-loader", options)
}

fn babel_loader(mode: DeploymentMode) -> Loader {
  let mut plugins = vec!["transform-object-rest-spread"];
  if mode == DeploymentMode::Development {
    plugins.push("react-hot-loader/babel");
  }

  Loader::new(
    "babel-loader",
    json!({
      "presets": ["env", "react", "stage-0"],
      "plugins": plugins,
      "babelrc": false,
    }),
  )
}
