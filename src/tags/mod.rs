//! Render `<link>`/`<script>` tags for built assets.
//!
//! A resolver is cheap to create and is meant to be built per request: it borrows the
//! long-lived [`ResolverSettings`] and the URL of the request being rendered. Nothing is
//! cached between calls, so a new production build is picked up on the next render.

mod reference;
mod url;

use std::path::PathBuf;

use serde::Deserialize;

pub use reference::{AssetKind, AssetReference};
pub use url::dist_base_url;

use crate::mode::DeploymentMode;
use crate::version::read_build_version;

/// Whether stylesheets get their own tag outside production.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylesheetPolicy {
  /// Development and debug bundles inject styles from the script, so no `<link>` is emitted.
  #[default]
  InlinedOutsideProduction,
  /// Always link stylesheets; only production adds the version query.
  AlwaysLink,
}

/// Long-lived settings for rendering asset tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
  /// Mode the served assets were built in.
  pub mode: DeploymentMode,
  /// Public base URL of the application.
  pub app_url: String,
  /// Dist URL on the development server, ending in `/`.
  pub dev_server_url: String,
  /// Request URLs containing this marker bypass the development server.
  pub testing_domain_marker: String,
  /// URL segment built assets live under on the public site.
  pub dist_segment: String,
  /// Version stamp written by release builds.
  pub version_stamp_path: PathBuf,
  /// Stylesheet handling outside production.
  pub stylesheet_policy: StylesheetPolicy,
}

/// Resolves asset filenames into markup for one request.
#[derive(Debug, Clone, Copy)]
pub struct AssetTagResolver<'a> {
  settings: &'a ResolverSettings,
  request_url: &'a str,
}

impl<'a> AssetTagResolver<'a> {
  /// Resolver for a request to `request_url`.
  pub fn new(settings: &'a ResolverSettings, request_url: &'a str) -> Self {
    Self {
      settings,
      request_url,
    }
  }

  /// Markup for `filename`, or an empty string when no tag should be emitted.
  ///
  /// Unrecognised suffixes are not an error; they simply render nothing.
  pub fn resolve(&self, filename: &str) -> String {
    let Some(reference) = AssetReference::classify(filename) else {
      return String::new();
    };

    let production = self.settings.mode.is_production();
    match reference.kind {
      AssetKind::Stylesheet => {
        let inlined =
          self.settings.stylesheet_policy == StylesheetPolicy::InlinedOutsideProduction;
        if !production && inlined {
          return String::new();
        }
        stylesheet_tag(&self.asset_url(reference.filename, production))
      }
      AssetKind::Script => script_tag(&self.asset_url(reference.filename, production)),
    }
  }

  /// Tags for several files joined by newlines, skipping files that render nothing.
  pub fn resolve_all<I, S>(&self, filenames: I) -> String
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    filenames
      .into_iter()
      .map(|filename| self.resolve(filename.as_ref()))
      .filter(|tag| !tag.is_empty())
      .collect::<Vec<_>>()
      .join("\n")
  }

  /// Base URL assets are served from.
  pub fn dist_base_url(&self) -> String {
    dist_base_url(self.settings, self.request_url)
  }

  /// Cache-busting token from the version stamp, `"1"` when there is none.
  pub fn build_version(&self) -> String {
    read_build_version(&self.settings.version_stamp_path)
  }

  fn asset_url(&self, filename: &str, versioned: bool) -> String {
    let mut url = self.dist_base_url();
    url.push_str(filename);
    if versioned {
      url.push_str("?v=");
      url.push_str(&self.build_version());
    }
    url
  }
}

fn stylesheet_tag(url: &str) -> String {
  format!(r#"<link rel="stylesheet" type="text/css" href="{url}">"#)
}

fn script_tag(url: &str) -> String {
  format!(r#"<script src="{url}"></script>"#)
}
