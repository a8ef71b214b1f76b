//! The `version.txt` stamp written by release builds and read when rendering asset tags.
//!
//! The stamp is three lines:
//!
//! ```text
//! app@1.0.0
//! Build: 1700000000
//! Build date: 2023-11-14 22:13:20 UTC
//! ```
//!
//! Only the second line is consumed. Everything after its 7-byte `Build: ` label becomes the
//! `?v=` cache-busting token. The label text itself is not checked.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{DistAssetsError, Result};

/// Token used when no usable stamp exists.
pub const FALLBACK_VERSION: &str = "1";

/// Label preceding the build token on the second line.
pub const BUILD_LABEL: &str = "Build: ";

/// Template handed to the bundler's version-file plugin. Mirrors [`VersionStamp::render`].
pub const STAMP_TEMPLATE: &str =
  "<%= name %>@<%= version %>\nBuild: <%= buildString %>\nBuild date: <%= buildDate %>";

const BUILD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Package name and version printed on the first line of the stamp.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageIdentity {
  /// Package name.
  #[serde(default)]
  pub name: String,
  /// Package version.
  #[serde(default)]
  pub version: String,
}

impl PackageIdentity {
  /// Read `name`/`version` from a `package.json`, returning `None` when it is absent or unusable.
  pub fn from_package_json(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    let identity: Self = serde_json::from_str(&content).ok()?;
    (!identity.name.is_empty()).then_some(identity)
  }
}

/// Contents of one stamp file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStamp {
  /// Package the build belongs to.
  pub package: PackageIdentity,
  /// Build instant. Its Unix timestamp is the cache-busting token.
  pub built_at: DateTime<Utc>,
}

impl VersionStamp {
  /// Stamp for a build happening at `built_at`.
  pub fn new(package: PackageIdentity, built_at: DateTime<Utc>) -> Self {
    Self { package, built_at }
  }

  /// Token that ends up in `?v=`.
  pub fn build_token(&self) -> String {
    self.built_at.timestamp().to_string()
  }

  /// Render the three stamp lines.
  pub fn render(&self) -> String {
    format!(
      "{}@{}\n{BUILD_LABEL}{}\nBuild date: {}",
      self.package.name,
      self.package.version,
      self.build_token(),
      self.built_at.format(BUILD_DATE_FORMAT),
    )
  }

  /// Write the stamp to `path`, creating parent directories.
  pub fn write_to(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|source| DistAssetsError::Write {
        path: parent.to_path_buf(),
        source,
      })?;
    }

    fs::write(path, self.render()).map_err(|source| DistAssetsError::Write {
      path: path.to_path_buf(),
      source,
    })?;
    info!(path = %path.display(), build = %self.build_token(), "wrote version stamp");
    Ok(())
  }
}

/// Extract the build token from stamp contents.
///
/// Returns `None` when there is no second line or nothing follows the label. A trailing `\r`
/// is dropped so stamps edited on Windows still work.
pub fn parse_build_token(contents: &str) -> Option<&str> {
  let line = contents.split('\n').nth(1)?;
  let line = line.strip_suffix('\r').unwrap_or(line);
  line
    .get(BUILD_LABEL.len()..)
    .filter(|token| !token.is_empty())
}

/// Read the build token from the stamp at `path`.
///
/// Never fails: a missing, unreadable or malformed stamp yields [`FALLBACK_VERSION`]. The file
/// is re-read on every call.
pub fn read_build_version(path: &Path) -> String {
  let contents = match fs::read_to_string(path) {
    Ok(contents) => contents,
    Err(err) if err.kind() == ErrorKind::NotFound => {
      debug!(path = %path.display(), "no version stamp, using fallback");
      return FALLBACK_VERSION.to_string();
    }
    Err(err) => {
      warn!(path = %path.display(), error = %err, "unreadable version stamp, using fallback");
      return FALLBACK_VERSION.to_string();
    }
  };

  match parse_build_token(&contents) {
    Some(token) => token.to_string(),
    None => {
      warn!(path = %path.display(), "malformed version stamp, using fallback");
      FALLBACK_VERSION.to_string()
    }
  }
}
