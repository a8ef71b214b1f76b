//! Deployment mode shared by the build orchestrator and the tag resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DistAssetsError;

/// Which flavour of build is running, or which one produced the assets being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
  /// Minified, cache-busted release build.
  Production,
  /// Live-reload build served from the local dev server.
  Development,
  /// Unminified build written to disk with inline source maps.
  Debug,
}

impl DeploymentMode {
  /// Detect the mode from bundler invocation arguments.
  ///
  /// Any argument containing `dev-server` selects development, which wins over an argument
  /// containing `production`. Everything else is a debug build.
  pub fn from_args<I, S>(args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut development = false;
    let mut production = false;

    for arg in args {
      let arg = arg.as_ref();
      development |= arg.contains("dev-server");
      production |= arg.contains("production");
    }

    if development {
      Self::Development
    } else if production {
      Self::Production
    } else {
      Self::Debug
    }
  }

  /// Lowercase name of the mode.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Production => "production",
      Self::Development => "development",
      Self::Debug => "debug",
    }
  }

  /// Returns `true` for release builds.
  pub fn is_production(self) -> bool {
    self == Self::Production
  }

  /// Builds that write files to `dist` also write the version stamp.
  pub fn writes_version_stamp(self) -> bool {
    self != Self::Development
  }

  /// Value the bundler injects as `process.env.NODE_ENV`.
  pub fn node_env(self) -> &'static str {
    match self {
      Self::Development => "development",
      Self::Production | Self::Debug => "production",
    }
  }
}

impl fmt::Display for DeploymentMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DeploymentMode {
  type Err = DistAssetsError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.trim().to_ascii_lowercase().as_str() {
      "production" => Ok(Self::Production),
      "development" => Ok(Self::Development),
      "debug" => Ok(Self::Debug),
      _ => Err(DistAssetsError::InvalidMode(value.to_string())),
    }
  }
}
