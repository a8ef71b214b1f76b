//! Filesystem and URL layout shared by the build orchestrator and the tag resolver.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::EntryPoint;
use crate::version::PackageIdentity;

/// Where built assets live on disk and where the dev server serves them from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistLayout {
  /// Web root relative to the project root (`public`).
  pub content_base: String,
  /// Output directory inside the web root (`dist`). Also the URL segment assets are served under.
  pub out_path: String,
  /// Name of the version stamp written into the output directory.
  pub version_file: String,
  /// Host the development server listens on.
  pub dev_server_host: String,
  /// Port the development server listens on.
  pub dev_server_port: u16,
}

impl Default for DistLayout {
  fn default() -> Self {
    Self {
      content_base: "public".into(),
      out_path: "dist".into(),
      version_file: "version.txt".into(),
      dev_server_host: "localhost".into(),
      dev_server_port: 8080,
    }
  }
}

impl DistLayout {
  /// Web root on disk.
  pub fn content_base_dir(&self, project_root: &Path) -> PathBuf {
    project_root.join(&self.content_base)
  }

  /// Output directory the bundler writes into.
  pub fn dist_dir(&self, project_root: &Path) -> PathBuf {
    let base = self.content_base_dir(project_root);
    match self.dist_segment() {
      "" => base,
      segment => base.join(segment),
    }
  }

  /// Location of the version stamp.
  pub fn version_stamp_path(&self, project_root: &Path) -> PathBuf {
    self.dist_dir(project_root).join(&self.version_file)
  }

  /// The output directory as a URL path segment, without surrounding slashes.
  pub fn dist_segment(&self) -> &str {
    self.out_path.trim_matches('/')
  }

  /// Public path assets get when served by the dev server, e.g. `http://localhost:8080/dist/`.
  pub fn dev_server_public_path(&self) -> String {
    let origin = format!("http://{}:{}/", self.dev_server_host, self.dev_server_port);
    match self.dist_segment() {
      "" => origin,
      segment => format!("{origin}{segment}/"),
    }
  }
}

/// Inputs a build needs besides the mode.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
  /// Directory the bundler runs from.
  pub project_root: &'a Path,
  /// Output layout.
  pub layout: &'a DistLayout,
  /// Named entry points handed to the bundler untouched.
  pub entries: &'a BTreeMap<String, EntryPoint>,
  /// Name and version written on the first line of the stamp.
  pub package: &'a PackageIdentity,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_layout_matches_conventional_paths() {
    let layout = DistLayout::default();
    let root = Path::new("/srv/app");

    assert_eq!(layout.dist_dir(root), PathBuf::from("/srv/app/public/dist"));
    assert_eq!(
      layout.version_stamp_path(root),
      PathBuf::from("/srv/app/public/dist/version.txt")
    );
    assert_eq!(layout.dev_server_public_path(), "http://localhost:8080/dist/");
  }

  #[test]
  fn empty_out_path_serves_from_dev_server_root() {
    let layout = DistLayout {
      out_path: String::new(),
      dev_server_port: 3000,
      ..DistLayout::default()
    };

    assert_eq!(layout.dev_server_public_path(), "http://localhost:3000/");
    assert_eq!(
      layout.dist_dir(Path::new("app")),
      PathBuf::from("app").join("public")
    );
  }

  #[test]
  fn dist_segment_trims_slashes() {
    let layout = DistLayout {
      out_path: "/build/assets/".into(),
      ..DistLayout::default()
    };

    assert_eq!(layout.dist_segment(), "build/assets");
    assert_eq!(
      layout.dev_server_public_path(),
      "http://localhost:8080/build/assets/"
    );
  }
}
