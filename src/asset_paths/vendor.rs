use std::sync::OnceLock;

use regex::Regex;

/// Output name template for copied assets outside any package.
pub const ASSET_NAME_TEMPLATE: &str = "assets/[name].[ext]";

/// Output name template for assets shipped by a package. `[1]` is the package directory
/// captured by [`VENDOR_PACKAGE_PATTERN`].
pub const VENDOR_ASSET_NAME_TEMPLATE: &str = "vendors/[1]/assets/[name].[ext]";

/// Regex source capturing the package directory of a path inside `node_modules`.
pub const VENDOR_PACKAGE_PATTERN: &str = r"node_modules[\\/](.+?)[\\/]";

/// Regex source for directories whose scripts are shipped pre-built and skip transpiling.
pub const VENDOR_DIRS_PATTERN: &str = "(node_modules|bower_components)";

fn vendor_dirs() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(VENDOR_DIRS_PATTERN).expect("invalid vendor dirs regex"))
}

fn vendor_package() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(&format!("(?i){VENDOR_PACKAGE_PATTERN}")).expect("invalid vendor package regex")
  })
}

/// Whether a resource path points into a third-party package directory.
pub fn is_vendor_path(path: &str) -> bool {
  vendor_dirs().is_match(path)
}

/// Output name the file loader gives a copied asset, with the package placeholder filled in.
///
/// Assets pulled from `node_modules/<package>/` are grouped under `vendors/<package>/` so two
/// packages shipping `icons.woff` do not overwrite each other.
pub fn asset_output_name(resource_path: &str) -> String {
  match vendor_package()
    .captures(resource_path)
    .and_then(|caps| caps.get(1))
  {
    Some(package) => VENDOR_ASSET_NAME_TEMPLATE.replace("[1]", package.as_str()),
    None => ASSET_NAME_TEMPLATE.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn local_assets_land_in_assets_dir() {
    assert_eq!(
      asset_output_name("/srv/app/resources/img/logo.png"),
      "assets/[name].[ext]"
    );
  }

  #[test]
  fn package_assets_are_grouped_by_package() {
    assert_eq!(
      asset_output_name("/srv/app/node_modules/font-awesome/fonts/fa.woff"),
      "vendors/font-awesome/assets/[name].[ext]"
    );
  }

  #[test]
  fn handles_windows_separators() {
    assert_eq!(
      asset_output_name(r"C:\app\Node_Modules\slick-carousel\slick\ajax-loader.gif"),
      "vendors/slick-carousel/assets/[name].[ext]"
    );
  }

  #[test]
  fn detects_vendor_paths() {
    assert!(is_vendor_path("node_modules/react/index.js"));
    assert!(is_vendor_path("lib/bower_components/jquery/jquery.js"));
    assert!(!is_vendor_path("resources/js/app.js"));
  }
}
