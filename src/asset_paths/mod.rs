//! File-type classification and output naming for bundled sources.
//!
//! Patterns are compiled once and shared. Rule matching in the bundler configuration and
//! the file loader's vendor grouping both go through here.

mod file_types;
mod vendor;

pub use file_types::FileType;
pub use vendor::{
  ASSET_NAME_TEMPLATE, VENDOR_ASSET_NAME_TEMPLATE, VENDOR_DIRS_PATTERN, VENDOR_PACKAGE_PATTERN,
  asset_output_name, is_vendor_path,
};
