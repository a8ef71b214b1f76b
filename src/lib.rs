#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod commands;
pub mod config;
pub mod error;
pub mod mode;
pub mod models;
pub mod project;
pub mod tags;
pub mod version;

pub use builder::{BuildArtifacts, BuildOrchestrator};
pub use config::ProjectConfig;
pub use error::DistAssetsError;
pub use mode::DeploymentMode;
pub use models::BundlerConfig;
pub use project::{BuildContext, DistLayout};
pub use tags::{AssetTagResolver, ResolverSettings, StylesheetPolicy};
pub use version::{VersionStamp, read_build_version};
