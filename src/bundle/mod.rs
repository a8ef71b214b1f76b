//! Building blocks the orchestrator composes into a bundler configuration.

pub mod loaders;
pub mod plugins;
