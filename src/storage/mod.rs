//! # Storage Layer
//!
//! Loads component declarations and user settings from disk.
//!
//! ## Files
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Components | TOML | `buildgraph.toml` at the workspace root |
//! | User config | TOML | `~/.config/buildgraph/config.toml` |
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for a directory with a manifest
//! - [`Manifest`] - Parsed `buildgraph.toml`
//! - [`Config`] - User configuration

mod config;
mod manifest;
mod workspace;

pub use config::{Config, ConfigError, OutputFormat};
pub use manifest::{Manifest, ManifestError, MANIFEST_FILE};
pub use workspace::{Workspace, WorkspaceError};
