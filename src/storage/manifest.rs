//! Component manifest (`buildgraph.toml`)
//!
//! ```toml
//! root = "cbenchmark"
//!
//! [[component]]
//! name = "cbenchmark"
//! namespace = "github.com\\jurgen-kluft\\cbenchmark"
//! dependencies = ["cbase"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Catalog, ComponentDecl, DeclError};

pub const MANIFEST_FILE: &str = "buildgraph.toml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    #[error("Invalid manifest: {0}")]
    Invalid(#[from] DeclError),

    #[error("Manifest declares no components")]
    Empty,

    #[error("No root component: set 'root' in the manifest or name a component")]
    NoRoot,
}

/// Parsed manifest file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Component used when a command is given none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    #[serde(default, rename = "component")]
    pub components: Vec<ComponentDecl>,
}

impl Manifest {
    /// Parses manifest content
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    /// Reads and parses a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to load manifest: {}", path.display()))
    }

    /// Serializes the manifest
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize manifest")
    }

    /// Builds the component catalog
    ///
    /// Names are validated and duplicates rejected here, before any package
    /// is assembled.
    pub fn catalog(&self) -> Result<Catalog, ManifestError> {
        if self.components.is_empty() {
            return Err(ManifestError::Empty);
        }
        Ok(Catalog::from_decls(self.components.iter().cloned())?)
    }

    /// Picks the component to use when none is given
    ///
    /// The explicit `root` wins; otherwise a manifest with exactly one
    /// component uses that one.
    pub fn root_component(&self) -> Result<&str, ManifestError> {
        if let Some(root) = &self.root {
            return Ok(root);
        }
        match self.components.as_slice() {
            [only] => Ok(&only.name),
            _ => Err(ManifestError::NoRoot),
        }
    }
}
