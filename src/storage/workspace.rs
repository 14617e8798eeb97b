//! Workspace management
//!
//! A workspace is a directory holding a `buildgraph.toml` manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::manifest::{Manifest, MANIFEST_FILE};
use crate::domain::{validate_name, Catalog, ComponentDecl};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("No buildgraph.toml found. Run 'buildgraph init' first.")]
    NotInWorkspace,

    #[error("Manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Cannot derive a component name from {0}; pass --name")]
    NoDefaultName(PathBuf),
}

/// A directory with a loaded manifest
pub struct Workspace {
    root: PathBuf,
    manifest_path: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Opens the workspace rooted at the given directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        Self::open_manifest(root.join(MANIFEST_FILE))
    }

    /// Opens a workspace from an explicit manifest path
    pub fn open_manifest(path: impl Into<PathBuf>) -> Result<Self> {
        let manifest_path = path.into();
        if !manifest_path.is_file() {
            return Err(WorkspaceError::ManifestNotFound(manifest_path).into());
        }

        let manifest = Manifest::load(&manifest_path)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self {
            root,
            manifest_path,
            manifest,
        })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Self::find_root().ok_or(WorkspaceError::NotInWorkspace)?;
        Self::open(root)
    }

    /// Finds the workspace root by looking for the manifest file
    pub fn find_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(MANIFEST_FILE).is_file() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Creates a workspace with a single-component manifest
    ///
    /// The component name defaults to the directory name. An existing
    /// manifest is left untouched.
    pub fn init(root: impl Into<PathBuf>, name: Option<&str>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;

        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            let name = match name {
                Some(name) => name.to_string(),
                None => default_name(&root)?,
            };
            validate_name(&name)?;

            let manifest = Manifest {
                root: Some(name.clone()),
                components: vec![ComponentDecl::new(name, "")],
            };
            let content = format!(
                "# buildgraph component manifest\n# Declare one [[component]] table per component.\n\n{}",
                manifest.to_toml()?
            );
            fs::write(&manifest_path, content).with_context(|| {
                format!("Failed to write manifest: {}", manifest_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Builds the component catalog from the manifest
    pub fn catalog(&self) -> Result<Catalog> {
        self.manifest
            .catalog()
            .with_context(|| format!("Invalid manifest: {}", self.manifest_path.display()))
    }

    /// Resolves an optional component argument to a component name
    pub fn component_or_root<'a>(&'a self, component: Option<&'a str>) -> Result<&'a str> {
        match component {
            Some(name) => Ok(name),
            None => Ok(self.manifest.root_component()?),
        }
    }
}

fn default_name(root: &Path) -> Result<String> {
    let canonical = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: {}", root.display()))?;

    canonical
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.replace(char::is_whitespace, "_"))
        .ok_or_else(|| WorkspaceError::NoDefaultName(canonical.clone()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_manifest() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path(), Some("cbase")).unwrap();

        assert!(workspace.manifest_path().is_file());
        assert_eq!(workspace.manifest().root.as_deref(), Some("cbase"));
        assert_eq!(workspace.catalog().unwrap().len(), 1);
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();

        Workspace::init(dir.path(), Some("first")).unwrap();
        let workspace = Workspace::init(dir.path(), Some("second")).unwrap();

        assert_eq!(workspace.manifest().root.as_deref(), Some("first"));
    }

    #[test]
    fn init_defaults_name_to_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("ccore");
        let workspace = Workspace::init(&root, None).unwrap();

        assert_eq!(workspace.manifest().root.as_deref(), Some("ccore"));
    }

    #[test]
    fn init_rejects_invalid_name() {
        let dir = TempDir::new().unwrap();
        assert!(Workspace::init(dir.path(), Some("bad name")).is_err());
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn open_non_workspace_fails() {
        let dir = TempDir::new().unwrap();
        let result = Workspace::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn open_explicit_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.toml");
        fs::write(&path, "[[component]]\nname = \"solo\"\n").unwrap();

        let workspace = Workspace::open_manifest(&path).unwrap();
        assert_eq!(workspace.root(), dir.path());
        assert_eq!(workspace.component_or_root(None).unwrap(), "solo");
        assert_eq!(workspace.component_or_root(Some("x")).unwrap(), "x");
    }
}
