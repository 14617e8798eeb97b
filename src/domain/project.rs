//! Project domain model
//!
//! A project is one buildable unit: a library or a test executable. It is
//! mutable while its owner is wiring dependencies, and frozen behind an `Rc`
//! once attached to a package. Dependencies can only point at frozen
//! projects, so the dependency graph of projects is acyclic by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use super::error::DeclError;
use super::name;

/// Kind of buildable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    Library,
    TestExecutable,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Library => "library",
            ProjectKind::TestExecutable => "test_executable",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Identity of a project: namespace plus name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProjectKey {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace, self.name)
        }
    }
}

/// Source and include directories, relative to the component root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    pub source_dirs: Vec<String>,
    pub include_dirs: Vec<String>,
}

impl ProjectLayout {
    pub const MAIN_SOURCE: &'static str = "source/main/cpp";
    pub const MAIN_INCLUDE: &'static str = "source/main/include";
    pub const TEST_SOURCE: &'static str = "source/test/cpp";
    pub const TEST_INCLUDE: &'static str = "source/test/include";

    /// Default layout for a project kind
    ///
    /// Test executables also see the main include directory, since they
    /// compile against the library's public headers.
    pub fn for_kind(kind: ProjectKind) -> Self {
        match kind {
            ProjectKind::Library => Self {
                source_dirs: vec![Self::MAIN_SOURCE.to_string()],
                include_dirs: vec![Self::MAIN_INCLUDE.to_string()],
            },
            ProjectKind::TestExecutable => Self {
                source_dirs: vec![Self::TEST_SOURCE.to_string()],
                include_dirs: vec![
                    Self::TEST_INCLUDE.to_string(),
                    Self::MAIN_INCLUDE.to_string(),
                ],
            },
        }
    }
}

/// A buildable unit with an ordered list of dependencies
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    namespace: String,
    kind: ProjectKind,
    layout: ProjectLayout,
    dependencies: Vec<Rc<Project>>,
}

impl Project {
    /// Creates a project with no dependencies and the default layout
    pub fn new(
        name: &str,
        namespace: impl Into<String>,
        kind: ProjectKind,
    ) -> Result<Self, DeclError> {
        Ok(Self {
            name: name::validate(name)?,
            namespace: namespace.into(),
            kind,
            layout: ProjectLayout::for_kind(kind),
            dependencies: Vec::new(),
        })
    }

    /// Creates a library project
    pub fn library(name: &str, namespace: impl Into<String>) -> Result<Self, DeclError> {
        Self::new(name, namespace, ProjectKind::Library)
    }

    /// Creates a test executable project
    pub fn test_executable(name: &str, namespace: impl Into<String>) -> Result<Self, DeclError> {
        Self::new(name, namespace, ProjectKind::TestExecutable)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Returns the identity of this project
    pub fn key(&self) -> ProjectKey {
        ProjectKey {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }

    /// Returns true if `other` has the same identity
    pub fn same_as(&self, other: &Project) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }

    /// Dependencies in declaration order, duplicates included
    pub fn dependencies(&self) -> &[Rc<Project>] {
        &self.dependencies
    }

    /// Appends a dependency
    ///
    /// No uniqueness check: adding the same dependency twice grows the list.
    pub fn add_dependency(&mut self, dep: Rc<Project>) -> Result<(), DeclError> {
        if self.same_as(&dep) {
            return Err(DeclError::SelfDependency(self.key().to_string()));
        }
        self.dependencies.push(dep);
        Ok(())
    }

    /// Appends each dependency in order, stopping at the first failure
    pub fn add_dependencies(
        &mut self,
        deps: impl IntoIterator<Item = Rc<Project>>,
    ) -> Result<(), DeclError> {
        for dep in deps {
            self.add_dependency(dep)?;
        }
        Ok(())
    }
}
