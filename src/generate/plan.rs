//! Build plan generator
//!
//! Produces a serializable description of every distinct project reachable
//! from the root package, plus the order a build system would build them in.

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use super::Generator;
use crate::domain::{BuildGraph, Package, ProjectKind};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Generator used before init")]
    NotInitialized,
}

/// One project as a generator sees it
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPlan {
    /// `namespace::name`, as used in `dependencies` and `build_order`
    pub key: String,
    pub name: String,
    pub namespace: String,
    pub kind: ProjectKind,
    pub source_dirs: Vec<String>,
    pub include_dirs: Vec<String>,

    /// Direct dependencies as `namespace::name`, duplicates removed
    pub dependencies: Vec<String>,
}

/// Everything needed to emit build files for a root package
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub root: String,

    /// Package names, root first, in first-seen order
    pub packages: Vec<String>,

    /// Distinct projects in first-seen order
    pub projects: Vec<ProjectPlan>,

    /// Project keys, dependencies before dependents
    pub build_order: Vec<String>,
}

/// Lookups for generators that consume a plan instead of walking packages
impl BuildPlan {
    /// Returns the plan entry for a `namespace::name` key
    pub fn project(&self, key: &str) -> Option<&ProjectPlan> {
        self.projects.iter().find(|p| p.key == key)
    }

    /// Library projects, in first-seen order
    pub fn libraries(&self) -> impl Iterator<Item = &ProjectPlan> {
        self.projects
            .iter()
            .filter(|p| p.kind == ProjectKind::Library)
    }

    /// Test executables, in first-seen order
    pub fn tests(&self) -> impl Iterator<Item = &ProjectPlan> {
        self.projects
            .iter()
            .filter(|p| p.kind == ProjectKind::TestExecutable)
    }
}

/// Generator that returns a [`BuildPlan`] instead of writing files
#[derive(Debug, Default)]
pub struct PlanGenerator {
    initialized: bool,
}

impl PlanGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Generator for PlanGenerator {
    type Output = BuildPlan;

    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn generate(&mut self, root: &Package) -> Result<BuildPlan> {
        if !self.initialized {
            return Err(GenerateError::NotInitialized.into());
        }

        let graph = BuildGraph::from_package(root)
            .with_context(|| format!("Failed to walk package graph of '{}'", root.name()))?;
        let order = graph
            .build_order()
            .with_context(|| format!("Failed to order projects of '{}'", root.name()))?;

        let projects = graph
            .projects()
            .iter()
            .map(|project| {
                let key = project.key();
                ProjectPlan {
                    key: key.to_string(),
                    name: project.name().to_string(),
                    namespace: project.namespace().to_string(),
                    kind: project.kind(),
                    source_dirs: project.layout().source_dirs.clone(),
                    include_dirs: project.layout().include_dirs.clone(),
                    dependencies: graph
                        .dependencies(&key)
                        .iter()
                        .map(|dep| dep.to_string())
                        .collect(),
                }
            })
            .collect();

        Ok(BuildPlan {
            root: graph.root().to_string(),
            packages: graph.packages().to_vec(),
            projects,
            build_order: order.iter().map(|key| key.to_string()).collect(),
        })
    }
}
