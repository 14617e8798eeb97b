//! buildgraph - package and dependency declarations for component builds
//!
//! Each component declares its main library, its unit test and the
//! components it depends on. The crate assembles these declarations into a
//! tree of [`Package`]s whose [`Project`]s carry ordered dependency edges,
//! ready for a build-file generator to consume.

pub mod cli;
pub mod domain;
pub mod generate;
pub mod storage;

pub use domain::{
    get_package, Assembler, BuildGraph, Catalog, ComponentDecl, DeclError, Package, Project,
    ProjectKey, ProjectKind,
};
pub use generate::{BuildPlan, Generator, PlanGenerator};
