//! Declaration errors
//!
//! Every error here is a configuration error raised while the package graph
//! is being assembled. None of them are retried or recovered from.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclError {
    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    #[error("Self-dependency not allowed: {0}")]
    SelfDependency(String),

    #[error("Main library already set for package '{0}'")]
    MainLibAlreadySet(String),

    #[error("Unit test already set for package '{0}'")]
    TestAlreadySet(String),

    #[error("Main library not set for package '{0}'")]
    MainLibNotSet(String),

    #[error("Cyclic package dependency: {}", .cycle.join(" -> "))]
    CyclicPackageDependency { cycle: Vec<String> },

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Component declared more than once: {0}")]
    DuplicateComponent(String),

    #[error("Internal library '{lib}' of '{component}' shadows a declared component")]
    InternalLibShadowsComponent { component: String, lib: String },

    #[error("Project '{project}' is a {actual}, expected a {expected}")]
    WrongProjectKind {
        project: String,
        expected: &'static str,
        actual: &'static str,
    },
}
