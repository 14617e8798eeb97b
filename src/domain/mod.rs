//! Domain models for buildgraph
//!
//! Contains the declaration and composition model without any I/O concerns.

mod component;
mod error;
mod graph;
mod name;
mod package;
mod project;

pub use component::{get_package, Assembler, Catalog, ComponentDecl};
pub use error::DeclError;
pub use graph::{BuildGraph, GraphError};
pub use name::{is_valid as is_valid_name, validate as validate_name};
pub use package::Package;
pub use project::{Project, ProjectKey, ProjectKind, ProjectLayout};
