//! # Generator Boundary
//!
//! A generator consumes an assembled root [`Package`] read-only and turns it
//! into build artifacts. Real file emitters live outside this crate; the
//! built-in [`PlanGenerator`] reports what such an emitter would receive.
//!
//! ## Usage
//!
//! ```text
//! let mut generator = PlanGenerator::new();
//! let plan = generate::run(&mut generator, &package)?;   // init, then generate
//! ```
//!
//! ## Key Types
//!
//! - [`Generator`] - Trait implemented by every generator
//! - [`PlanGenerator`] - Flattens a package tree into a [`BuildPlan`]

mod plan;

use anyhow::Result;

use crate::domain::Package;

pub use plan::{BuildPlan, GenerateError, PlanGenerator, ProjectPlan};

/// A consumer of assembled package graphs
pub trait Generator {
    type Output;

    /// Resets internal state; must be called before [`Generator::generate`]
    fn init(&mut self) -> Result<()>;

    /// Produces output for the root package
    fn generate(&mut self, root: &Package) -> Result<Self::Output>;
}

/// Initializes the generator, then invokes it with the root package
pub fn run<G: Generator>(generator: &mut G, root: &Package) -> Result<G::Output> {
    generator.init()?;
    generator.generate(root)
}
