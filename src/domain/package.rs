//! Package domain model
//!
//! A package groups one main library, an optional unit test and the
//! packages it depends on. Sub-package order is the declaration order and
//! is what generators use to order their output.

use std::rc::Rc;

use super::error::DeclError;
use super::name;
use super::project::{Project, ProjectKind};

/// A named group of projects plus its dependency packages
#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    main_lib: Option<Rc<Project>>,
    unit_test: Option<Rc<Project>>,
    sub_packages: Vec<Rc<Package>>,
}

impl Package {
    /// Creates an empty package
    pub fn new(name: &str) -> Result<Self, DeclError> {
        Ok(Self {
            name: name::validate(name)?,
            main_lib: None,
            unit_test: None,
            sub_packages: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a dependency package
    pub fn add_package(&mut self, dep: Rc<Package>) {
        self.sub_packages.push(dep);
    }

    /// Direct dependency packages in insertion order
    pub fn sub_packages(&self) -> &[Rc<Package>] {
        &self.sub_packages
    }

    /// Sets the main library, freezing it if it is not already shared
    ///
    /// Returns the shared reference so callers can depend on it.
    pub fn add_main_lib(&mut self, lib: impl Into<Rc<Project>>) -> Result<Rc<Project>, DeclError> {
        if self.main_lib.is_some() {
            return Err(DeclError::MainLibAlreadySet(self.name.clone()));
        }
        let lib = lib.into();
        check_kind(&lib, ProjectKind::Library)?;

        self.main_lib = Some(Rc::clone(&lib));
        Ok(lib)
    }

    /// Sets the unit test project, freezing it
    pub fn add_unittest(&mut self, test: impl Into<Rc<Project>>) -> Result<Rc<Project>, DeclError> {
        if self.unit_test.is_some() {
            return Err(DeclError::TestAlreadySet(self.name.clone()));
        }
        let test = test.into();
        check_kind(&test, ProjectKind::TestExecutable)?;

        self.unit_test = Some(Rc::clone(&test));
        Ok(test)
    }

    /// Returns the main library
    ///
    /// Fails if the package was handed out before its main library was set.
    pub fn main_lib(&self) -> Result<Rc<Project>, DeclError> {
        self.main_lib
            .clone()
            .ok_or_else(|| DeclError::MainLibNotSet(self.name.clone()))
    }

    /// Returns true if the main library has been set
    pub fn has_main_lib(&self) -> bool {
        self.main_lib.is_some()
    }

    pub fn unit_test(&self) -> Option<&Rc<Project>> {
        self.unit_test.as_ref()
    }
}

fn check_kind(project: &Project, expected: ProjectKind) -> Result<(), DeclError> {
    if project.kind() == expected {
        Ok(())
    } else {
        Err(DeclError::WrongProjectKind {
            project: project.name().to_string(),
            expected: expected.as_str(),
            actual: project.kind().as_str(),
        })
    }
}
