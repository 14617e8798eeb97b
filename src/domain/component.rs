//! Component declarations and package assembly
//!
//! A component declares its name, namespace and the components it depends
//! on. [`Assembler`] turns a declaration into a fully wired [`Package`]:
//! dependency packages first (recursively), then the main library, then the
//! unit test. Cycles between components are caught by tracking the names
//! currently being assembled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

use super::error::DeclError;
use super::name;
use super::package::Package;
use super::project::Project;

fn default_true() -> bool {
    true
}

/// Declaration of one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDecl {
    /// Component name, also the package and main library name
    pub name: String,

    /// Namespace shared by all projects of this component
    #[serde(default)]
    pub namespace: String,

    /// Components this one depends on, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Extra libraries built inside this component and linked into the main library
    #[serde(default)]
    pub internal_libs: Vec<String>,

    /// Whether the component has a unit test project
    #[serde(default = "default_true")]
    pub unittest: bool,
}

impl ComponentDecl {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            dependencies: Vec::new(),
            internal_libs: Vec::new(),
            unittest: true,
        }
    }

    /// Adds a dependency (builder style)
    pub fn depends_on(mut self, dep: impl Into<String>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    /// Adds an internal library (builder style)
    pub fn internal_lib(mut self, lib: impl Into<String>) -> Self {
        self.internal_libs.push(lib.into());
        self
    }

    /// Drops the unit test project (builder style)
    pub fn without_unittest(mut self) -> Self {
        self.unittest = false;
        self
    }

    /// Name of the unit test project
    pub fn test_name(&self) -> String {
        format!("{}_test", self.name)
    }
}

/// Declared components, indexed by name, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<ComponentDecl>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, failing on the first invalid or duplicate declaration
    pub fn from_decls(decls: impl IntoIterator<Item = ComponentDecl>) -> Result<Self, DeclError> {
        let mut catalog = Self::new();
        for decl in decls {
            catalog.insert(decl)?;
        }
        Ok(catalog)
    }

    /// Adds a declaration
    ///
    /// Component and internal library names are validated here; dependency
    /// names are resolved lazily during assembly.
    pub fn insert(&mut self, decl: ComponentDecl) -> Result<(), DeclError> {
        name::validate(&decl.name)?;
        for lib in &decl.internal_libs {
            name::validate(lib)?;
        }
        if self.index.contains_key(&decl.name) {
            return Err(DeclError::DuplicateComponent(decl.name));
        }

        self.index.insert(decl.name.clone(), self.components.len());
        self.components.push(decl);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDecl> {
        self.index.get(name).map(|&idx| &self.components[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Component names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentDecl> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Assembles packages from a catalog
///
/// The memo map lives as long as the assembler, so a component referenced
/// by several parents is built once and shared. Without memoization every
/// reference rebuilds its own copy of the sub-graph.
pub struct Assembler<'a> {
    catalog: &'a Catalog,
    stack: Vec<String>,
    memo: Option<HashMap<String, Rc<Package>>>,
}

impl<'a> Assembler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            stack: Vec::new(),
            memo: Some(HashMap::new()),
        }
    }

    pub fn without_memo(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            stack: Vec::new(),
            memo: None,
        }
    }

    /// Returns the fully wired package of a component
    pub fn assemble(&mut self, name: &str) -> Result<Rc<Package>, DeclError> {
        if let Some(pos) = self.stack.iter().position(|n| n == name) {
            let mut cycle = self.stack[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(DeclError::CyclicPackageDependency { cycle });
        }

        if let Some(package) = self.memo.as_ref().and_then(|memo| memo.get(name)) {
            return Ok(Rc::clone(package));
        }

        let catalog = self.catalog;
        let decl = catalog
            .get(name)
            .ok_or_else(|| DeclError::UnknownComponent(name.to_string()))?;

        self.stack.push(decl.name.clone());
        let result = self.build(decl);
        self.stack.pop();

        let package = Rc::new(result?);
        if let Some(memo) = self.memo.as_mut() {
            memo.insert(decl.name.clone(), Rc::clone(&package));
        }
        Ok(package)
    }

    /// Assembles every declared component, reporting each result separately
    pub fn assemble_all(&mut self) -> Vec<(String, Result<Rc<Package>, DeclError>)> {
        let catalog = self.catalog;
        catalog
            .names()
            .map(|name| (name.to_string(), self.assemble(name)))
            .collect()
    }

    fn build(&mut self, decl: &ComponentDecl) -> Result<Package, DeclError> {
        // Dependency packages must be complete before their libraries are read
        let deps = decl
            .dependencies
            .iter()
            .map(|dep| self.assemble(dep))
            .collect::<Result<Vec<_>, _>>()?;

        let mut package = Package::new(&decl.name)?;
        for dep in &deps {
            package.add_package(Rc::clone(dep));
        }

        let dep_libs = deps
            .iter()
            .map(|dep| dep.main_lib())
            .collect::<Result<Vec<_>, _>>()?;

        // A library named like another component would close a loop through it
        if let Some(lib) = decl
            .internal_libs
            .iter()
            .find(|lib| **lib != decl.name && self.catalog.contains(lib))
        {
            return Err(DeclError::InternalLibShadowsComponent {
                component: decl.name.clone(),
                lib: lib.clone(),
            });
        }

        let mut main_lib = Project::library(&decl.name, decl.namespace.as_str())?;
        main_lib.add_dependencies(dep_libs.iter().cloned())?;
        for lib in &decl.internal_libs {
            let internal = Project::library(lib, decl.namespace.as_str())?;
            main_lib.add_dependency(Rc::new(internal))?;
        }
        let main_lib = Rc::new(main_lib);

        let unit_test = if decl.unittest {
            let mut test = Project::test_executable(&decl.test_name(), decl.namespace.as_str())?;
            test.add_dependencies(dep_libs.iter().cloned())?;
            test.add_dependency(Rc::clone(&main_lib))?;
            Some(test)
        } else {
            None
        };

        package.add_main_lib(main_lib)?;
        if let Some(test) = unit_test {
            package.add_unittest(test)?;
        }

        Ok(package)
    }
}

/// Assembles one component with a fresh assembler
pub fn get_package(catalog: &Catalog, name: &str) -> Result<Rc<Package>, DeclError> {
    Assembler::new(catalog).assemble(name)
}
