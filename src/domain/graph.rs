//! Build graph over a package tree
//!
//! Flattens an assembled package into the set of projects a generator has
//! to emit. Projects are coalesced by identity (namespace + name) keeping
//! first-seen order, duplicate edges collapse, and the build order puts
//! dependencies before dependents. Uses petgraph for the edge set.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;

use super::error::DeclError;
use super::package::Package;
use super::project::{Project, ProjectKey, ProjectKind};

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Decl(#[from] DeclError),

    #[error("Dependency cycle among projects: {}", format_keys(.0))]
    CycleDetected(Vec<ProjectKey>),

    #[error("Project {key} declared as both {first} and {second}")]
    ConflictingProject {
        key: ProjectKey,
        first: ProjectKind,
        second: ProjectKind,
    },
}

fn format_keys(keys: &[ProjectKey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deduplicated view of every project reachable from a root package
#[derive(Debug)]
pub struct BuildGraph {
    root: String,

    /// Edge direction is dependency -> dependent
    graph: DiGraph<ProjectKey, ()>,

    /// Map from key to node index
    node_map: HashMap<ProjectKey, NodeIndex>,

    /// Projects in first-seen order; position matches node index
    projects: Vec<Rc<Project>>,

    /// Package names in first-seen order
    packages: Vec<String>,
}

impl BuildGraph {
    /// Walks the package tree rooted at `root`
    ///
    /// Every package must have its main library set.
    pub fn from_package(root: &Package) -> Result<Self, GraphError> {
        let mut graph = Self {
            root: root.name().to_string(),
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            projects: Vec::new(),
            packages: Vec::new(),
        };

        let mut seen_packages = HashSet::new();
        graph.visit_package(root, &mut seen_packages)?;
        Ok(graph)
    }

    /// Visits each distinct package instance once
    ///
    /// Package names are not unique, so two different packages sharing a
    /// name are both walked; only the reported name list is deduplicated.
    fn visit_package(
        &mut self,
        package: &Package,
        seen: &mut HashSet<*const Package>,
    ) -> Result<(), GraphError> {
        if !seen.insert(package as *const Package) {
            return Ok(());
        }
        if !self.packages.iter().any(|name| name == package.name()) {
            self.packages.push(package.name().to_string());
        }

        let main_lib = package.main_lib()?;
        self.visit_project(&main_lib)?;
        if let Some(test) = package.unit_test() {
            self.visit_project(test)?;
        }

        for sub in package.sub_packages() {
            self.visit_package(sub, seen)?;
        }
        Ok(())
    }

    fn visit_project(&mut self, project: &Rc<Project>) -> Result<NodeIndex, GraphError> {
        let key = project.key();
        if let Some(&idx) = self.node_map.get(&key) {
            let first = self.projects[idx.index()].kind();
            if first != project.kind() {
                return Err(GraphError::ConflictingProject {
                    key,
                    first,
                    second: project.kind(),
                });
            }
            return Ok(idx);
        }

        let idx = self.graph.add_node(key.clone());
        self.node_map.insert(key, idx);
        self.projects.push(Rc::clone(project));

        for dep in project.dependencies() {
            let dep_idx = self.visit_project(dep)?;
            // update_edge collapses repeated declarations of the same edge
            self.graph.update_edge(dep_idx, idx, ());
        }
        Ok(idx)
    }

    /// Name of the root package
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Distinct projects in first-seen order
    pub fn projects(&self) -> &[Rc<Project>] {
        &self.projects
    }

    /// Distinct package names in first-seen order, root first
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn get(&self, key: &ProjectKey) -> Option<&Rc<Project>> {
        self.node_map.get(key).map(|idx| &self.projects[idx.index()])
    }

    /// Returns the direct dependencies of a project, duplicates removed
    pub fn dependencies(&self, key: &ProjectKey) -> Vec<ProjectKey> {
        let Some(project) = self.get(key) else {
            return vec![];
        };

        let mut seen = HashSet::new();
        project
            .dependencies()
            .iter()
            .map(|dep| dep.key())
            .filter(|dep| seen.insert(dep.clone()))
            .collect()
    }

    /// Returns the direct dependents of a project in first-seen order
    pub fn dependents(&self, key: &ProjectKey) -> Vec<ProjectKey> {
        let idx = match self.node_map.get(key) {
            Some(idx) => *idx,
            None => return vec![],
        };

        let mut dependents: Vec<_> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        dependents.sort();
        dependents
            .into_iter()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Returns all projects with dependencies before dependents
    ///
    /// Among projects that are ready at the same time, the one seen first
    /// comes first, so the order is stable for a given package tree.
    pub fn build_order(&self) -> Result<Vec<ProjectKey>, GraphError> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BTreeSet<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.projects.len());
        while let Some(idx) = ready.pop_first() {
            order.push(self.graph[idx].clone());
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                in_degree[next.index()] -= 1;
                if in_degree[next.index()] == 0 {
                    ready.insert(next);
                }
            }
        }

        if order.len() < self.projects.len() {
            let stuck = self
                .graph
                .node_indices()
                .filter(|idx| in_degree[idx.index()] > 0)
                .map(|idx| self.graph[idx].clone())
                .collect();
            return Err(GraphError::CycleDetected(stuck));
        }

        Ok(order)
    }

    pub fn contains(&self, key: &ProjectKey) -> bool {
        self.node_map.contains_key(key)
    }

    /// Returns the number of distinct projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::{get_package, Assembler, Catalog, ComponentDecl};

    fn key(name: &str) -> ProjectKey {
        ProjectKey {
            namespace: "acme".to_string(),
            name: name.to_string(),
        }
    }

    fn names(keys: &[ProjectKey]) -> Vec<&str> {
        keys.iter().map(|k| k.name.as_str()).collect()
    }

    fn diamond() -> Catalog {
        Catalog::from_decls(vec![
            ComponentDecl::new("app", "acme").depends_on("left").depends_on("right"),
            ComponentDecl::new("left", "acme").depends_on("base"),
            ComponentDecl::new("right", "acme").depends_on("base"),
            ComponentDecl::new("base", "acme"),
        ])
        .unwrap()
    }

    #[test]
    fn single_package() {
        let catalog = Catalog::from_decls(vec![ComponentDecl::new("cbase", "acme")]).unwrap();
        let package = get_package(&catalog, "cbase").unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        assert_eq!(graph.root(), "cbase");
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.packages(), ["cbase".to_string()]);
        assert_eq!(graph.dependencies(&key("cbase_test")), vec![key("cbase")]);
        assert_eq!(graph.dependents(&key("cbase")), vec![key("cbase_test")]);
    }

    #[test]
    fn diamond_is_coalesced() {
        let catalog = diamond();
        let package = Assembler::without_memo(&catalog).assemble("app").unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        assert_eq!(graph.packages(), ["app", "left", "base", "right"]);
        // 4 libraries + 4 tests, base counted once
        assert_eq!(graph.len(), 8);
        assert_eq!(
            graph
                .projects()
                .iter()
                .filter(|p| p.name() == "base")
                .count(),
            1
        );
    }

    #[test]
    fn first_seen_order() {
        let package = get_package(&diamond(), "app").unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        let order: Vec<_> = graph.projects().iter().map(|p| p.name()).collect();
        assert_eq!(
            order,
            vec!["app", "left", "base", "right", "app_test", "left_test", "base_test", "right_test"]
        );
    }

    #[test]
    fn build_order_puts_dependencies_first() {
        let package = get_package(&diamond(), "app").unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        let order = graph.build_order().unwrap();
        let pos = |name: &str| order.iter().position(|k| k.name == name).unwrap();

        assert_eq!(order.len(), 8);
        assert!(pos("base") < pos("left"));
        assert!(pos("base") < pos("right"));
        assert!(pos("left") < pos("app"));
        assert!(pos("right") < pos("app"));
        assert!(pos("app") < pos("app_test"));
        assert_eq!(order[0].name, "base");
    }

    #[test]
    fn build_order_is_stable() {
        let package = get_package(&diamond(), "app").unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        let order = graph.build_order().unwrap();
        assert_eq!(
            names(&order),
            vec!["base", "left", "right", "app", "app_test", "left_test", "base_test", "right_test"]
        );
    }

    #[test]
    fn duplicate_edges_collapse() {
        let shared = Rc::new(Project::library("shared", "acme").unwrap());
        let mut lib = Project::library("app", "acme").unwrap();
        lib.add_dependencies([Rc::clone(&shared), Rc::clone(&shared)])
            .unwrap();

        let mut package = Package::new("app").unwrap();
        package.add_main_lib(lib).unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        assert_eq!(graph.dependencies(&key("app")), vec![key("shared")]);
        assert_eq!(graph.dependents(&key("shared")), vec![key("app")]);
    }

    #[test]
    fn missing_main_lib_is_reported() {
        let mut package = Package::new("app").unwrap();
        package.add_package(Rc::new(Package::new("empty").unwrap()));

        let err = BuildGraph::from_package(&package).unwrap_err();
        assert_eq!(
            err,
            GraphError::Decl(DeclError::MainLibNotSet("app".to_string()))
        );
    }

    #[test]
    fn key_collision_cycle_detected() {
        // a distinct project keyed like the root closes a loop a -> b -> a
        let inner = Rc::new(Project::library("a", "acme").unwrap());
        let mut b = Project::library("b", "acme").unwrap();
        b.add_dependency(inner).unwrap();
        let mut a = Project::library("a", "acme").unwrap();
        a.add_dependency(Rc::new(b)).unwrap();

        let mut package = Package::new("a").unwrap();
        package.add_main_lib(a).unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        let err = graph.build_order().unwrap_err();
        assert_eq!(err, GraphError::CycleDetected(vec![key("a"), key("b")]));
    }

    #[test]
    fn same_named_packages_are_both_walked() {
        let package_with = |namespace: &str, with_test: bool| {
            let mut package = Package::new("x").unwrap();
            package
                .add_main_lib(Project::library("x", namespace).unwrap())
                .unwrap();
            if with_test {
                package
                    .add_unittest(Project::test_executable("x_test", namespace).unwrap())
                    .unwrap();
            }
            Rc::new(package)
        };

        let mut root = Package::new("root").unwrap();
        root.add_main_lib(Project::library("root", "ns0").unwrap())
            .unwrap();
        root.add_package(package_with("ns1", false));
        root.add_package(package_with("ns2", true));

        let graph = BuildGraph::from_package(&root).unwrap();

        let keys: Vec<_> = graph.projects().iter().map(|p| p.key().to_string()).collect();
        assert_eq!(keys, vec!["ns0::root", "ns1::x", "ns2::x", "ns2::x_test"]);
        assert_eq!(graph.packages(), ["root", "x"]);
    }

    #[test]
    fn shared_package_walked_once() {
        let mut base = Package::new("base").unwrap();
        base.add_main_lib(Project::library("base", "acme").unwrap())
            .unwrap();
        let base = Rc::new(base);

        let mut root = Package::new("app").unwrap();
        root.add_main_lib(Project::library("app", "acme").unwrap())
            .unwrap();
        root.add_package(Rc::clone(&base));
        root.add_package(base);

        let graph = BuildGraph::from_package(&root).unwrap();
        assert_eq!(graph.packages(), ["app", "base"]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn conflicting_kinds_rejected() {
        let fake = Rc::new(Project::test_executable("dep", "acme").unwrap());
        let real = Rc::new(Project::library("dep", "acme").unwrap());
        let mut lib = Project::library("app", "acme").unwrap();
        lib.add_dependencies([real, fake]).unwrap();

        let mut package = Package::new("app").unwrap();
        package.add_main_lib(lib).unwrap();

        let err = BuildGraph::from_package(&package).unwrap_err();
        assert!(matches!(err, GraphError::ConflictingProject { .. }));
    }

    #[test]
    fn unknown_key_has_no_neighbours() {
        let package = get_package(&diamond(), "app").unwrap();
        let graph = BuildGraph::from_package(&package).unwrap();

        assert!(!graph.contains(&key("nope")));
        assert!(graph.dependencies(&key("nope")).is_empty());
        assert!(graph.dependents(&key("nope")).is_empty());
    }
}
