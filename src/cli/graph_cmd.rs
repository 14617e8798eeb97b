//! Graph commands (list, show, tree, plan, check)
//!
//! Every command loads the manifest, assembles the requested component and
//! prints the result. Assembly errors abort before anything is printed.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use super::output::Output;
use crate::domain::{Assembler, BuildGraph, Catalog, Package, Project};
use crate::generate::{self, PlanGenerator};
use crate::storage::{Config, Workspace};

/// A loaded workspace plus the settings needed to assemble packages
pub struct Session {
    workspace: Workspace,
    catalog: Catalog,
    memoize: bool,
}

impl Session {
    /// Opens the manifest at `manifest`, or the nearest one
    pub fn open(manifest: Option<&Path>, config: &Config, output: &Output) -> Result<Self> {
        let workspace = match manifest {
            Some(path) => Workspace::open_manifest(path)?,
            None => Workspace::open_current()?,
        };
        output.verbose_ctx(
            "manifest",
            &format!("Loaded {}", workspace.manifest_path().display()),
        );

        let catalog = workspace.catalog()?;
        output.verbose_ctx(
            "manifest",
            &format!("{} component(s) declared", catalog.len()),
        );

        Ok(Self {
            workspace,
            catalog,
            memoize: config.memoize,
        })
    }

    fn assembler(&self) -> Assembler<'_> {
        if self.memoize {
            Assembler::new(&self.catalog)
        } else {
            Assembler::without_memo(&self.catalog)
        }
    }

    /// Assembles the named component, or the manifest root
    fn assemble(&self, output: &Output, component: Option<&str>) -> Result<Rc<Package>> {
        let name = self.workspace.component_or_root(component)?;
        output.verbose_ctx("assemble", &format!("Assembling '{}'", name));

        let package = self
            .assembler()
            .assemble(name)
            .with_context(|| format!("Failed to assemble component '{}'", name))?;

        output.verbose_ctx(
            "assemble",
            &format!(
                "'{}' assembled with {} direct sub-package(s)",
                name,
                package.sub_packages().len()
            ),
        );
        Ok(package)
    }
}

/// List declared components
pub fn list(session: &Session, output: &Output) -> Result<()> {
    if output.is_json() {
        let items: Vec<_> = session.catalog.iter().collect();
        output.data(&items);
        return Ok(());
    }

    println!("{:<24} {:<12} DEPENDENCIES", "COMPONENT", "UNITTEST");
    println!("{}", "-".repeat(60));
    for decl in session.catalog.iter() {
        let deps = if decl.dependencies.is_empty() {
            "-".to_string()
        } else {
            decl.dependencies.join(", ")
        };
        let unittest = if decl.unittest { "yes" } else { "no" };
        println!("{:<24} {:<12} {}", decl.name, unittest, deps);
    }

    Ok(())
}

/// Show one assembled package
pub fn show(session: &Session, output: &Output, component: Option<&str>) -> Result<()> {
    let package = session.assemble(output, component)?;
    let main_lib = package.main_lib()?;

    if output.is_json() {
        output.data(&json!({
            "name": package.name(),
            "main_lib": project_json(&main_lib),
            "unit_test": package.unit_test().map(|t| project_json(t)),
            "sub_packages": sub_package_names(&package),
        }));
        return Ok(());
    }

    println!("Package: {}", package.name());
    print_project("Main library", &main_lib);
    match package.unit_test() {
        Some(test) => print_project("Unit test", test),
        None => println!("Unit test: (none)"),
    }

    let subs = sub_package_names(&package);
    if subs.is_empty() {
        println!("Sub-packages: (none)");
    } else {
        println!("Sub-packages: {}", subs.join(", "));
    }

    Ok(())
}

/// Print the nested package tree
pub fn tree(session: &Session, output: &Output, component: Option<&str>) -> Result<()> {
    let package = session.assemble(output, component)?;

    if output.is_json() {
        output.data(&tree_json(&package));
        return Ok(());
    }

    let mut lines = vec![package.name().to_string()];
    render_tree(&package, "", &mut lines);
    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

/// Run the plan generator and print its result
pub fn plan(session: &Session, output: &Output, component: Option<&str>) -> Result<()> {
    let package = session.assemble(output, component)?;

    output.verbose_ctx("plan", "Running plan generator");
    let plan = generate::run(&mut PlanGenerator::new(), &package)?;
    output.verbose_ctx(
        "plan",
        &format!(
            "{} package(s), {} project(s)",
            plan.packages.len(),
            plan.projects.len()
        ),
    );

    if output.is_json() {
        output.data(&plan);
        return Ok(());
    }

    println!(
        "Build plan for {} ({} packages, {} projects)",
        plan.root,
        plan.packages.len(),
        plan.projects.len()
    );
    println!(
        "{} libraries, {} test executables",
        plan.libraries().count(),
        plan.tests().count()
    );
    println!();
    println!("{:<4} {:<40} {:<16} DEPENDS ON", "#", "PROJECT", "KIND");
    println!("{}", "-".repeat(80));
    for (i, key) in plan.build_order.iter().enumerate() {
        let Some(project) = plan.project(key) else {
            continue;
        };
        let deps = if project.dependencies.is_empty() {
            "-".to_string()
        } else {
            project.dependencies.join(", ")
        };
        println!("{:<4} {:<40} {:<16} {}", i + 1, key, project.kind, deps);
    }

    Ok(())
}

/// Assemble every component and walk its build graph
pub fn check(session: &Session, output: &Output) -> Result<()> {
    let mut assembler = session.assembler();
    let results = assembler.assemble_all();
    let total = results.len();

    let mut report = Vec::with_capacity(total);
    let mut failed = 0;
    for (name, result) in results {
        let outcome = result.map_err(anyhow::Error::from).and_then(|package| {
            let graph = BuildGraph::from_package(&package)?;
            graph.build_order()?;
            Ok(graph.len())
        });

        match outcome {
            Ok(projects) => {
                output.verbose_ctx("check", &format!("'{}' ok ({} projects)", name, projects));
                report.push(json!({ "component": name, "ok": true, "projects": projects }));
            }
            Err(e) => {
                failed += 1;
                if !output.is_json() {
                    output.error(&format!("{}: {:#}", name, e));
                }
                report.push(json!({ "component": name, "ok": false, "error": format!("{:#}", e) }));
            }
        }
    }

    if output.is_json() {
        output.data(&report);
    } else if failed == 0 {
        output.success(&format!("All {} component(s) assemble cleanly", total));
    }

    if failed > 0 {
        anyhow::bail!("{} of {} component(s) failed to assemble", failed, total);
    }
    Ok(())
}

fn sub_package_names(package: &Package) -> Vec<&str> {
    package.sub_packages().iter().map(|p| p.name()).collect()
}

fn dependency_keys(project: &Project) -> Vec<String> {
    project
        .dependencies()
        .iter()
        .map(|dep| dep.key().to_string())
        .collect()
}

fn project_json(project: &Project) -> Value {
    json!({
        "name": project.name(),
        "namespace": project.namespace(),
        "kind": project.kind(),
        "dependencies": dependency_keys(project),
    })
}

fn print_project(label: &str, project: &Project) {
    println!("{}: {} ({})", label, project.key(), project.kind());
    let deps = dependency_keys(project);
    if !deps.is_empty() {
        println!("  depends on: {}", deps.join(", "));
    }
}

fn tree_json(package: &Package) -> Value {
    json!({
        "name": package.name(),
        "sub_packages": package
            .sub_packages()
            .iter()
            .map(|sub| tree_json(sub))
            .collect::<Vec<_>>(),
    })
}

fn render_tree(package: &Package, prefix: &str, lines: &mut Vec<String>) {
    let count = package.sub_packages().len();
    for (i, sub) in package.sub_packages().iter().enumerate() {
        let (branch, indent) = if i + 1 == count {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        lines.push(format!("{}{}{}", prefix, branch, sub.name()));
        render_tree(sub, &format!("{}{}", prefix, indent), lines);
    }
}
