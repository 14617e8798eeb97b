//! Golden tests for the build plan
//!
//! The JSON plan is what downstream generators consume, so its shape and
//! ordering must stay stable.

use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

const MANIFEST: &str = r#"
root = "cbenchmark"

[[component]]
name = "cbenchmark"
namespace = "github.com\\jurgen-kluft\\cbenchmark"
dependencies = ["cbase"]

[[component]]
name = "cbase"
namespace = "github.com\\jurgen-kluft\\cbase"
"#;

const BENCH_NS: &str = "github.com\\jurgen-kluft\\cbenchmark";
const BASE_NS: &str = "github.com\\jurgen-kluft\\cbase";

fn run_plan(args: &[&str]) -> Value {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("buildgraph.toml"), MANIFEST).unwrap();

    let output = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("buildgraph"))
        .current_dir(dir.path())
        .env("BUILDGRAPH_CONFIG", dir.path().join("no-such-config.toml"))
        .args(args)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(&stdout).unwrap()
}

fn key(namespace: &str, name: &str) -> String {
    format!("{}::{}", namespace, name)
}

#[test]
fn plan_golden() {
    let plan = run_plan(&["plan", "--format", "json"]);

    let expected = json!({
        "root": "cbenchmark",
        "packages": ["cbenchmark", "cbase"],
        "projects": [
            {
                "key": key(BENCH_NS, "cbenchmark"),
                "name": "cbenchmark",
                "namespace": BENCH_NS,
                "kind": "library",
                "source_dirs": ["source/main/cpp"],
                "include_dirs": ["source/main/include"],
                "dependencies": [key(BASE_NS, "cbase")],
            },
            {
                "key": key(BASE_NS, "cbase"),
                "name": "cbase",
                "namespace": BASE_NS,
                "kind": "library",
                "source_dirs": ["source/main/cpp"],
                "include_dirs": ["source/main/include"],
                "dependencies": [],
            },
            {
                "key": key(BENCH_NS, "cbenchmark_test"),
                "name": "cbenchmark_test",
                "namespace": BENCH_NS,
                "kind": "test_executable",
                "source_dirs": ["source/test/cpp"],
                "include_dirs": ["source/test/include", "source/main/include"],
                "dependencies": [key(BASE_NS, "cbase"), key(BENCH_NS, "cbenchmark")],
            },
            {
                "key": key(BASE_NS, "cbase_test"),
                "name": "cbase_test",
                "namespace": BASE_NS,
                "kind": "test_executable",
                "source_dirs": ["source/test/cpp"],
                "include_dirs": ["source/test/include", "source/main/include"],
                "dependencies": [key(BASE_NS, "cbase")],
            },
        ],
        "build_order": [
            key(BASE_NS, "cbase"),
            key(BENCH_NS, "cbenchmark"),
            key(BENCH_NS, "cbenchmark_test"),
            key(BASE_NS, "cbase_test"),
        ],
    });

    assert_eq!(plan, expected);
}

#[test]
fn plan_is_deterministic() {
    let first = run_plan(&["plan", "--format", "json"]);
    let second = run_plan(&["plan", "--format", "json"]);

    assert_eq!(first, second);
}

#[test]
fn leaf_plan_golden() {
    let plan = run_plan(&["plan", "cbase", "--format", "json"]);

    assert_eq!(plan["root"], "cbase");
    assert_eq!(plan["packages"], json!(["cbase"]));
    assert_eq!(
        plan["build_order"],
        json!([key(BASE_NS, "cbase"), key(BASE_NS, "cbase_test")])
    );
}
