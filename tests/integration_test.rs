//! Integration tests for the fixtures binary
//!
//! These drive the built binary end to end:
//! - CLI parsing and fixture lookup
//! - Output format (human/json/pretty)
//! - Exit codes for faults, usage errors and missing files
//! - Node graphs loaded from disk and returned after mutation
//! - Divergent fixtures refused by default and aborting when allowed
//!
//! Fixture semantics are covered in depth by the unit tests in src/fixtures/.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use tempfile::TempDir;

/// Test context for integration tests
///
/// Provides the fixtures binary path and a scratch directory.
struct TestContext {
    fixtures_bin: PathBuf,
    temp_dir: TempDir,
}

struct TestOutput {
    stdout: String,
    stderr: String,
    status: ExitStatus,
}

impl TestOutput {
    fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim()).expect("stdout is not JSON")
    }
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();

        // Use CARGO_BIN_EXE_fixtures if available (for cargo test), otherwise fallback
        let fixtures_bin = option_env!("CARGO_BIN_EXE_fixtures")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let debug_path = PathBuf::from("./target/debug/fixtures");
                if debug_path.exists() {
                    debug_path
                } else {
                    PathBuf::from("./target/release/fixtures")
                }
            });

        Self { fixtures_bin, temp_dir }
    }

    fn run_command(&self, args: &[&str]) -> TestOutput {
        let output = Command::new(&self.fixtures_bin)
            .args(args)
            .env_remove("FIXTURES_OUTPUT")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run fixtures");

        TestOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }

    fn write_file(&self, name: &str, contents: &str) -> String {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().to_string()
    }
}

#[test]
fn test_list_human() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["list"]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("16 fixtures"));
    assert!(out.stdout.contains("switch-dispatch(a: i32, b: i32) -> i32"));
    assert!(out.stdout.contains("unbounded-recursion"));
    assert!(out.stdout.contains("[divergent]"));
}

#[test]
fn test_list_json_envelope() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["list", "--output", "json"]);
    assert!(out.status.success());

    let json = out.json();
    assert_eq!(json["tool"], "fixtures");
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 16);
    assert_eq!(data[0]["name"], "conditional-call");
    assert_eq!(data[0]["params"][0]["kind"], "bool");
}

#[test]
fn test_run_scalar_fixture() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["run", "byte-saturation-check", "100", "100"]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert_eq!(out.stdout.trim(), "byte-saturation-check(100, 100) = 2");

    let out = ctx.run_command(&["run", "switch-dispatch", "-3", "8"]);
    assert_eq!(out.stdout.trim(), "switch-dispatch(-3, 8) = 5");
}

#[test]
fn test_run_nullable_json() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["run", "nullable-choice", "1", "--output", "json"]);
    assert!(out.status.success());
    let json = out.json();
    assert_eq!(json["data"]["outcome"]["returned"]["type"], "null");

    let out = ctx.run_command(&["run", "nullable-choice", "7", "--output", "json"]);
    let json = out.json();
    assert_eq!(json["data"]["outcome"]["returned"]["value"], "b");
}

#[test]
fn test_run_alias_mutation_with_graph_file() {
    let ctx = TestContext::new();
    // node 1 links to node 0; b = node 0 is zeroed through the chain
    let graph = ctx.write_file(
        "graph.json",
        r#"{"nodes":[{"x":4,"y":0,"link":null},{"x":1,"y":1,"link":0}]}"#,
    );

    let out = ctx.run_command(&[
        "run",
        "alias-mutation",
        "1",
        "0",
        "--graph",
        &graph,
        "--output",
        "json",
    ]);
    assert!(out.status.success(), "stderr: {}", out.stderr);

    let json = out.json();
    let data = &json["data"];
    assert_eq!(data["outcome"]["returned"]["value"], 1337);
    assert_eq!(data["graph"]["nodes"][0]["x"], 0);
    assert_eq!(data["graph"]["nodes"][0]["y"], 1337);
    assert_eq!(data["graph"]["nodes"][1]["x"], 1);
}

#[test]
fn test_run_graph_dot_output() {
    let ctx = TestContext::new();
    let graph = ctx.write_file(
        "graph.json",
        r#"{"nodes":[{"x":4,"y":0},{"x":1,"y":1,"link":0}]}"#,
    );

    let out = ctx.run_command(&["run", "mutate-chain", "1", "--graph", &graph, "--dot"]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("mutate-chain(1) = unit"));
    assert!(out.stdout.contains("digraph NodeGraph {"));
    assert!(out.stdout.contains("\"1\" -> \"0\""));
}

#[test]
fn test_cyclic_graph_warns_before_running() {
    let ctx = TestContext::new();
    // self-loop with y == 0, so the walk stops immediately
    let graph = ctx.write_file("graph.json", r#"{"nodes":[{"x":1,"y":0,"link":0}]}"#);

    let out = ctx.run_command(&["run", "mutate-chain", "0", "--graph", &graph]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("node graph is cyclic"), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("mutate-chain(0) = unit"));

    let acyclic = ctx.write_file("acyclic.json", r#"{"nodes":[{"x":1,"y":0}]}"#);
    let out = ctx.run_command(&["run", "mutate-chain", "0", "--graph", &acyclic]);
    assert!(out.status.success());
    assert!(!out.stderr.contains("cyclic"));
}

#[test]
fn test_fault_exits_with_validation_code() {
    let ctx = TestContext::new();
    let graph = ctx.write_file("graph.json", r#"{"nodes":[{"x":1,"y":1}]}"#);

    let out = ctx.run_command(&["run", "mutate-chain", "0", "--graph", &graph]);
    assert_eq!(out.status.code(), Some(5));
    assert!(out.stdout.contains("faulted: null reference: `a.link` is unset"));

    let out = ctx.run_command(&["run", "hash-of", "null", "--output", "json"]);
    assert_eq!(out.status.code(), Some(5));
    assert_eq!(out.json()["data"]["outcome"]["fault"]["kind"], "null_reference");
}

#[test]
fn test_usage_errors() {
    let ctx = TestContext::new();

    let out = ctx.run_command(&["run", "no-such-fixture"]);
    assert_eq!(out.status.code(), Some(6));
    assert!(out.stderr.contains("not found"));

    let out = ctx.run_command(&["run", "switch-dispatch", "1"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stderr.contains("takes 2 argument(s), got 1"));

    let out = ctx.run_command(&["run", "byte-saturation-check", "300", "0", "--output", "json"]);
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(out.json()["data"]["code"], "E006");

    let out = ctx.run_command(&["run", "hash-of", "2"]);
    assert_eq!(out.status.code(), Some(6));
}

#[test]
fn test_missing_graph_file() {
    let ctx = TestContext::new();
    let missing = ctx.temp_dir.path().join("absent.json");
    let out = ctx.run_command(&["run", "mutate-chain", "0", "--graph", &missing.to_string_lossy()]);
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn test_divergent_fixture_refused_by_default() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["run", "unbounded-recursion", "0"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stderr.contains("never returns"));
    assert!(out.stdout.contains("--allow-divergence"));
}

#[test]
fn test_divergent_fixture_exhausts_stack() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["run", "unbounded-recursion", "0", "--allow-divergence"]);
    assert!(!out.status.success());
    assert!(!out.stdout.contains(" = "), "returned a value: {}", out.stdout);
    assert!(out.stderr.contains("overflowed its stack"), "stderr: {}", out.stderr);
}

#[test]
fn test_sweep_single_fixture_human() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["sweep", "composite-flags"]);
    assert!(out.status.success(), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("composite-flags (32 inputs)"));
    assert!(!out.stdout.contains("never reached"));
}

#[test]
fn test_sweep_writes_report() {
    let ctx = TestContext::new();
    let report = ctx.temp_dir.path().join("report.json");
    let out = ctx.run_command(&[
        "sweep",
        "byte-saturation-check",
        "--report",
        &report.to_string_lossy(),
        "--output",
        "json",
    ]);
    assert!(out.status.success(), "stderr: {}", out.stderr);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    let table = &written["tables"][0];
    assert_eq!(table["fixture"], "byte-saturation-check");
    assert_eq!(table["inputs"], 65536);
    assert_eq!(table["missing"][0], "1");
    assert_eq!(out.json()["data"]["tables"][0]["outcomes"]["2"]["count"], 8128);
}

#[test]
fn test_sweep_without_domain() {
    let ctx = TestContext::new();
    let out = ctx.run_command(&["sweep", "identity"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stderr.contains("no sweep domain"));
}
