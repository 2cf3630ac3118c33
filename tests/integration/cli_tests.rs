//! End-to-end CLI tests.
//!
//! Exit code contract: 0 when usages were found, 1 when none were, 2 on
//! error (bad target, unknown member). JSON goes to stdout, diagnostics to
//! stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("findusages").expect("binary builds")
}

/// A small project: target class, one consumer, one ignored consumer.
fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        "Foo.kt",
        r#"package com.example

data class Foo(val id: Int, var name: String) {
    fun doSomething() {}
    fun helper(x: Int) = x
}
"#,
    );
    write(
        dir.path(),
        "MethodUser.kt",
        r#"package com.other
import com.example.Foo

class MethodUser {
    val foo = Foo(1, "test")

    fun test() {
        foo.doSomething()
        foo.helper(42)
    }
}
"#,
    );
    // Ignored directory with a clear usage inside; must never surface.
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    write(dir.path(), ".gitignore", "generated/\n");
    write(
        dir.path(),
        "generated/Generated.kt",
        "package com.gen\nimport com.example.Foo\nval g = Foo(9, \"g\")\n",
    );
    dir
}

fn write(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_help_lists_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("findusages"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--strict-import"))
        .stdout(predicate::str::contains("--engine"));
}

#[test]
fn test_class_mode_json() {
    let dir = project();

    let output = cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("class")
        .arg("--json")
        .arg("--with-lines")
        .output()
        .expect("run");

    assert!(output.status.success(), "expected exit 0");
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON on stdout");

    assert_eq!(report["target"]["fqn"], "com.example.Foo");
    assert_eq!(report["mode"], "class");

    let paths: Vec<String> = report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["path"].as_str().unwrap().to_string())
        .collect();
    assert!(paths.iter().any(|p| p.ends_with("MethodUser.kt")));
    // The ignored directory never surfaces, however clear the usage.
    assert!(!paths.iter().any(|p| p.contains("Generated.kt")));

    // Hits carry line/category/snippet for downstream renderers.
    let hits = report["results"][0]["hits"].as_array().unwrap();
    assert!(!hits.is_empty());
    assert!(hits[0]["line"].as_u64().is_some());
    assert!(hits[0]["category"].as_str().is_some());
}

#[test]
fn test_method_mode_finds_both_members() {
    let dir = project();

    let output = cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("method")
        .arg("--member")
        .arg("doSomething,helper")
        .arg("--json")
        .arg("--with-lines")
        .output()
        .expect("run");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let members: Vec<String> = report["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap().to_string())
        .collect();
    assert_eq!(members, vec!["doSomething", "helper"]);

    let hits = report["results"][0]["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn test_no_matches_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Foo.kt",
        "package com.example\n\nclass Foo {\n    fun doSomething() {}\n}\n",
    );
    write(dir.path(), "Other.kt", "package com.other\n\nclass Other\n");

    cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("class")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No usage found."));
}

#[test]
fn test_unknown_member_exits_two() {
    let dir = project();

    cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("method")
        .arg("--member")
        .arg("nonexistent")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nonexistent"));
}

#[test]
fn test_target_without_declaration_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "Empty.kt", "package com.example\nval x = 1\n");

    cmd()
        .arg(dir.path().join("Empty.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("class")
        .assert()
        .code(2);
}

#[test]
fn test_pattern_engine_flag() {
    let dir = project();

    cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("class")
        .arg("--engine")
        .arg("pattern")
        .assert()
        .success()
        .stdout(predicate::str::contains("MethodUser.kt"));
}

#[test]
fn test_strict_import_flag_filters() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "Foo.kt",
        "package com.example\n\nclass Foo {\n    fun doSomething() {}\n}\n",
    );
    // Same-package usage without an import.
    write(
        dir.path(),
        "Neighbor.kt",
        "package com.example\n\nval n = Foo()\n",
    );

    // Allowed by default (same package)...
    cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("class")
        .assert()
        .success();

    // ...but gone under --strict-import.
    cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("class")
        .arg("--strict-import")
        .assert()
        .code(1);
}

#[test]
fn test_limit_caps_table_output() {
    let dir = project();
    write(
        dir.path(),
        "Second.kt",
        "package com.more\nimport com.example.Foo\nval s = Foo(2, \"s\")\n",
    );

    cmd()
        .arg(dir.path().join("Foo.kt"))
        .arg("--root")
        .arg(dir.path())
        .arg("--mode")
        .arg("class")
        .arg("--limit")
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing first 1 results"));
}
