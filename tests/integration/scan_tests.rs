//! Class-mode integration tests over on-disk fixtures.
//!
//! Fixtures are built per test in a temp directory and scanned through the
//! orchestrator, the same path the CLI takes. Where behavior must be
//! engine-independent the test runs under both the pattern engine and the
//! auto (structural-first) dispatch.

use findusages::scan::{
    Capabilities, EngineChoice, ScanOptions, ScanOrchestrator, ScanSummary, SearchMode,
};
use findusages::target;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TARGET_FOO: &str = r#"package com.example

data class Foo(val id: Int, var name: String) {
    fun doSomething() {}
    fun helper(x: Int) = x
}
"#;

struct Fixture {
    dir: TempDir,
    target_path: PathBuf,
    files: Vec<PathBuf>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let target_path = dir.path().join("Foo.kt");
        fs::write(&target_path, TARGET_FOO).expect("write target");
        Self {
            dir,
            target_path,
            files: Vec::new(),
        }
    }

    fn add(&mut self, name: &str, contents: &str) -> &mut Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, contents).expect("write fixture");
        self.files.push(path);
        self
    }

    fn scan(&self, options: &ScanOptions, engine: EngineChoice) -> ScanSummary {
        let spec = target::resolve(&self.target_path).expect("resolve target");
        let caps = Capabilities {
            structural: true,
            progress: false,
        };
        let orchestrator =
            ScanOrchestrator::new(&spec, options, engine, caps).expect("orchestrator");
        orchestrator.scan_files(&self.files, &self.target_path)
    }
}

fn class_options() -> ScanOptions {
    ScanOptions {
        mode: SearchMode::Class,
        members: Vec::new(),
        strict_import: false,
        same_package_ok: false,
    }
}

fn file_names(summary: &ScanSummary) -> Vec<String> {
    summary
        .results
        .iter()
        .map(|r| {
            r.path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string()
        })
        .collect()
}

fn result_for<'a>(summary: &'a ScanSummary, name: &str) -> &'a findusages::FileScanResult {
    summary
        .results
        .iter()
        .find(|r| r.path.file_name().unwrap().to_string_lossy() == name)
        .unwrap_or_else(|| panic!("expected {} in results", name))
}

const BOTH_ENGINES: [EngineChoice; 2] = [EngineChoice::Pattern, EngineChoice::Auto];

#[test]
fn test_importing_file_is_found() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
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

        let summary = fixture.scan(&class_options(), engine);
        assert_eq!(
            file_names(&summary),
            vec!["MethodUser.kt".to_string()],
            "engine {:?}",
            engine
        );

        let result = result_for(&summary, "MethodUser.kt");
        // One import, one constructor call.
        assert_eq!(result.total_matches, 2, "engine {:?}", engine);
        assert_eq!(result.total_matches, result.hits.len());
        assert_eq!(result.package.as_deref(), Some("com.other"));

        // Hits are ordered by line.
        let lines: Vec<usize> = result.hits.iter().map(|h| h.line).collect();
        let mut sorted = lines.clone();
        sorted.sort_unstable();
        assert_eq!(lines, sorted);
    }
}

#[test]
fn test_comment_and_string_mentions_do_not_count() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "Comments.kt",
            r#"package com.other

class Comments {
    // Foo is mentioned here
    /* and Foo here */
    val s = "Foo looks like a class name"
}
"#,
        );

        let summary = fixture.scan(&class_options(), engine);
        assert!(
            summary.results.is_empty(),
            "engine {:?}: comment/string mentions must not count",
            engine
        );
    }
}

#[test]
fn test_scope_law_strict_import() {
    // Without an import or FQN, strict mode yields zero simple-name
    // matches, regardless of same_package_ok.
    for same_package_ok in [false, true] {
        let mut fixture = Fixture::new();
        fixture.add(
            "SamePackage.kt",
            "package com.example\n\nclass User {\n    val x = Foo(1, \"a\")\n}\n",
        );

        let options = ScanOptions {
            strict_import: true,
            same_package_ok,
            ..class_options()
        };
        let summary = fixture.scan(&options, EngineChoice::Pattern);
        assert!(summary.results.is_empty());
    }
}

#[test]
fn test_scope_law_same_package() {
    // Same package, non-strict: simple-name matches are retained without
    // an import.
    let mut fixture = Fixture::new();
    fixture.add(
        "SamePackage.kt",
        "package com.example\n\nclass User {\n    val x = Foo(1, \"a\")\n}\n",
    );

    let summary = fixture.scan(&class_options(), EngineChoice::Pattern);
    assert_eq!(file_names(&summary), vec!["SamePackage.kt".to_string()]);
}

#[test]
fn test_scope_other_package_needs_evidence() {
    let mut fixture = Fixture::new();
    fixture.add(
        "Elsewhere.kt",
        "package com.unrelated\n\nclass User {\n    val x = Foo(1, \"a\")\n}\n",
    );

    // Rejected by default...
    let summary = fixture.scan(&class_options(), EngineChoice::Pattern);
    assert!(summary.results.is_empty());

    // ...retained when ambiguous matches are allowed everywhere.
    let options = ScanOptions {
        same_package_ok: true,
        ..class_options()
    };
    let summary = fixture.scan(&options, EngineChoice::Pattern);
    assert_eq!(file_names(&summary), vec!["Elsewhere.kt".to_string()]);
}

#[test]
fn test_fqn_usage_counts_without_import() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "FqnUser.kt",
            "package com.unrelated\n\nclass User {\n    val x = com.example.Foo(1, \"a\")\n}\n",
        );

        let summary = fixture.scan(&class_options(), engine);
        let result = result_for(&summary, "FqnUser.kt");
        // The FQN occurrence is one hit; the embedded simple name is not
        // double-counted as a constructor.
        assert_eq!(result.total_matches, 1, "engine {:?}", engine);
    }
}

#[test]
fn test_java_file_with_import() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "User.java",
            r#"package com.other;

import com.example.Foo;

public class User {
    private Foo foo = new Foo(1, "a");

    public boolean check(Object o) {
        return o instanceof Foo;
    }
}
"#,
        );

        let summary = fixture.scan(&class_options(), engine);
        let result = result_for(&summary, "User.java");
        // import + field type + constructor + instanceof
        assert_eq!(result.total_matches, 4, "engine {:?}", engine);
    }
}

#[test]
fn test_idempotent_scans() {
    let mut fixture = Fixture::new();
    fixture.add(
        "MethodUser.kt",
        "package com.other\nimport com.example.Foo\n\nval foo = Foo(1, \"x\")\n",
    );

    for engine in BOTH_ENGINES {
        let first = fixture.scan(&class_options(), engine);
        let second = fixture.scan(&class_options(), engine);
        assert_eq!(first.results.len(), second.results.len());
        let a = result_for(&first, "MethodUser.kt");
        let b = result_for(&second, "MethodUser.kt");
        assert_eq!(a.total_matches, b.total_matches);
        assert_eq!(a.hits, b.hits);
    }
}

#[test]
fn test_target_file_not_reported() {
    let fixture_files = {
        let mut fixture = Fixture::new();
        // The target file itself is in the candidate list.
        fixture.files.push(fixture.target_path.clone());
        fixture.add(
            "User.kt",
            "package com.other\nimport com.example.Foo\nval x = Foo(1, \"a\")\n",
        );
        let summary = fixture.scan(&class_options(), EngineChoice::Pattern);
        file_names(&summary)
    };
    assert_eq!(fixture_files, vec!["User.kt".to_string()]);
}

#[test]
fn test_no_declaration_in_target_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let target_path = dir.path().join("Empty.kt");
    fs::write(&target_path, "package com.example\n\nval x = 1\n").unwrap();

    let err = target::resolve(&target_path);
    assert!(err.is_err());
}

#[test]
fn test_unreadable_candidate_is_not_fatal() {
    let mut fixture = Fixture::new();
    fixture.add(
        "Good.kt",
        "package com.other\nimport com.example.Foo\nval x = Foo(1, \"a\")\n",
    );
    fixture.files.push(fixture.dir.path().join("Missing.kt"));

    let summary = fixture.scan(&class_options(), EngineChoice::Pattern);
    assert_eq!(file_names(&summary), vec!["Good.kt".to_string()]);
    assert_eq!(summary.unreadable, 1);
}

#[test]
fn test_count_composition() {
    let mut fixture = Fixture::new();
    fixture.add(
        "Busy.kt",
        r#"package com.other
import com.example.Foo

class Busy {
    val a: Foo = Foo(1, "a")
    val b: List<Foo> = listOf()
    fun make() = Foo(2, "b")
}
"#,
    );

    for engine in BOTH_ENGINES {
        let summary = fixture.scan(&class_options(), engine);
        let result = result_for(&summary, "Busy.kt");
        assert_eq!(
            result.total_matches,
            result.hits.len(),
            "engine {:?}",
            engine
        );
        // import, type, ctor, generic, ctor — each token once.
        assert_eq!(result.total_matches, 5, "engine {:?}", engine);
    }
}

#[test]
fn test_results_only_list_files_with_hits() {
    let mut fixture = Fixture::new();
    fixture
        .add(
            "User.kt",
            "package com.other\nimport com.example.Foo\nval x = Foo(1, \"a\")\n",
        )
        .add("Unrelated.kt", "package com.other\n\nclass Unrelated\n");

    let summary = fixture.scan(&class_options(), EngineChoice::Pattern);
    assert_eq!(file_names(&summary), vec!["User.kt".to_string()]);
    assert_eq!(summary.scanned, 2);
}
