//! Method- and field-mode integration tests.
//!
//! These mirror the scenarios the tool exists for: a consumer file calling
//! methods on a typed variable, reading fields, overriding, and the false
//! positives that must stay out (comments, unrelated same-named classes,
//! unproven receivers).

use findusages::scan::{
    Capabilities, EngineChoice, MatchCategory, ScanOptions, ScanOrchestrator, ScanSummary,
    SearchMode,
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

const METHOD_USER: &str = r#"package com.other
import com.example.Foo

class MethodUser {
    val foo = Foo(1, "test")

    fun test() {
        foo.doSomething()
        foo.helper(42)
    }
}
"#;

const FIELD_USER: &str = r#"package com.other
import com.example.Foo

class FieldUser {
    val f: Foo = Foo(1, "a")

    fun printName() {
        println(f.name)
        println(f.id)
    }
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
        fs::write(&path, contents).expect("write fixture");
        self.files.push(path);
        self
    }

    fn scan(&self, mode: SearchMode, members: &[&str], engine: EngineChoice) -> ScanSummary {
        let spec = target::resolve(&self.target_path).expect("resolve target");
        let options = ScanOptions {
            mode,
            members: members.iter().map(|s| s.to_string()).collect(),
            strict_import: false,
            same_package_ok: false,
        };
        let caps = Capabilities {
            structural: true,
            progress: false,
        };
        let orchestrator =
            ScanOrchestrator::new(&spec, &options, engine, caps).expect("orchestrator");
        orchestrator.scan_files(&self.files, &self.target_path)
    }
}

fn file_names(summary: &ScanSummary) -> Vec<String> {
    summary
        .results
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

const BOTH_ENGINES: [EngineChoice; 2] = [EngineChoice::Pattern, EngineChoice::Auto];

#[test]
fn test_target_member_inventory() {
    let fixture = Fixture::new();
    let spec = target::resolve(&fixture.target_path).unwrap();
    assert!(spec.methods.contains("doSomething"));
    assert!(spec.methods.contains("helper"));
    assert!(spec.fields.contains("id"));
    assert!(spec.fields.contains("name"));
}

#[test]
fn test_method_mode_finds_calls() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add("MethodUser.kt", METHOD_USER);

        let summary = fixture.scan(SearchMode::Method, &["doSomething"], engine);
        assert_eq!(
            file_names(&summary),
            vec!["MethodUser.kt".to_string()],
            "engine {:?}",
            engine
        );

        let result = &summary.results[0];
        assert_eq!(result.total_matches, 1, "engine {:?}", engine);
        assert_eq!(result.hits[0].category, MatchCategory::Call);
        assert_eq!(result.hits[0].member.as_deref(), Some("doSomething"));
    }
}

#[test]
fn test_method_mode_multiple_members() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add("MethodUser.kt", METHOD_USER);

        let summary = fixture.scan(SearchMode::Method, &["doSomething", "helper"], engine);
        let result = &summary.results[0];
        assert_eq!(result.total_matches, 2, "engine {:?}", engine);
        assert_eq!(result.members(), vec!["doSomething", "helper"]);
    }
}

#[test]
fn test_field_mode_reads() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add("FieldUser.kt", FIELD_USER);

        let summary = fixture.scan(SearchMode::Field, &["name"], engine);
        let result = &summary.results[0];
        assert_eq!(result.total_matches, 1, "engine {:?}", engine);
        assert_eq!(result.hits[0].category, MatchCategory::DotAccess);

        let summary = fixture.scan(SearchMode::Field, &["id"], engine);
        let result = &summary.results[0];
        assert_eq!(result.total_matches, 1, "engine {:?}", engine);
    }
}

#[test]
fn test_override_is_its_own_category() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "Override.kt",
            r#"package com.other
import com.example.Foo

open class Base : Foo(0, "b") {
    override fun doSomething() {
    }
}
"#,
        );

        let summary = fixture.scan(SearchMode::Method, &["doSomething"], engine);
        let result = &summary.results[0];
        let categories: Vec<MatchCategory> = result.hits.iter().map(|h| h.category).collect();
        assert_eq!(categories, vec![MatchCategory::Override], "engine {:?}", engine);
    }
}

#[test]
fn test_comment_mention_yields_nothing() {
    // Scenario: the only mention of the member is inside a line comment.
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "Commented.kt",
            "package com.other\nimport com.example.Foo\n\n// calls doSomething\nclass Quiet\n",
        );

        let summary = fixture.scan(SearchMode::Method, &["doSomething"], engine);
        assert!(summary.results.is_empty(), "engine {:?}", engine);
    }
}

#[test]
fn test_unrelated_local_class_is_not_attributed() {
    // A local class that happens to be called Foo, with its own
    // doSomething, and no import of the target.
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "LocalFoo.kt",
            r#"package com.test

class Foo {
    fun doSomething() {
    }
}
"#,
        );

        let summary = fixture.scan(SearchMode::Method, &["doSomething"], engine);
        assert!(summary.results.is_empty(), "engine {:?}", engine);
    }
}

#[test]
fn test_bare_dot_access_needs_evidence() {
    // `other.name` with no typing, no class-name receiver, no import: the
    // receiver cannot be tied to the target and the hit is discounted.
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "Unproven.kt",
            r#"package com.example

class Unproven(val other: Thing) {
    fun show() {
        println(other.name)
    }
}
"#,
        );

        let summary = fixture.scan(SearchMode::Field, &["name"], engine);
        assert!(summary.results.is_empty(), "engine {:?}", engine);
    }
}

#[test]
fn test_companion_style_access_counts() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "Companion.kt",
            "package com.example\n\nfun show() {\n    println(Foo.name)\n}\n",
        );

        let summary = fixture.scan(SearchMode::Field, &["name"], engine);
        assert_eq!(
            file_names(&summary),
            vec!["Companion.kt".to_string()],
            "engine {:?}",
            engine
        );
    }
}

#[test]
fn test_method_reference() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "Refs.kt",
            r#"package com.other
import com.example.Foo

class Refs {
    val foo = Foo(1, "r")
    val handler = foo::doSomething
}
"#,
        );

        let summary = fixture.scan(SearchMode::Method, &["doSomething"], engine);
        let result = &summary.results[0];
        assert_eq!(result.hits[0].category, MatchCategory::Reference, "engine {:?}", engine);
    }
}

#[test]
fn test_named_argument() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "Named.kt",
            "package com.other\nimport com.example.Foo\n\nval foo = Foo(id = 1, name = \"n\")\n",
        );

        let summary = fixture.scan(SearchMode::Field, &["name"], engine);
        let result = &summary.results[0];
        assert_eq!(result.hits[0].category, MatchCategory::NamedArg, "engine {:?}", engine);
    }
}

#[test]
fn test_java_method_call() {
    for engine in BOTH_ENGINES {
        let mut fixture = Fixture::new();
        fixture.add(
            "JavaUser.java",
            r#"package com.other;

import com.example.Foo;

public class JavaUser {
    public void run() {
        Foo foo = new Foo(1, "j");
        foo.doSomething();
    }
}
"#,
        );

        let summary = fixture.scan(SearchMode::Method, &["doSomething"], engine);
        assert_eq!(
            file_names(&summary),
            vec!["JavaUser.java".to_string()],
            "engine {:?}",
            engine
        );
        let result = &summary.results[0];
        assert_eq!(result.hits[0].category, MatchCategory::Call, "engine {:?}", engine);
    }
}

#[test]
fn test_strict_import_gates_member_mode() {
    let mut fixture = Fixture::new();
    // Same package, no import: member matching is gated off under strict.
    fixture.add(
        "SamePkg.kt",
        "package com.example\n\nclass User {\n    val f: Foo = Foo(1, \"a\")\n    fun go() = f.name\n}\n",
    );

    let spec = target::resolve(&fixture.target_path).unwrap();
    let options = ScanOptions {
        mode: SearchMode::Field,
        members: vec!["name".to_string()],
        strict_import: true,
        same_package_ok: false,
    };
    let caps = Capabilities {
        structural: true,
        progress: false,
    };
    let orchestrator =
        ScanOrchestrator::new(&spec, &options, EngineChoice::Pattern, caps).unwrap();
    let summary = orchestrator.scan_files(&fixture.files, &fixture.target_path);
    assert!(summary.results.is_empty());
}
