//! Target class resolution.
//!
//! Everything the engines need to know about the class being searched for
//! is extracted here, once per run: its package, its declared name, its
//! FQN, and the inventory of methods and fields a member-mode search can
//! select from. Extraction is regex-probe based over neutralized text, the
//! same heuristic level as the pattern engine that consumes it — close
//! enough for an inventory, no parser required.

use crate::error::FindUsagesError;
use crate::preprocess::neutralize;
use miette::{IntoDiagnostic, Result, WrapErr};
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Which half of the member inventory a search draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Field,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Field => "field",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            MemberKind::Method => "methods",
            MemberKind::Field => "fields",
        }
    }
}

/// The resolved search target. Immutable once built.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    /// Declared package, empty when the file has no package header.
    pub package: String,

    /// The class/interface/enum/object name the search anchors on.
    pub simple_name: String,

    /// `package.SimpleName`, or the bare name for packageless targets.
    pub fqn: String,

    pub methods: BTreeSet<String>,
    pub fields: BTreeSet<String>,
}

impl TargetSpec {
    /// The inventory a member-mode search selects from, sorted.
    pub fn members_of_kind(&self, kind: MemberKind) -> Vec<String> {
        let set = match kind {
            MemberKind::Method => &self.methods,
            MemberKind::Field => &self.fields,
        };
        set.iter().cloned().collect()
    }
}

/// Resolve the target file into a [`TargetSpec`].
///
/// When the file declares several types, the one matching the file's base
/// name wins; otherwise the first declared. Fails with
/// [`FindUsagesError::NoDeclarationFound`] when there is nothing to anchor
/// on. A read failure on the target file is fatal too — unlike candidate
/// files during the scan.
pub fn resolve(path: &Path) -> Result<TargetSpec> {
    let contents = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read target file: {}", path.display()))?;

    let clean = neutralize(&contents);
    let package = extract_package(&clean).unwrap_or_default();

    let declarations = find_declarations(&clean);
    if declarations.is_empty() {
        return Err(FindUsagesError::NoDeclarationFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let base_name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let simple_name = declarations
        .iter()
        .find(|d| d.name == base_name)
        .unwrap_or(&declarations[0])
        .name
        .clone();

    let fqn = if package.is_empty() {
        simple_name.clone()
    } else {
        format!("{package}.{simple_name}")
    };

    let (methods, fields) = extract_members(&clean, &simple_name);
    debug!(
        "resolved target {}: {} methods, {} fields",
        fqn,
        methods.len(),
        fields.len()
    );

    Ok(TargetSpec {
        package,
        simple_name,
        fqn,
        methods,
        fields,
    })
}

/// The file's single top-level `package a.b.c` declaration (trailing `;`
/// optional), if any. Expects neutralized text, so a commented-out header
/// cannot win.
pub fn extract_package(clean: &str) -> Option<String> {
    static PACKAGE_RE: OnceLock<Regex> = OnceLock::new();
    let re = PACKAGE_RE.get_or_init(|| {
        Regex::new(
            r"(?m)^\s*package\s+([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*;?\s*$",
        )
        .unwrap()
    });
    re.captures(clean).map(|caps| caps[1].to_string())
}

/// Parse a member selection: `all`, a comma-separated name list, or
/// `/regex/` over the available inventory. Shared by the `--member` flag
/// and the interactive prompt.
pub fn select_members(
    input: &str,
    available: &[String],
    kind: MemberKind,
) -> std::result::Result<Vec<String>, FindUsagesError> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(available.to_vec());
    }

    if let Some(pattern) = trimmed
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
        .filter(|p| !p.is_empty())
    {
        let re = Regex::new(pattern).map_err(|source| FindUsagesError::MemberPatternInvalid {
            pattern: pattern.to_string(),
            source,
        })?;
        let matched: Vec<String> = available.iter().filter(|m| re.is_match(m)).cloned().collect();
        if matched.is_empty() {
            return Err(FindUsagesError::MemberPatternEmpty {
                kind: kind.plural(),
                pattern: pattern.to_string(),
            });
        }
        return Ok(matched);
    }

    let names: Vec<String> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect();

    let unknown: Vec<&String> = names.iter().filter(|n| !available.contains(n)).collect();
    if names.is_empty() || !unknown.is_empty() {
        return Err(FindUsagesError::MemberNotFound {
            kind: kind.plural(),
            unknown: if names.is_empty() {
                trimmed.to_string()
            } else {
                unknown
                    .iter()
                    .map(|n| n.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            },
            available: available.join(", "),
        });
    }

    Ok(names)
}

struct Declaration {
    name: String,
    offset: usize,
}

/// Top-level type declarations, by independent probes per declaration
/// form. Kotlin and Java share enough lexical surface that one probe set
/// covers both.
fn find_declarations(clean: &str) -> Vec<Declaration> {
    const VIS: &str = r"(?:(?:public|private|protected|internal)\s+)?";
    let probes = [
        format!(
            r"(?m)^\s*{VIS}(?:(?:abstract|final|open|sealed|inner|static|data)\s+)*class\s+([A-Za-z_][A-Za-z0-9_]*)"
        ),
        format!(r"(?m)^\s*{VIS}(?:(?:sealed|abstract|fun)\s+)?interface\s+([A-Za-z_][A-Za-z0-9_]*)"),
        format!(r"(?m)^\s*{VIS}enum\s+(?:class\s+)?([A-Za-z_][A-Za-z0-9_]*)"),
        format!(r"(?m)^\s*{VIS}annotation\s+class\s+([A-Za-z_][A-Za-z0-9_]*)"),
        format!(r"(?m)^\s*{VIS}@interface\s+([A-Za-z_][A-Za-z0-9_]*)"),
        format!(r"(?m)^\s*{VIS}(?:companion\s+)?object\s+([A-Za-z_][A-Za-z0-9_]*)"),
    ];

    let mut declarations: Vec<Declaration> = Vec::new();
    for probe in &probes {
        let re = Regex::new(probe).unwrap();
        for caps in re.captures_iter(clean) {
            let m = caps.get(1).unwrap();
            declarations.push(Declaration {
                name: m.as_str().to_string(),
                offset: m.start(),
            });
        }
    }

    // One entry per name, at its first occurrence in the file.
    declarations.sort_by_key(|d| d.offset);
    let mut seen = HashSet::new();
    declarations.retain(|d| seen.insert(d.name.clone()));
    declarations
}

/// Member inventory of the chosen class.
///
/// The class's lexical scope is approximated as everything from its
/// declaration to the end of the file, body probes starting after the
/// opening brace. Primary-constructor `val`/`var` parameters count as
/// fields. The probes overshoot on locals inside method bodies; an
/// inventory is allowed that noise where the usage scan is not.
fn extract_members(clean: &str, class_name: &str) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut methods = BTreeSet::new();
    let mut fields = BTreeSet::new();

    let name = regex::escape(class_name);
    let decl_re = Regex::new(&format!(
        r"(?:class|interface|object|enum(?:\s+class)?)\s+{name}\b"
    ))
    .unwrap();
    let scope = match decl_re.find(clean) {
        Some(m) => &clean[m.start()..],
        None => clean,
    };

    // Primary-constructor `val`/`var` parameters.
    let ctor_re = Regex::new(&format!(r"class\s+{name}\s*\(([^)]*)\)")).unwrap();
    if let Some(caps) = ctor_re.captures(scope) {
        let param_re = Regex::new(r"(?:val|var)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
        for param in param_re.captures_iter(&caps[1]) {
            fields.insert(param[1].to_string());
        }
    }

    // A brace-less declaration (`class Foo(val x: Int)`) has no body
    // members beyond its constructor.
    let Some(brace) = scope.find('{') else {
        return (methods, fields);
    };
    let body = &scope[brace + 1..];

    let property_re = Regex::new(
        r"(?m)^\s*(?:(?:public|private|protected|internal|override|open|final|const|lateinit)\s+)*(?:val|var)\s+([A-Za-z_][A-Za-z0-9_]*)\s*[:=]",
    )
    .unwrap();
    for caps in property_re.captures_iter(body) {
        fields.insert(caps[1].to_string());
    }

    let java_field_re = Regex::new(
        r"(?m)^\s*(?:(?:public|private|protected|static|final|transient|volatile)\s+)*([A-Za-z_][A-Za-z0-9_]*)(?:<[^;=()]*>)?(?:\[\])?\s+([A-Za-z_][A-Za-z0-9_]*)\s*[;=]",
    )
    .unwrap();
    for caps in java_field_re.captures_iter(body) {
        if !is_keyword(&caps[1]) && !is_keyword(&caps[2]) {
            fields.insert(caps[2].to_string());
        }
    }

    let fun_re = Regex::new(
        r"(?m)^\s*(?:(?:public|private|protected|internal|override|open|final|abstract|suspend|operator|infix|inline|tailrec)\s+)*fun\s+(?:<[^>]*>\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*\(",
    )
    .unwrap();
    for caps in fun_re.captures_iter(body) {
        methods.insert(caps[1].to_string());
    }

    // The Java probe cannot tell a constructor from a method whose return
    // type it mistook for a name, so the class name is filtered out here.
    let java_method_re = Regex::new(
        r"(?m)^\s*(?:(?:public|private|protected|static|final|synchronized|abstract|native|default)\s+)*(?:<[^>]*>\s+)?([A-Za-z_][A-Za-z0-9_]*)(?:<[^>()]*>)?(?:\[\])?\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(",
    )
    .unwrap();
    for caps in java_method_re.captures_iter(body) {
        let method = &caps[2];
        if method != class_name && !is_keyword(&caps[1]) && !is_keyword(method) {
            methods.insert(method.to_string());
        }
    }

    (methods, fields)
}

fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "class"
            | "interface"
            | "enum"
            | "object"
            | "fun"
            | "val"
            | "var"
            | "if"
            | "else"
            | "for"
            | "while"
            | "when"
            | "switch"
            | "do"
            | "try"
            | "catch"
            | "finally"
            | "return"
            | "throw"
            | "new"
            | "break"
            | "continue"
            | "package"
            | "import"
            | "super"
            | "this"
    )
}
