use serde::Serialize;
use std::path::PathBuf;

/// The syntactic form a usage was recognized as.
///
/// Class-level categories apply in class mode; `Call`/`Reference`/`Override`
/// apply to methods and `DotAccess`/`ThisAccess`/`Reference`/`NamedArg` to
/// fields and properties. Every counted token occurrence carries exactly one
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    // Class-level
    ImportFqn,
    ImportSimple,
    DirectFqn,
    Constructor,
    TypeAnnotation,
    Generic,
    Annotation,
    InstanceCheck,
    SimpleName,

    // Member-level
    Call,
    Reference,
    Override,
    DotAccess,
    ThisAccess,
    NamedArg,
}

impl MatchCategory {
    /// Categories that count unconditionally, independent of the scope
    /// filter: an import or a fully-qualified reference is never ambiguous.
    pub fn is_unambiguous(&self) -> bool {
        matches!(
            self,
            MatchCategory::ImportFqn | MatchCategory::ImportSimple | MatchCategory::DirectFqn
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCategory::ImportFqn => "import_fqn",
            MatchCategory::ImportSimple => "import_simple",
            MatchCategory::DirectFqn => "direct_fqn",
            MatchCategory::Constructor => "constructor",
            MatchCategory::TypeAnnotation => "type_annotation",
            MatchCategory::Generic => "generic",
            MatchCategory::Annotation => "annotation",
            MatchCategory::InstanceCheck => "instance_check",
            MatchCategory::SimpleName => "simple_name",
            MatchCategory::Call => "call",
            MatchCategory::Reference => "reference",
            MatchCategory::Override => "override",
            MatchCategory::DotAccess => "dot_access",
            MatchCategory::ThisAccess => "this_access",
            MatchCategory::NamedArg => "named_arg",
        }
    }
}

impl std::fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recognized usage occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    /// Line number, 1-based.
    pub line: usize,

    /// Column of the matched name token, 1-based.
    pub column: usize,

    /// Member name for method/field mode; `None` in class mode.
    pub member: Option<String>,

    /// How the occurrence was classified.
    pub category: MatchCategory,

    /// The original (non-neutralized) line text. Truncation for display is
    /// the renderer's concern.
    pub snippet: String,
}

/// Aggregated scan outcome for one file.
///
/// Only files with at least one surviving hit are kept by the orchestrator,
/// so `total_matches` is always at least 1 in aggregated results and always
/// equals `hits.len()`. Hits are ordered by ascending (line, column).
#[derive(Debug, Clone, Serialize)]
pub struct FileScanResult {
    pub path: PathBuf,
    pub total_matches: usize,
    pub package: Option<String>,
    pub hits: Vec<Hit>,
}

impl FileScanResult {
    pub fn new(path: PathBuf, package: Option<String>, mut hits: Vec<Hit>) -> Self {
        hits.sort_by_key(|h| (h.line, h.column));
        Self {
            path,
            total_matches: hits.len(),
            package,
            hits,
        }
    }

    /// Distinct member names hit in this file, sorted.
    pub fn members(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .hits
            .iter()
            .filter_map(|h| h.member.as_deref())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Line numbers with at least one hit, ascending and deduplicated.
    pub fn lines(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.hits.iter().map(|h| h.line).collect();
        lines.dedup();
        lines
    }
}
