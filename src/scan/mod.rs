//! The usage-classification engine.
//!
//! Two interchangeable scanners implement the same contract: the
//! [`PatternScanner`] works line-by-line with word-boundary regexes, the
//! [`StructuralScanner`] queries a tree-sitter syntax tree. The
//! [`FallbackScanner`] composes them, preferring structure and dropping to
//! patterns per file when parsing fails. The [`ScanOrchestrator`] runs a
//! chosen scanner over the candidate set in parallel.

mod hit;
mod orchestrator;
mod pattern;
mod scope;
mod structural;

pub use hit::{FileScanResult, Hit, MatchCategory};
pub use orchestrator::{ScanOrchestrator, ScanSummary};
pub use pattern::PatternScanner;
pub use scope::ScopeDecision;
pub use structural::StructuralScanner;

use crate::target::MemberKind;
use serde::Serialize;
use std::path::Path;

/// What the scan is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Any reference to the class itself.
    Class,
    /// Usages of selected methods.
    Method,
    /// Usages of selected fields/properties.
    Field,
}

impl SearchMode {
    pub fn member_kind(&self) -> Option<MemberKind> {
        match self {
            SearchMode::Class => None,
            SearchMode::Method => Some(MemberKind::Method),
            SearchMode::Field => Some(MemberKind::Field),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Class => "class",
            SearchMode::Method => "method",
            SearchMode::Field => "field",
        }
    }
}

/// Per-run scan parameters, fixed before the first file is read.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub mode: SearchMode,

    /// Selected member subset; empty in class mode.
    pub members: Vec<String>,

    /// Only retain ambiguous matches in files that import or fully qualify
    /// the target class.
    pub strict_import: bool,

    /// Retain ambiguous matches outside the target's package even without
    /// an import.
    pub same_package_ok: bool,
}

/// Which engine the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineChoice {
    /// Structural where a grammar covers the file, pattern otherwise.
    #[default]
    Auto,
    /// Pattern engine only.
    Pattern,
    /// Structural engine only; fatal if the capability is absent.
    Structural,
}

/// What this process is able to do, decided once at startup and passed down
/// explicitly. Missing capabilities degrade behavior locally instead of
/// being re-checked ad hoc.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Tree-sitter grammars are available for structural matching.
    pub structural: bool,

    /// A progress bar may be drawn during the scan.
    pub progress: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            structural: true,
            progress: false,
        }
    }
}

/// Outcome of scanning one file with one engine.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The engine processed the file; `None` means no surviving hits.
    Scanned(Option<FileScanResult>),

    /// The engine cannot process this file (no grammar, parse failure);
    /// the caller may try another engine.
    Unsupported,
}

/// A usage scanner over a single file's contents.
///
/// Implementations hold only read-only state so one instance can serve all
/// worker threads.
pub trait Scanner: Sync {
    fn scan(&self, path: &Path, contents: &str) -> ScanOutcome;
}

/// Structural-first dispatch with per-file pattern fallback.
pub struct FallbackScanner {
    structural: StructuralScanner,
    pattern: PatternScanner,
}

impl FallbackScanner {
    pub fn new(structural: StructuralScanner, pattern: PatternScanner) -> Self {
        Self {
            structural,
            pattern,
        }
    }
}

impl Scanner for FallbackScanner {
    fn scan(&self, path: &Path, contents: &str) -> ScanOutcome {
        match self.structural.scan(path, contents) {
            ScanOutcome::Unsupported => self.pattern.scan(path, contents),
            outcome => outcome,
        }
    }
}
