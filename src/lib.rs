//! findusages - locate usages of a Kotlin/Java class across a codebase
//!
//! This library answers "which files use this class (or these members of
//! it)?" heuristically: no compiler, no build graph, no type resolution.
//!
//! # Architecture
//!
//! The scan pipeline consists of:
//! 1. **Target Resolution** - Extract package, class name, FQN, and member
//!    inventory from the target file
//! 2. **File Discovery** - Find candidate .kt/.kts/.java files, honoring
//!    ignore rules
//! 3. **Preprocessing** - Neutralize comments and string literals
//! 4. **Matching** - Classify occurrences by category, structurally
//!    (tree-sitter) where possible, lexically otherwise
//! 5. **Scope Filtering** - Decide whether ambiguous simple-name matches
//!    count
//! 6. **Reporting** - Render per-file hit records as a table or JSON

pub mod config;
pub mod discovery;
pub mod editor;
pub mod error;
pub mod interactive;
pub mod preprocess;
pub mod report;
pub mod scan;
pub mod target;

pub use config::Config;
pub use discovery::FileFinder;
pub use error::FindUsagesError;
pub use report::{ReportFormat, ReportOptions, Reporter};
pub use scan::{
    Capabilities, EngineChoice, FileScanResult, Hit, MatchCategory, ScanOptions, ScanOrchestrator,
    ScanSummary, SearchMode,
};
pub use target::{MemberKind, TargetSpec};
