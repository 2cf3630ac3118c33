use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Run-fatal errors.
///
/// Per-file read or parse failures are not represented here: the scan
/// orchestrator contains them and only tallies them as diagnostics.
#[derive(Debug, Error, Diagnostic)]
pub enum FindUsagesError {
    /// The target file declares no class, interface, enum, object, or
    /// annotation the scan could anchor on.
    #[error("no class, interface, enum, or annotation declaration found in {}", .path.display())]
    #[diagnostic(
        code(findusages::no_declaration),
        help("the target must be a Kotlin or Java file with at least one top-level type declaration")
    )]
    NoDeclarationFound { path: PathBuf },

    /// The member selection named members the target class does not have.
    #[error("unknown {kind}: {unknown}")]
    #[diagnostic(
        code(findusages::member_not_found),
        help("available {kind}: {available}")
    )]
    MemberNotFound {
        kind: &'static str,
        unknown: String,
        available: String,
    },

    /// A `/regex/` member selection matched nothing.
    #[error("member pattern /{pattern}/ matched no {kind}")]
    #[diagnostic(code(findusages::member_pattern_empty))]
    MemberPatternEmpty { kind: &'static str, pattern: String },

    /// A `/regex/` member selection did not compile.
    #[error("invalid member pattern /{pattern}/: {source}")]
    #[diagnostic(code(findusages::member_pattern_invalid))]
    MemberPatternInvalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Structural matching was mandated but no grammar covers the request.
    #[error("structural engine requested but unavailable")]
    #[diagnostic(
        code(findusages::structural_unavailable),
        help("rerun with --engine auto or --engine pattern")
    )]
    StructuralUnavailable,
}
