//! The scope filter: whether an ambiguous simple-name match is attributed to
//! the target class.
//!
//! Imports and fully-qualified references are unambiguous and bypass this
//! filter entirely. Everything else — a bare `Foo(`, `: Foo`, `@Foo` — could
//! just as well belong to an unrelated class of the same name, so retention
//! depends on what evidence the file offers and how strict the caller asked
//! the scan to be.

/// Evidence and policy inputs for one retain/discard decision.
#[derive(Debug, Clone, Copy)]
pub struct ScopeDecision<'a> {
    /// Only retain ambiguous matches in files that import or fully qualify
    /// the target class.
    pub strict_import: bool,

    /// Retain ambiguous matches in any file when an import is absent, not
    /// just same-package files.
    pub same_package_ok: bool,

    /// The file imports the target (by FQN or trailing simple name) or
    /// references its FQN directly.
    pub has_import_or_fqn: bool,

    /// Package declared by the scanned file, empty if none.
    pub file_package: &'a str,

    /// Package of the target class, empty if none.
    pub target_package: &'a str,
}

impl ScopeDecision<'_> {
    /// Decide whether ambiguous simple-name matches are retained.
    ///
    /// An import or FQN reference always wins. Without one, strict mode
    /// rejects, `same_package_ok` accepts, and otherwise only files in the
    /// target's own package are trusted (unqualified references within a
    /// package are legal in both Kotlin and Java).
    pub fn retain(&self) -> bool {
        if self.has_import_or_fqn {
            return true;
        }
        if self.strict_import {
            return false;
        }
        if self.same_package_ok {
            return true;
        }
        self.file_package == self.target_package
    }
}
