//! Syntax-tree matching via tree-sitter.
//!
//! Where the pattern engine guesses from lexical context, this engine asks
//! the tree: an identifier under a `type_arguments` node *is* a generic
//! argument, a callee under a `call_expression` *is* a call. Only Kotlin and
//! Java grammars are wired up; anything else — including files the grammar
//! cannot parse cleanly — reports [`ScanOutcome::Unsupported`] so the
//! orchestrator can fall back to patterns for that file alone.

mod java;
mod kotlin;

use super::hit::{FileScanResult, Hit, MatchCategory};
use super::scope::ScopeDecision;
use super::{ScanOptions, ScanOutcome, Scanner, SearchMode};
use crate::target::TargetSpec;
use std::path::Path;
use tracing::debug;
use tree_sitter::Node;

/// A hit located in the tree, before snippets and scope filtering.
pub(crate) struct RawHit {
    pub line: usize,
    pub column: usize,
    pub member: Option<String>,
    pub category: MatchCategory,
}

impl RawHit {
    pub fn at(node: Node, member: Option<&str>, category: MatchCategory) -> Self {
        let pos = node.start_position();
        Self {
            // tree-sitter rows/columns are 0-indexed
            line: pos.row + 1,
            column: pos.column + 1,
            member: member.map(String::from),
            category,
        }
    }
}

/// Everything one language pass extracts from a file.
#[derive(Default)]
pub(crate) struct Collection {
    pub package: Option<String>,
    pub imports: Vec<String>,

    /// A fully-qualified reference to the target appears outside imports.
    pub fqn_referenced: bool,

    /// The bare simple name appears somewhere.
    pub name_seen: bool,

    pub hits: Vec<RawHit>,
}

pub struct StructuralScanner {
    target: TargetSpec,
    options: ScanOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    Kotlin,
    Java,
}

impl StructuralScanner {
    pub fn new(target: &TargetSpec, options: &ScanOptions) -> Self {
        Self {
            target: target.clone(),
            options: options.clone(),
        }
    }

    fn grammar_for(path: &Path) -> Option<Grammar> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("kt") | Some("kts") => Some(Grammar::Kotlin),
            Some("java") => Some(Grammar::Java),
            _ => None,
        }
    }

    fn finish(&self, path: &Path, contents: &str, collection: Collection) -> Option<FileScanResult> {
        let has_import_or_fqn = self.has_import_or_fqn(&collection);

        let retain_simple = ScopeDecision {
            strict_import: self.options.strict_import,
            same_package_ok: self.options.same_package_ok,
            has_import_or_fqn,
            file_package: collection.package.as_deref().unwrap_or(""),
            target_package: &self.target.package,
        }
        .retain();

        if self.options.mode != SearchMode::Class {
            // Member mode: one file-level gate, mirroring the pattern
            // engine. Receiver checks already pruned individual hits.
            if !retain_simple && !(collection.name_seen && !self.options.strict_import) {
                return None;
            }
        }

        let lines: Vec<&str> = contents.lines().collect();
        let hits: Vec<Hit> = collection
            .hits
            .into_iter()
            .filter(|raw| {
                self.options.mode != SearchMode::Class
                    || raw.category.is_unambiguous()
                    || retain_simple
            })
            .map(|raw| Hit {
                line: raw.line,
                column: raw.column,
                member: raw.member,
                category: raw.category,
                snippet: lines
                    .get(raw.line - 1)
                    .map(|l| l.trim().to_string())
                    .unwrap_or_default(),
            })
            .collect();

        if hits.is_empty() {
            None
        } else {
            Some(FileScanResult::new(
                path.to_path_buf(),
                collection.package,
                hits,
            ))
        }
    }

    fn has_import_or_fqn(&self, collection: &Collection) -> bool {
        let simple_suffix = format!(".{}", self.target.simple_name);
        let imported = collection.imports.iter().any(|import| {
            (!self.target.package.is_empty() && import == &self.target.fqn)
                || import.ends_with(&simple_suffix)
        });
        imported || collection.fqn_referenced
    }
}

impl Scanner for StructuralScanner {
    fn scan(&self, path: &Path, contents: &str) -> ScanOutcome {
        let grammar = match Self::grammar_for(path) {
            Some(grammar) => grammar,
            None => return ScanOutcome::Unsupported,
        };

        let language = match grammar {
            Grammar::Kotlin => tree_sitter_kotlin::language(),
            Grammar::Java => tree_sitter_java::language(),
        };

        let mut parser = tree_sitter::Parser::new();
        if parser.set_language(&language).is_err() {
            return ScanOutcome::Unsupported;
        }

        let tree = match parser.parse(contents, None) {
            Some(tree) => tree,
            None => {
                debug!("structural parse failed for {}", path.display());
                return ScanOutcome::Unsupported;
            }
        };

        if tree.root_node().has_error() {
            debug!(
                "syntax errors in {}, deferring to pattern engine",
                path.display()
            );
            return ScanOutcome::Unsupported;
        }

        let collection = match grammar {
            Grammar::Kotlin => kotlin::collect(tree.root_node(), contents, &self.target, &self.options),
            Grammar::Java => java::collect(tree.root_node(), contents, &self.target, &self.options),
        };

        ScanOutcome::Scanned(self.finish(path, contents, collection))
    }
}

// Tree helpers shared by both language passes.

pub(crate) fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Pre-order visit of every node under (and including) `root`.
pub(crate) fn for_each_node<'t>(root: Node<'t>, f: &mut dyn FnMut(Node<'t>)) {
    let mut cursor = root.walk();
    loop {
        f(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// First child of `kind`, by kind rather than field name; several
/// tree-sitter grammars leave common children unnamed.
pub(crate) fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// The widest qualified path (`a.b.Foo`) that ends exactly at this node.
/// Returns the node itself when it is unqualified.
pub(crate) fn qualified_path_ending_at<'t>(node: Node<'t>, kinds: &[&str]) -> Node<'t> {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if kinds.contains(&parent.kind()) && parent.end_byte() == node.end_byte() {
            current = parent;
        } else {
            break;
        }
    }
    current
}

pub(crate) fn has_ancestor(node: Node, kinds: &[&str]) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        if kinds.contains(&n.kind()) {
            return true;
        }
        current = n.parent();
    }
    false
}

/// The word immediately preceding the node in source text, if any.
/// Used for checks the grammars express inconsistently, like `is`.
pub(crate) fn word_before_node<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    let before = source[..node.start_byte()].trim_end();
    let end = before.len();
    let start = before
        .rfind(|c: char| !c.is_alphanumeric() && c != '_')
        .map(|i| i + 1)
        .unwrap_or(0);
    (start < end).then(|| &before[start..end])
}

/// Import classification, shared by both language passes and aligned with
/// the pattern engine: exact FQN, or any path ending in the simple name.
pub(crate) fn import_category(path: &str, target: &TargetSpec) -> Option<MatchCategory> {
    if !target.package.is_empty() && path == target.fqn {
        return Some(MatchCategory::ImportFqn);
    }
    if path.ends_with(&format!(".{}", target.simple_name)) {
        return Some(MatchCategory::ImportSimple);
    }
    None
}

/// Base name of a type node's text: generics stripped, final path segment.
pub(crate) fn type_base_name(text: &str) -> &str {
    let no_generics = text.split('<').next().unwrap_or(text);
    no_generics.rsplit('.').next().unwrap_or(no_generics).trim()
}
