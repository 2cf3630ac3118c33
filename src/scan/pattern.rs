//! Line-oriented pattern matching over neutralized source text.
//!
//! Every occurrence of the class name (or a member name) is located with a
//! word-boundary regex, then classified into exactly one [`MatchCategory`]
//! by inspecting its lexical context. Classifying occurrences instead of
//! counting overlapping per-category regexes keeps category totals disjoint:
//! a constructor call is a constructor call, not also a simple-name mention.

use super::hit::{FileScanResult, Hit, MatchCategory};
use super::scope::ScopeDecision;
use super::{ScanOptions, ScanOutcome, Scanner, SearchMode};
use crate::preprocess::neutralize;
use crate::target::{extract_package, MemberKind, TargetSpec};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

pub struct PatternScanner {
    target: TargetSpec,
    options: ScanOptions,

    /// `\bFoo\b`
    name_re: Regex,

    /// `\bcom\.example\.Foo\b`; absent when the target has no package, in
    /// which case imports are the only unambiguous evidence.
    fqn_re: Option<Regex>,

    /// `\bimport\s+com\.example\.Foo\b`
    import_fqn_re: Option<Regex>,

    /// `\bimport\s+<dotted path>\.Foo\b`
    import_simple_re: Regex,

    /// `<...Foo...>` spans for generic-argument classification.
    generic_re: Regex,

    /// `val/var x: Foo`, `val x = Foo(...)`, and `Foo x` declarations used
    /// for receiver typing.
    typed_var_kotlin_re: Regex,
    typed_var_init_re: Regex,
    typed_var_java_re: Regex,

    /// One `\bname\b` matcher per selected member.
    member_res: Vec<(String, Regex)>,
}

impl PatternScanner {
    pub fn new(target: &TargetSpec, options: &ScanOptions) -> Self {
        let name = regex::escape(&target.simple_name);
        let fqn = regex::escape(&target.fqn);

        let (fqn_re, import_fqn_re) = if target.package.is_empty() {
            (None, None)
        } else {
            (
                Some(Regex::new(&format!(r"\b{fqn}\b")).unwrap()),
                Some(Regex::new(&format!(r"\bimport\s+{fqn}\b")).unwrap()),
            )
        };

        let member_res = options
            .members
            .iter()
            .map(|m| {
                let re = Regex::new(&format!(r"\b{}\b", regex::escape(m))).unwrap();
                (m.clone(), re)
            })
            .collect();

        Self {
            target: target.clone(),
            options: options.clone(),
            name_re: Regex::new(&format!(r"\b{name}\b")).unwrap(),
            fqn_re,
            import_fqn_re,
            import_simple_re: Regex::new(&format!(
                r"\bimport\s+[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*\.{name}\b"
            ))
            .unwrap(),
            generic_re: Regex::new(&format!(r"<[^<>]*\b{name}\b[^<>]*>")).unwrap(),
            typed_var_kotlin_re: Regex::new(&format!(
                r"(?:val|var)\s+([A-Za-z_][A-Za-z0-9_]*)\s*:\s*{name}\b"
            ))
            .unwrap(),
            typed_var_init_re: Regex::new(&format!(
                r"(?:val|var)\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*{name}\s*\("
            ))
            .unwrap(),
            typed_var_java_re: Regex::new(&format!(
                r"\b{name}\s+([A-Za-z_][A-Za-z0-9_]*)\b"
            ))
            .unwrap(),
            member_res,
        }
    }

    /// File-level evidence: an import of the class or a fully-qualified
    /// reference anywhere in the neutralized text.
    fn has_import_or_fqn(&self, clean: &str) -> bool {
        if let Some(re) = &self.import_fqn_re {
            if re.is_match(clean) {
                return true;
            }
        }
        if self.import_simple_re.is_match(clean) {
            return true;
        }
        if let Some(re) = &self.fqn_re {
            if re.is_match(clean) {
                return true;
            }
        }
        false
    }

    fn scan_class_mode(&self, path: &Path, contents: &str) -> Option<FileScanResult> {
        let clean = neutralize(contents);
        let package = extract_package(&clean);
        let has_import_or_fqn = self.has_import_or_fqn(&clean);

        let retain_simple = ScopeDecision {
            strict_import: self.options.strict_import,
            same_package_ok: self.options.same_package_ok,
            has_import_or_fqn,
            file_package: package.as_deref().unwrap_or(""),
            target_package: &self.target.package,
        }
        .retain();

        let mut hits = Vec::new();

        for (idx, (line, clean_line)) in contents.lines().zip(clean.lines()).enumerate() {
            let line_no = idx + 1;
            let fqn_spans = self.fqn_spans(clean_line);
            let generic_spans: Vec<(usize, usize)> = self
                .generic_re
                .find_iter(clean_line)
                .map(|m| (m.start(), m.end()))
                .collect();
            let is_import_line = clean_line.trim_start().starts_with("import ");

            for m in self.name_re.find_iter(clean_line) {
                let category = classify_class_token(
                    clean_line,
                    m.start(),
                    m.end(),
                    is_import_line,
                    &fqn_spans,
                    &generic_spans,
                );

                if category.is_unambiguous() || retain_simple {
                    hits.push(Hit {
                        line: line_no,
                        column: m.start() + 1,
                        member: None,
                        category,
                        snippet: line.trim().to_string(),
                    });
                }
            }
        }

        if hits.is_empty() {
            None
        } else {
            Some(FileScanResult::new(path.to_path_buf(), package, hits))
        }
    }

    fn scan_member_mode(
        &self,
        path: &Path,
        contents: &str,
        kind: MemberKind,
    ) -> Option<FileScanResult> {
        let clean = neutralize(contents);
        let package = extract_package(&clean);
        let has_import_or_fqn = self.has_import_or_fqn(&clean);
        let name_present = self.name_re.is_match(&clean);

        // File-level gate: member matching is pointless in a file with no
        // evidence of the class at all. Unlike class mode this runs once per
        // file; a bare simple-name mention is enough to enter the per-member
        // pass (the receiver checks below still discount unproven accesses).
        let retain = ScopeDecision {
            strict_import: self.options.strict_import,
            same_package_ok: self.options.same_package_ok,
            has_import_or_fqn,
            file_package: package.as_deref().unwrap_or(""),
            target_package: &self.target.package,
        }
        .retain();
        if !retain && !(name_present && !self.options.strict_import) {
            return None;
        }

        let typed_vars = self.collect_typed_vars(&clean);

        let mut hits = Vec::new();

        for (idx, (line, clean_line)) in contents.lines().zip(clean.lines()).enumerate() {
            let line_no = idx + 1;
            let has_override = contains_word(clean_line, "override");

            for (member, re) in &self.member_res {
                for m in re.find_iter(clean_line) {
                    let category = self.classify_member_token(
                        clean_line,
                        m.start(),
                        m.end(),
                        kind,
                        has_override,
                        has_import_or_fqn,
                        &typed_vars,
                    );

                    if let Some(category) = category {
                        hits.push(Hit {
                            line: line_no,
                            column: m.start() + 1,
                            member: Some(member.clone()),
                            category,
                            snippet: line.trim().to_string(),
                        });
                    }
                }
            }
        }

        if hits.is_empty() {
            None
        } else {
            Some(FileScanResult::new(path.to_path_buf(), package, hits))
        }
    }

    fn fqn_spans(&self, clean_line: &str) -> Vec<(usize, usize)> {
        match &self.fqn_re {
            Some(re) => re
                .find_iter(clean_line)
                .map(|m| (m.start(), m.end()))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Local variables known to hold the target type: annotated
    /// declarations (`val x: Foo`, `Foo x`) and direct constructor
    /// initializers (`val x = Foo(...)`), scanned over the whole
    /// neutralized file.
    fn collect_typed_vars(&self, clean: &str) -> HashSet<String> {
        let mut vars = HashSet::new();
        for caps in self.typed_var_kotlin_re.captures_iter(clean) {
            vars.insert(caps[1].to_string());
        }
        for caps in self.typed_var_init_re.captures_iter(clean) {
            vars.insert(caps[1].to_string());
        }
        for caps in self.typed_var_java_re.captures_iter(clean) {
            vars.insert(caps[1].to_string());
        }
        vars
    }

    /// Classify one member-name token, or return `None` when the occurrence
    /// fits no category admissible for the member kind.
    #[allow(clippy::too_many_arguments)]
    fn classify_member_token(
        &self,
        line: &str,
        start: usize,
        end: usize,
        kind: MemberKind,
        line_has_override: bool,
        has_import_or_fqn: bool,
        typed_vars: &HashSet<String>,
    ) -> Option<MatchCategory> {
        // `::name` — method or property reference.
        if preceded_by_colons(line, start) {
            return Some(MatchCategory::Reference);
        }

        match kind {
            MemberKind::Method => {
                if next_non_ws(line, end) == Some('(') {
                    // `override fun name(...)` — the modifier appears
                    // anywhere before the name on the same line.
                    if line_has_override && contains_word(&line[..start], "override") {
                        return Some(MatchCategory::Override);
                    }
                    // A plain `fun name(...)` declares a function, possibly
                    // on an unrelated class; only overrides tie a
                    // declaration to the target.
                    if line_word_precedes(line, start, "fun") {
                        return None;
                    }
                    return Some(MatchCategory::Call);
                }
                None
            }
            MemberKind::Field => {
                if let Some(receiver) = receiver_before_dot(line, start) {
                    if receiver == "this" {
                        // No local typing can confirm `this`; only explicit
                        // import/FQN evidence keeps the hit.
                        return has_import_or_fqn.then_some(MatchCategory::ThisAccess);
                    }
                    let confirmed = typed_vars.contains(receiver)
                        || receiver == self.target.simple_name
                        || has_import_or_fqn;
                    return confirmed.then_some(MatchCategory::DotAccess);
                }
                if named_arg_follows(line, end) {
                    return Some(MatchCategory::NamedArg);
                }
                None
            }
        }
    }
}

impl Scanner for PatternScanner {
    fn scan(&self, path: &Path, contents: &str) -> ScanOutcome {
        let result = match self.options.mode {
            SearchMode::Class => self.scan_class_mode(path, contents),
            SearchMode::Method => self.scan_member_mode(path, contents, MemberKind::Method),
            SearchMode::Field => self.scan_member_mode(path, contents, MemberKind::Field),
        };
        ScanOutcome::Scanned(result)
    }
}

/// Classify one class-name token occurrence. Most specific context wins;
/// every token lands in exactly one category.
fn classify_class_token(
    line: &str,
    start: usize,
    end: usize,
    is_import_line: bool,
    fqn_spans: &[(usize, usize)],
    generic_spans: &[(usize, usize)],
) -> MatchCategory {
    let in_fqn = fqn_spans.iter().any(|&(s, e)| start >= s && end <= e);

    if is_import_line {
        if in_fqn {
            return MatchCategory::ImportFqn;
        }
        if start > 0 && line.as_bytes()[start - 1] == b'.' {
            return MatchCategory::ImportSimple;
        }
        // `import Foo` with no qualifier: fall through as an ambiguous
        // simple-name mention.
        return MatchCategory::SimpleName;
    }

    if in_fqn {
        return MatchCategory::DirectFqn;
    }

    if start > 0 && line.as_bytes()[start - 1] == b'@' {
        return MatchCategory::Annotation;
    }
    if next_non_ws(line, end) == Some('(') {
        return MatchCategory::Constructor;
    }
    if line_word_precedes(line, start, "is") || line_word_precedes(line, start, "instanceof") {
        return MatchCategory::InstanceCheck;
    }
    if prev_non_ws(line, start) == Some(':') && !preceded_by_colons(line, start) {
        return MatchCategory::TypeAnnotation;
    }
    if generic_spans.iter().any(|&(s, e)| start > s && end < e) {
        return MatchCategory::Generic;
    }

    MatchCategory::SimpleName
}

fn prev_non_ws(line: &str, idx: usize) -> Option<char> {
    line[..idx].chars().rev().find(|c| !c.is_whitespace())
}

fn next_non_ws(line: &str, idx: usize) -> Option<char> {
    line[idx..].chars().find(|c| !c.is_whitespace())
}

/// The identifier immediately preceding `idx`, separated only by whitespace.
fn word_before(line: &str, idx: usize) -> Option<&str> {
    let trimmed = line[..idx].trim_end();
    let end = trimmed.len();
    if end == 0 {
        return None;
    }
    let start = trimmed
        .rfind(|c: char| !c.is_alphanumeric() && c != '_')
        .map(|i| i + 1)
        .unwrap_or(0);
    (start < end).then(|| &trimmed[start..end])
}

/// True when `word` is the identifier immediately before `idx`.
fn line_word_precedes(line: &str, idx: usize, word: &str) -> bool {
    word_before(line, idx) == Some(word)
}

fn contains_word(line: &str, word: &str) -> bool {
    line.split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|w| w == word)
}

/// True when the token at `idx` is preceded by `::` (whitespace allowed
/// after the colons, Kotlin-style `Foo:: name` is rare but legal).
fn preceded_by_colons(line: &str, idx: usize) -> bool {
    let before = line[..idx].trim_end();
    before.ends_with("::")
}

/// The receiver identifier of a dot access ending at `idx`, e.g. `foo` in
/// `foo.name` or `foo?.name`. `None` when the token is not dot-prefixed.
fn receiver_before_dot(line: &str, idx: usize) -> Option<&str> {
    let before = line[..idx].trim_end();
    let before = before.strip_suffix('.')?;
    let before = before.strip_suffix('?').unwrap_or(before);
    let trimmed = before.trim_end();
    let end = trimmed.len();
    let start = trimmed
        .rfind(|c: char| !c.is_alphanumeric() && c != '_')
        .map(|i| i + 1)
        .unwrap_or(0);
    (start < end).then(|| &trimmed[start..end])
}

/// True when the token at `idx..` is followed by a single `=` (a Kotlin
/// named argument or an assignment), not `==`.
fn named_arg_follows(line: &str, end: usize) -> bool {
    let rest = line[end..].trim_start();
    rest.starts_with('=') && !rest.starts_with("==")
}
