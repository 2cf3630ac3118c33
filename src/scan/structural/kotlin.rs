//! Structural queries over the tree-sitter-kotlin grammar.
//!
//! Node kinds here follow the grammar's actual shapes: `import_header`
//! carries an `identifier`, class bodies hang off `class_declaration`,
//! navigation is `navigation_expression` + `navigation_suffix`, and type
//! positions appear as `user_type`/`type_identifier`.

use super::{
    child_of_kind, for_each_node, has_ancestor, import_category, node_text,
    qualified_path_ending_at, type_base_name, word_before_node, Collection, RawHit,
};
use crate::scan::hit::MatchCategory;
use crate::scan::{ScanOptions, SearchMode};
use crate::target::{MemberKind, TargetSpec};
use std::collections::HashSet;
use tree_sitter::Node;

const NAVIGATION_KINDS: &[&str] = &["navigation_expression", "navigation_suffix"];

pub(super) fn collect(
    root: Node,
    source: &str,
    target: &TargetSpec,
    options: &ScanOptions,
) -> Collection {
    let mut collection = Collection::default();

    collect_headers(root, source, target, options, &mut collection);
    let typed_vars = collect_typed_vars(root, source, target);
    collect_class_identity(root, source, target, options, &mut collection);

    if let Some(kind) = options.mode.member_kind() {
        collect_member_hits(root, source, target, options, kind, &typed_vars, &mut collection);
    }

    collection
}

fn collect_headers(
    root: Node,
    source: &str,
    target: &TargetSpec,
    options: &ScanOptions,
    collection: &mut Collection,
) {
    for_each_node(root, &mut |node| match node.kind() {
        "package_header" => {
            if collection.package.is_none() {
                if let Some(id) = child_of_kind(node, "identifier") {
                    collection.package = Some(node_text(id, source).to_string());
                }
            }
        }
        "import_header" => {
            // The identifier child is the import path; an `as` alias lives
            // in a separate sibling and does not change the path.
            if let Some(id) = child_of_kind(node, "identifier") {
                let path = node_text(id, source);
                collection.imports.push(path.to_string());
                if options.mode == SearchMode::Class {
                    if let Some(category) = import_category(path, target) {
                        collection.hits.push(RawHit::at(id, None, category));
                    }
                }
            }
        }
        _ => {}
    });
}

/// One pass over every identifier spelling the target's simple name.
/// Always computes the evidence flags; emits hits only in class mode.
fn collect_class_identity(
    root: Node,
    source: &str,
    target: &TargetSpec,
    options: &ScanOptions,
    collection: &mut Collection,
) {
    for_each_node(root, &mut |node| {
        let kind = node.kind();
        if kind != "simple_identifier" && kind != "type_identifier" {
            return;
        }
        if node_text(node, source) != target.simple_name {
            return;
        }
        if has_ancestor(node, &["import_header", "package_header"]) {
            return;
        }

        collection.name_seen = true;
        let category = classify_class_ident(node, source, target);
        if category == MatchCategory::DirectFqn {
            collection.fqn_referenced = true;
        }
        if options.mode == SearchMode::Class {
            collection.hits.push(RawHit::at(node, None, category));
        }
    });
}

fn classify_class_ident(node: Node, source: &str, target: &TargetSpec) -> MatchCategory {
    if !target.package.is_empty() {
        let qualified = qualified_path_ending_at(node, NAVIGATION_KINDS);
        if qualified.id() != node.id() {
            let text: String = node_text(qualified, source)
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if text == target.fqn {
                return MatchCategory::DirectFqn;
            }
        }
    }

    if has_ancestor(node, &["annotation"]) {
        return MatchCategory::Annotation;
    }

    // `Foo(...)`: the callee identifier is a direct child of the call;
    // `class Sub : Foo(0)` runs through a constructor_invocation.
    if node
        .parent()
        .is_some_and(|p| p.kind() == "call_expression")
        || has_ancestor(node, &["constructor_invocation"])
    {
        return MatchCategory::Constructor;
    }

    if has_ancestor(node, &["type_arguments"]) {
        return MatchCategory::Generic;
    }

    if word_before_node(node, source) == Some("is") {
        return MatchCategory::InstanceCheck;
    }

    if kind_is_type_position(node) {
        return MatchCategory::TypeAnnotation;
    }

    MatchCategory::SimpleName
}

fn kind_is_type_position(node: Node) -> bool {
    node.kind() == "type_identifier"
        || node
            .parent()
            .is_some_and(|p| matches!(p.kind(), "user_type" | "type_reference"))
}

/// Local names known to hold the target type: annotated declarations
/// (`val x: Foo`, parameters) and direct constructor initializers
/// (`val x = Foo(...)`).
fn collect_typed_vars(root: Node, source: &str, target: &TargetSpec) -> HashSet<String> {
    let mut vars = HashSet::new();

    for_each_node(root, &mut |node| match node.kind() {
        "property_declaration" => {
            // Covers `val x: Foo` (annotated, the type node's placement
            // varies between grammar versions) and `val x = Foo(...)`
            // (constructor initializer).
            let Some(decl) = child_of_kind(node, "variable_declaration") else {
                return;
            };
            let Some(name) = child_of_kind(decl, "simple_identifier") else {
                return;
            };

            let annotated = first_descendant_of_kind(node, "user_type")
                .map(|ty| type_base_name(node_text(ty, source)) == target.simple_name)
                .unwrap_or(false);
            let constructed = child_of_kind(node, "call_expression")
                .and_then(|call| call.child(0))
                .map(|callee| {
                    callee.kind() == "simple_identifier"
                        && node_text(callee, source) == target.simple_name
                })
                .unwrap_or(false);

            if annotated || constructed {
                vars.insert(node_text(name, source).to_string());
            }
        }
        "parameter" | "class_parameter" => {
            let Some(name) = child_of_kind(node, "simple_identifier") else {
                return;
            };
            if let Some(ty) = first_descendant_of_kind(node, "user_type") {
                if type_base_name(node_text(ty, source)) == target.simple_name {
                    vars.insert(node_text(name, source).to_string());
                }
            }
        }
        _ => {}
    });

    vars
}

fn first_descendant_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut found = None;
    for_each_node(node, &mut |n| {
        if found.is_none() && n.kind() == kind && n.id() != node.id() {
            found = Some(n);
        }
    });
    found
}

#[allow(clippy::too_many_arguments)]
fn collect_member_hits(
    root: Node,
    source: &str,
    target: &TargetSpec,
    options: &ScanOptions,
    kind: MemberKind,
    typed_vars: &HashSet<String>,
    collection: &mut Collection,
) {
    let members: HashSet<&str> = options.members.iter().map(String::as_str).collect();

    for_each_node(root, &mut |node| match node.kind() {
        "call_expression" if kind == MemberKind::Method => {
            // `receiver.name(...)` — only calls whose receiver can be tied
            // to the target type are reported.
            let Some(callee) = node.child(0) else { return };
            if callee.kind() != "navigation_expression" {
                return;
            }
            let Some((receiver, name)) = split_navigation(callee) else {
                return;
            };
            if members.contains(node_text(name, source))
                && receiver_is_target(receiver, source, target, typed_vars)
            {
                collection
                    .hits
                    .push(RawHit::at(name, Some(node_text(name, source)), MatchCategory::Call));
            }
        }
        "navigation_expression" if kind == MemberKind::Field => {
            // Skip the callee position of a call; that is a method usage.
            if node
                .parent()
                .is_some_and(|p| p.kind() == "call_expression")
            {
                return;
            }
            let Some((receiver, name)) = split_navigation(node) else {
                return;
            };
            if members.contains(node_text(name, source))
                && receiver_is_target(receiver, source, target, typed_vars)
            {
                collection.hits.push(RawHit::at(
                    name,
                    Some(node_text(name, source)),
                    MatchCategory::DotAccess,
                ));
            }
        }
        "callable_reference" => {
            // `foo::name` / `Foo::name`; the member identifier follows the
            // double colon.
            let Some(colons) = child_of_kind(node, "::") else { return };
            let mut cursor = node.walk();
            let referenced = node
                .children(&mut cursor)
                .filter(|c| c.kind() == "simple_identifier")
                .find(|c| c.start_byte() > colons.start_byte());
            if let Some(name) = referenced {
                if members.contains(node_text(name, source)) {
                    collection.hits.push(RawHit::at(
                        name,
                        Some(node_text(name, source)),
                        MatchCategory::Reference,
                    ));
                }
            }
        }
        "value_argument" if kind == MemberKind::Field => {
            // `name = value` named argument.
            let (Some(first), Some(second)) = (node.child(0), node.child(1)) else {
                return;
            };
            if first.kind() == "simple_identifier"
                && second.kind() == "="
                && members.contains(node_text(first, source))
            {
                collection.hits.push(RawHit::at(
                    first,
                    Some(node_text(first, source)),
                    MatchCategory::NamedArg,
                ));
            }
        }
        "function_declaration" if kind == MemberKind::Method => {
            let Some(name) = child_of_kind(node, "simple_identifier") else {
                return;
            };
            if !members.contains(node_text(name, source)) {
                return;
            }
            let is_override = child_of_kind(node, "modifiers")
                .map(|m| node_text(m, source).split_whitespace().any(|w| w == "override"))
                .unwrap_or(false);
            if is_override {
                collection.hits.push(RawHit::at(
                    name,
                    Some(node_text(name, source)),
                    MatchCategory::Override,
                ));
            }
        }
        _ => {}
    });
}

/// Decompose `receiver.name` / `receiver?.name` into its two ends.
fn split_navigation(nav: Node) -> Option<(Node, Node)> {
    let receiver = nav.child(0)?;
    let suffix = child_of_kind(nav, "navigation_suffix")?;
    let name = child_of_kind(suffix, "simple_identifier")?;
    Some((receiver, name))
}

/// Conservative receiver typing: a plain identifier that is either a
/// tracked variable of the target type or the class name itself
/// (companion/static style). Anything else is unclassifiable and the
/// access is not reported.
fn receiver_is_target(
    receiver: Node,
    source: &str,
    target: &TargetSpec,
    typed_vars: &HashSet<String>,
) -> bool {
    if receiver.kind() != "simple_identifier" {
        return false;
    }
    let text = node_text(receiver, source);
    text == target.simple_name || typed_vars.contains(text)
}
