//! Structural queries over the tree-sitter-java grammar.
//!
//! Java's grammar names most structure explicitly (`object_creation_expression`,
//! `method_invocation` with `object`/`name` fields, `instanceof_expression`),
//! so classification here leans on fields more than the Kotlin pass does.

use super::{
    child_of_kind, for_each_node, has_ancestor, import_category, node_text,
    qualified_path_ending_at, type_base_name, word_before_node, Collection, RawHit,
};
use crate::scan::hit::MatchCategory;
use crate::scan::{ScanOptions, SearchMode};
use crate::target::{MemberKind, TargetSpec};
use std::collections::HashSet;
use tree_sitter::Node;

const SCOPED_KINDS: &[&str] = &["scoped_identifier", "scoped_type_identifier", "field_access"];

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
        collect_member_hits(root, source, options, target, kind, &typed_vars, &mut collection);
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
        "package_declaration" => {
            if collection.package.is_none() {
                let path = child_of_kind(node, "scoped_identifier")
                    .or_else(|| child_of_kind(node, "identifier"));
                if let Some(path) = path {
                    collection.package = Some(node_text(path, source).to_string());
                }
            }
        }
        "import_declaration" => {
            let path = child_of_kind(node, "scoped_identifier")
                .or_else(|| child_of_kind(node, "identifier"));
            if let Some(path) = path {
                let text = node_text(path, source);
                collection.imports.push(text.to_string());
                if options.mode == SearchMode::Class {
                    if let Some(category) = import_category(text, target) {
                        collection.hits.push(RawHit::at(path, None, category));
                    }
                }
            }
        }
        _ => {}
    });
}

fn collect_class_identity(
    root: Node,
    source: &str,
    target: &TargetSpec,
    options: &ScanOptions,
    collection: &mut Collection,
) {
    for_each_node(root, &mut |node| {
        let kind = node.kind();
        if kind != "identifier" && kind != "type_identifier" {
            return;
        }
        if node_text(node, source) != target.simple_name {
            return;
        }
        if has_ancestor(node, &["import_declaration", "package_declaration"]) {
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
        let qualified = qualified_path_ending_at(node, SCOPED_KINDS);
        if qualified.id() != node.id() && node_text(qualified, source) == target.fqn {
            return MatchCategory::DirectFqn;
        }
    }

    if has_ancestor(node, &["marker_annotation", "annotation"]) {
        return MatchCategory::Annotation;
    }

    if has_ancestor(node, &["type_arguments"]) {
        return MatchCategory::Generic;
    }

    // `new Foo(...)` — the type is adjacent to the creation expression;
    // identifiers in argument position have other parents.
    let parent_kind = node.parent().map(|p| p.kind());
    if parent_kind == Some("object_creation_expression")
        || (matches!(parent_kind, Some("scoped_type_identifier") | Some("generic_type"))
            && node
                .parent()
                .and_then(|p| p.parent())
                .is_some_and(|g| g.kind() == "object_creation_expression"))
    {
        return MatchCategory::Constructor;
    }

    if word_before_node(node, source) == Some("instanceof") {
        return MatchCategory::InstanceCheck;
    }

    if node.kind() == "type_identifier" {
        return MatchCategory::TypeAnnotation;
    }

    MatchCategory::SimpleName
}

/// Names declared with the target type, or initialized with `new Foo(...)`.
fn collect_typed_vars(root: Node, source: &str, target: &TargetSpec) -> HashSet<String> {
    let mut vars = HashSet::new();

    for_each_node(root, &mut |node| match node.kind() {
        "local_variable_declaration" | "field_declaration" => {
            let declared = node
                .child_by_field_name("type")
                .map(|ty| type_base_name(node_text(ty, source)) == target.simple_name)
                .unwrap_or(false);

            let mut cursor = node.walk();
            for declarator in node.children(&mut cursor).filter(|c| c.kind() == "variable_declarator") {
                let Some(name) = declarator.child_by_field_name("name") else {
                    continue;
                };
                let initialized = declarator
                    .child_by_field_name("value")
                    .filter(|v| v.kind() == "object_creation_expression")
                    .and_then(|v| v.child_by_field_name("type"))
                    .map(|ty| type_base_name(node_text(ty, source)) == target.simple_name)
                    .unwrap_or(false);
                if declared || initialized {
                    vars.insert(node_text(name, source).to_string());
                }
            }
        }
        "formal_parameter" => {
            let declared = node
                .child_by_field_name("type")
                .map(|ty| type_base_name(node_text(ty, source)) == target.simple_name)
                .unwrap_or(false);
            if declared {
                if let Some(name) = node.child_by_field_name("name") {
                    vars.insert(node_text(name, source).to_string());
                }
            }
        }
        _ => {}
    });

    vars
}

#[allow(clippy::too_many_arguments)]
fn collect_member_hits(
    root: Node,
    source: &str,
    options: &ScanOptions,
    target: &TargetSpec,
    kind: MemberKind,
    typed_vars: &HashSet<String>,
    collection: &mut Collection,
) {
    let members: HashSet<&str> = options.members.iter().map(String::as_str).collect();

    for_each_node(root, &mut |node| match node.kind() {
        "method_invocation" if kind == MemberKind::Method => {
            let Some(name) = node.child_by_field_name("name") else {
                return;
            };
            if !members.contains(node_text(name, source)) {
                return;
            }
            let receiver_ok = node
                .child_by_field_name("object")
                .map(|obj| receiver_is_target(obj, source, target, typed_vars))
                .unwrap_or(false);
            if receiver_ok {
                collection
                    .hits
                    .push(RawHit::at(name, Some(node_text(name, source)), MatchCategory::Call));
            }
        }
        "method_reference" => {
            // `receiver::name`; the member identifier is the last child.
            let mut cursor = node.walk();
            let last = node.children(&mut cursor).last();
            let Some(name) = last.filter(|n| n.kind() == "identifier") else {
                return;
            };
            if members.contains(node_text(name, source)) {
                collection.hits.push(RawHit::at(
                    name,
                    Some(node_text(name, source)),
                    MatchCategory::Reference,
                ));
            }
        }
        "field_access" if kind == MemberKind::Field => {
            let Some(field) = node.child_by_field_name("field") else {
                return;
            };
            if !members.contains(node_text(field, source)) {
                return;
            }
            let receiver_ok = node
                .child_by_field_name("object")
                .map(|obj| receiver_is_target(obj, source, target, typed_vars))
                .unwrap_or(false);
            if receiver_ok {
                collection.hits.push(RawHit::at(
                    field,
                    Some(node_text(field, source)),
                    MatchCategory::DotAccess,
                ));
            }
        }
        "method_declaration" if kind == MemberKind::Method => {
            let Some(name) = node.child_by_field_name("name") else {
                return;
            };
            if !members.contains(node_text(name, source)) {
                return;
            }
            let overrides = child_of_kind(node, "modifiers")
                .map(|m| node_text(m, source).contains("@Override"))
                .unwrap_or(false);
            if overrides {
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

fn receiver_is_target(
    receiver: Node,
    source: &str,
    target: &TargetSpec,
    typed_vars: &HashSet<String>,
) -> bool {
    if receiver.kind() != "identifier" {
        return false;
    }
    let text = node_text(receiver, source);
    text == target.simple_name || typed_vars.contains(text)
}
