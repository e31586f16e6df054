//! Swift walker.
//!
//! tree-sitter-swift uses `class_declaration` for class, struct, actor,
//! extension, and enum alike; the keyword child disambiguates. Protocols,
//! properties, subscripts, initializers, and type aliases all need bespoke
//! walks. Imports and calls fall through to the generic policy dispatch.

use symgraph_core::{NodeKind, ReferenceKind, Visibility};
use tree_sitter::Node as TsNode;

use crate::cst;
use crate::walker::{NodeAttrs, Walker};

/// Route a node through the Swift walker. Returns `false` when the node is
/// not one the dialect owns, letting generic dispatch handle it.
pub(crate) fn dispatch(walker: &mut Walker, node: TsNode) -> bool {
    match node.kind() {
        "class_declaration" => handle_class_like(walker, node),
        "protocol_declaration" => handle_protocol(walker, node),
        "function_declaration" | "protocol_function_declaration" => handle_function(walker, node),
        "property_declaration" | "protocol_property_declaration" => handle_property(walker, node),
        "subscript_declaration" => handle_subscript(walker, node),
        "typealias_declaration" | "associatedtype_declaration" => handle_typealias(walker, node),
        "init_declaration" => handle_initializer(walker, node, "init"),
        "deinit_declaration" => handle_initializer(walker, node, "deinit"),
        "enum_entry" => handle_enum_entry(walker, node),
        _ => return false,
    }
    true
}

// ── Type declarations ───────────────────────────────────────────────────────

fn handle_class_like(walker: &mut Walker, node: TsNode) {
    let keyword = declaration_keyword(node);
    let kind = match keyword {
        "struct" => NodeKind::Struct,
        "enum" => NodeKind::Enum,
        // class, actor, extension all land on `class`
        _ => NodeKind::Class,
    };

    let Some(mut name) = type_name(walker, node) else {
        walker.visit_children(node);
        return;
    };
    // Extensions carry the extended type's name; a where clause becomes part
    // of it so `extension Array where Element: Equatable` stays distinct.
    if keyword == "extension" {
        if let Some(constraints) = cst::find_child(node, "type_constraints") {
            name = format!("{name} {}", cst::text(constraints, walker.source));
        }
    }

    let attrs = NodeAttrs {
        visibility: Some(visibility(node, walker.source)),
        signature: brace_signature(node, walker.source),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, kind, &name, attrs);
    emit_inheritance(walker, node, &id, keyword == "class");

    walker.push_scope(Some(id), name);
    visit_body(walker, node);
    walker.pop_scope();
}

fn handle_protocol(walker: &mut Walker, node: TsNode) {
    let Some(name) = type_name(walker, node) else {
        walker.visit_children(node);
        return;
    };
    let attrs = NodeAttrs {
        visibility: Some(visibility(node, walker.source)),
        signature: brace_signature(node, walker.source),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, NodeKind::Interface, &name, attrs);
    emit_inheritance(walker, node, &id, false);

    walker.push_scope(Some(id), name);
    visit_body(walker, node);
    walker.pop_scope();
}

// ── Members ─────────────────────────────────────────────────────────────────

fn handle_function(walker: &mut Walker, node: TsNode) {
    let Some(name) = simple_name(walker, node) else {
        walker.visit_children(node);
        return;
    };
    let kind = if walker.in_scope() {
        NodeKind::Method
    } else {
        NodeKind::Function
    };
    // `async` sits as a direct child token, not only inside modifiers.
    let is_async = cst::has_token(node, "async") || has_modifier(node, walker.source, "async");
    let attrs = NodeAttrs {
        visibility: Some(visibility(node, walker.source)),
        is_async: Some(is_async),
        is_static: Some(is_static(node, walker.source)),
        signature: brace_signature(node, walker.source),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, kind, &name, attrs);
    walker.push_scope(Some(id), name);
    walker.visit_children(node);
    walker.pop_scope();
}

fn handle_property(walker: &mut Walker, node: TsNode) {
    let Some(name) = pattern_name(walker, node) else {
        walker.visit_children(node);
        return;
    };
    // Only a top-level `let` is a constant; everything else is a property.
    let kind = if !walker.in_scope() && cst::has_token_deep(node, "let") {
        NodeKind::Constant
    } else {
        NodeKind::Property
    };
    let decorators = attribute_decorators(node, walker.source);
    let attrs = NodeAttrs {
        visibility: Some(visibility(node, walker.source)),
        is_static: Some(is_static(node, walker.source)),
        docstring: walker.docstring(node),
        decorators: if decorators.is_empty() {
            None
        } else {
            Some(decorators)
        },
        ..NodeAttrs::default()
    };
    walker.emit(node, kind, &name, attrs);
    // Initializers and accessor blocks may contain calls.
    walker.visit_children(node);
}

fn handle_subscript(walker: &mut Walker, node: TsNode) {
    let params: Vec<String> = cst::named_children(node)
        .into_iter()
        .filter(|c| c.kind() == "parameter")
        .map(|c| cst::text(c, walker.source))
        .collect();
    let return_type = cst::named_children(node)
        .into_iter()
        .filter(|c| c.kind() == "user_type")
        .last()
        .map(|c| cst::text(c, walker.source));
    let signature = match return_type {
        Some(ret) => format!("({}) -> {ret}", params.join(", ")),
        None => format!("({})", params.join(", ")),
    };

    let attrs = NodeAttrs {
        visibility: Some(visibility(node, walker.source)),
        is_static: Some(is_static(node, walker.source)),
        signature: Some(signature),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, NodeKind::Method, "subscript", attrs);
    walker.push_scope(Some(id), "subscript".to_string());
    walker.visit_children(node);
    walker.pop_scope();
}

fn handle_typealias(walker: &mut Walker, node: TsNode) {
    let name = node
        .child_by_field_name("name")
        .or_else(|| cst::find_child(node, "type_identifier"))
        .map(|n| cst::text(n, walker.source))
        .filter(|t| !t.is_empty());
    let Some(name) = name else { return };
    let attrs = NodeAttrs {
        visibility: Some(visibility(node, walker.source)),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    walker.emit(node, NodeKind::TypeAlias, &name, attrs);
}

fn handle_initializer(walker: &mut Walker, node: TsNode, name: &str) {
    let attrs = NodeAttrs {
        visibility: Some(visibility(node, walker.source)),
        is_async: Some(cst::has_token(node, "async")),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, NodeKind::Method, name, attrs);
    walker.push_scope(Some(id), name.to_string());
    walker.visit_children(node);
    walker.pop_scope();
}

fn handle_enum_entry(walker: &mut Walker, node: TsNode) {
    if node.parent().map(|p| p.kind()) != Some("enum_class_body") {
        walker.visit_children(node);
        return;
    }
    let name = cst::named_children(node)
        .into_iter()
        .find(|c| c.kind() == "simple_identifier")
        .map(|c| cst::text(c, walker.source));
    let Some(name) = name else { return };
    walker.emit(node, NodeKind::EnumMember, &name, NodeAttrs::default());
}

// ── Inheritance ─────────────────────────────────────────────────────────────

/// `inheritance_specifier` children: the first names a superclass for
/// classes (`extends`) and a protocol otherwise; the rest are conformances.
fn emit_inheritance(walker: &mut Walker, node: TsNode, from_id: &str, is_class: bool) {
    let mut first = true;
    for spec in inheritance_specifiers(node) {
        let name = cst::find_child(spec, "user_type")
            .map(|t| cst::text(t, walker.source))
            .unwrap_or_else(|| cst::text(spec, walker.source));
        if name.is_empty() {
            continue;
        }
        let kind = if first && is_class {
            ReferenceKind::Extends
        } else {
            ReferenceKind::Implements
        };
        walker.emit_reference_from(from_id, kind, name, spec);
        first = false;
    }
}

fn inheritance_specifiers(node: TsNode) -> Vec<TsNode> {
    let mut specs: Vec<TsNode> = cst::children(node)
        .into_iter()
        .filter(|c| c.kind() == "inheritance_specifier")
        .collect();
    if specs.is_empty() {
        for child in cst::children(node) {
            specs.extend(
                cst::children(child)
                    .into_iter()
                    .filter(|c| c.kind() == "inheritance_specifier"),
            );
        }
    }
    specs
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Keyword child disambiguating an overloaded `class_declaration`.
fn declaration_keyword(node: TsNode) -> &'static str {
    for child in cst::children(node) {
        match child.kind() {
            "struct" => return "struct",
            "enum" => return "enum",
            "actor" => return "actor",
            "extension" => return "extension",
            "class" => return "class",
            _ => {}
        }
    }
    "class"
}

fn type_name(walker: &Walker, node: TsNode) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        let text = cst::text(name, walker.source);
        if !text.is_empty() {
            return Some(text);
        }
    }
    cst::named_children(node)
        .into_iter()
        .find(|c| matches!(c.kind(), "type_identifier" | "user_type" | "simple_identifier"))
        .map(|c| cst::text(c, walker.source))
        .filter(|t| !t.is_empty())
}

fn simple_name(walker: &Walker, node: TsNode) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        let text = cst::text(name, walker.source);
        if !text.is_empty() {
            return Some(text);
        }
    }
    cst::named_children(node)
        .into_iter()
        .find(|c| c.kind() == "simple_identifier")
        .map(|c| cst::text(c, walker.source))
        .filter(|t| !t.is_empty())
}

/// Property names live under `pattern` → `simple_identifier`.
fn pattern_name(walker: &Walker, node: TsNode) -> Option<String> {
    if let Some(pattern) = cst::find_child(node, "pattern") {
        if let Some(id) = cst::named_children(pattern)
            .into_iter()
            .find(|c| c.kind() == "simple_identifier")
        {
            let text = cst::text(id, walker.source);
            if !text.is_empty() {
                return Some(text);
            }
        }
        let text = cst::text(pattern, walker.source);
        if !text.is_empty() {
            return Some(text);
        }
    }
    cst::named_children(node)
        .into_iter()
        .find(|c| c.kind() == "simple_identifier")
        .map(|c| cst::text(c, walker.source))
        .filter(|t| !t.is_empty())
}

fn modifier_words(node: TsNode, source: &[u8]) -> Vec<String> {
    cst::modifier_tokens(node, source)
}

fn has_modifier(node: TsNode, source: &[u8], word: &str) -> bool {
    modifier_words(node, source).iter().any(|w| w == word)
}

/// Swift access levels. `fileprivate` maps to private; absence means
/// internal.
fn visibility(node: TsNode, source: &[u8]) -> Visibility {
    let words = modifier_words(node, source);
    if words.iter().any(|w| w == "public" || w == "open") {
        Visibility::Public
    } else if words.iter().any(|w| w == "private" || w == "fileprivate") {
        Visibility::Private
    } else {
        Visibility::Internal
    }
}

/// `static` or `class` member modifier.
fn is_static(node: TsNode, source: &[u8]) -> bool {
    let words = modifier_words(node, source);
    words.iter().any(|w| w == "static" || w == "class")
}

/// Property wrappers and other attributes (`@State`, `@Published`).
fn attribute_decorators(node: TsNode, source: &[u8]) -> Vec<String> {
    let mut decorators = Vec::new();
    for child in cst::children(node) {
        if child.kind() == "attribute" {
            decorators.push(cst::text(child, source));
        } else if child.kind() == "modifiers" {
            for inner in cst::children(child) {
                if inner.kind() == "attribute" {
                    decorators.push(cst::text(inner, source));
                }
            }
        }
    }
    decorators
}

/// Declaration text up to the opening brace.
fn brace_signature(node: TsNode, source: &[u8]) -> Option<String> {
    let text = cst::text(node, source);
    let head = match text.find('{') {
        Some(pos) => text[..pos].trim(),
        None => text.lines().next().unwrap_or("").trim(),
    };
    if head.is_empty() {
        None
    } else {
        Some(head.to_string())
    }
}

fn visit_body(walker: &mut Walker, node: TsNode) {
    if let Some(body) = cst::children(node)
        .into_iter()
        .find(|c| c.kind().ends_with("_body"))
    {
        walker.visit_children(body);
    } else if let Some(body) = node.child_by_field_name("body") {
        walker.visit_children(body);
    }
}
