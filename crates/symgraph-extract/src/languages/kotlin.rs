//! Kotlin walker.
//!
//! `class_declaration` covers classes, interfaces, and enums, distinguished
//! by keyword children outside the modifier bag. Objects, companion objects,
//! properties, type aliases, enum entries, and delegation specifiers all get
//! bespoke handling. Imports and calls fall through to the generic dispatch.

use symgraph_core::{NodeKind, ReferenceKind, Visibility};
use tree_sitter::Node as TsNode;

use crate::cst;
use crate::walker::{NodeAttrs, Walker};

/// Route a node through the Kotlin walker. Returns `false` when generic
/// dispatch should handle it instead.
pub(crate) fn dispatch(walker: &mut Walker, node: TsNode) -> bool {
    match node.kind() {
        "class_declaration" => handle_class(walker, node),
        "object_declaration" => handle_object(walker, node),
        "companion_object" => handle_companion(walker, node),
        "function_declaration" => handle_function(walker, node),
        "property_declaration" => handle_property(walker, node),
        "type_alias" | "type_alias_declaration" => handle_typealias(walker, node),
        "enum_entry" => handle_enum_entry(walker, node),
        _ => return false,
    }
    true
}

// ── Declarations ────────────────────────────────────────────────────────────

fn handle_class(walker: &mut Walker, node: TsNode) {
    // `interface` / `enum` keyword children sit outside `modifiers`.
    let kind = if cst::has_token(node, "interface") {
        NodeKind::Interface
    } else if cst::has_token(node, "enum") {
        NodeKind::Enum
    } else {
        NodeKind::Class
    };

    let Some(name) = declared_name(walker, node) else {
        walker.visit_children(node);
        return;
    };

    let words = modifier_words(node, walker.source);
    let attrs = NodeAttrs {
        visibility: Some(visibility(&words)),
        is_abstract: Some(words.iter().any(|w| w == "abstract")),
        signature: brace_signature(node, walker.source),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, kind, &name, attrs);
    emit_delegation(walker, node, &id);

    walker.push_scope(Some(id), name);
    visit_body(walker, node);
    walker.pop_scope();
}

fn handle_object(walker: &mut Walker, node: TsNode) {
    let Some(name) = declared_name(walker, node) else {
        walker.visit_children(node);
        return;
    };

    let words = modifier_words(node, walker.source);
    let attrs = NodeAttrs {
        visibility: Some(visibility(&words)),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, NodeKind::Class, &name, attrs);
    emit_delegation(walker, node, &id);

    walker.push_scope(Some(id), name);
    visit_body(walker, node);
    walker.pop_scope();
}

/// Companion objects become a static class named `Companion` unless they
/// carry their own identifier.
fn handle_companion(walker: &mut Walker, node: TsNode) {
    let name = declared_name(walker, node).unwrap_or_else(|| "Companion".to_string());
    let words = modifier_words(node, walker.source);
    let attrs = NodeAttrs {
        visibility: Some(visibility(&words)),
        is_static: Some(true),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, NodeKind::Class, &name, attrs);

    walker.push_scope(Some(id), name);
    visit_body(walker, node);
    walker.pop_scope();
}

fn handle_function(walker: &mut Walker, node: TsNode) {
    let Some(name) = declared_name(walker, node) else {
        walker.visit_children(node);
        return;
    };
    let kind = if walker.in_scope() {
        NodeKind::Method
    } else {
        NodeKind::Function
    };

    let words = modifier_words(node, walker.source);
    let attrs = NodeAttrs {
        visibility: Some(visibility(&words)),
        is_async: Some(words.iter().any(|w| w == "suspend")),
        is_abstract: Some(words.iter().any(|w| w == "abstract")),
        signature: function_signature(node, walker.source),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    let id = walker.emit(node, kind, &name, attrs);
    walker.push_scope(Some(id), name);
    walker.visit_children(node);
    walker.pop_scope();
}

fn handle_property(walker: &mut Walker, node: TsNode) {
    let Some(name) = property_name(walker, node) else {
        walker.visit_children(node);
        return;
    };

    let words = modifier_words(node, walker.source);
    // `const val` is a compile-time constant; everything else is a property.
    let kind = if words.iter().any(|w| w == "const") {
        NodeKind::Constant
    } else {
        NodeKind::Property
    };
    let attrs = NodeAttrs {
        visibility: Some(visibility(&words)),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    walker.emit(node, kind, &name, attrs);
    // Initializers may contain calls.
    walker.visit_children(node);
}

fn handle_typealias(walker: &mut Walker, node: TsNode) {
    let name = node
        .child_by_field_name("name")
        .or_else(|| cst::find_child(node, "type_identifier"))
        .or_else(|| cst::find_child(node, "identifier"))
        .map(|n| cst::text(n, walker.source))
        .filter(|t| !t.is_empty());
    let Some(name) = name else { return };

    let words = modifier_words(node, walker.source);
    let attrs = NodeAttrs {
        visibility: Some(visibility(&words)),
        docstring: walker.docstring(node),
        ..NodeAttrs::default()
    };
    walker.emit(node, NodeKind::TypeAlias, &name, attrs);
}

fn handle_enum_entry(walker: &mut Walker, node: TsNode) {
    if node.parent().map(|p| p.kind()) != Some("enum_class_body") {
        walker.visit_children(node);
        return;
    }
    let name = cst::named_children(node)
        .into_iter()
        .find(|c| matches!(c.kind(), "simple_identifier" | "identifier"))
        .map(|c| cst::text(c, walker.source));
    let Some(name) = name else { return };
    walker.emit(node, NodeKind::EnumMember, &name, NodeAttrs::default());
}

// ── Inheritance ─────────────────────────────────────────────────────────────

/// Delegation specifiers: the first constructor invocation is the
/// superclass (`extends`); further invocations and plain user types are
/// conformances (`implements`).
fn emit_delegation(walker: &mut Walker, node: TsNode, from_id: &str) {
    let mut seen_constructor = false;
    for spec in delegation_specifiers(node) {
        let constructor = find_descendant(spec, "constructor_invocation", 2);
        let name_node = constructor
            .and_then(|c| cst::find_child(c, "user_type"))
            .or_else(|| cst::find_child(spec, "user_type"));
        let name = name_node
            .map(|n| cst::text(n, walker.source))
            .unwrap_or_else(|| {
                let text = cst::text(spec, walker.source);
                text.split('(').next().unwrap_or(&text).trim().to_string()
            });
        if name.is_empty() {
            continue;
        }
        let kind = if constructor.is_some() && !seen_constructor {
            seen_constructor = true;
            ReferenceKind::Extends
        } else {
            ReferenceKind::Implements
        };
        walker.emit_reference_from(from_id, kind, name, spec);
    }
}

fn delegation_specifiers(node: TsNode) -> Vec<TsNode> {
    let mut specs: Vec<TsNode> = cst::children(node)
        .into_iter()
        .filter(|c| c.kind() == "delegation_specifier")
        .collect();
    if specs.is_empty() {
        for child in cst::children(node) {
            specs.extend(
                cst::children(child)
                    .into_iter()
                    .filter(|c| c.kind() == "delegation_specifier"),
            );
        }
    }
    specs
}

fn find_descendant<'t>(node: TsNode<'t>, kind: &str, depth: usize) -> Option<TsNode<'t>> {
    for child in cst::children(node) {
        if child.kind() == kind {
            return Some(child);
        }
        if depth > 1 {
            if let Some(found) = find_descendant(child, kind, depth - 1) {
                return Some(found);
            }
        }
    }
    None
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Name of a class, object, or function: `name` field first, identifier
/// children as fallback (the -ng grammar uses `identifier`, older ones
/// `simple_identifier` / `type_identifier`).
fn declared_name(walker: &Walker, node: TsNode) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        let text = cst::text(name, walker.source);
        if !text.is_empty() {
            return Some(text);
        }
    }
    cst::named_children(node)
        .into_iter()
        .find(|c| matches!(c.kind(), "type_identifier" | "simple_identifier" | "identifier"))
        .map(|c| cst::text(c, walker.source))
        .filter(|t| !t.is_empty())
}

/// Property names live in the inner `variable_declaration`.
fn property_name(walker: &Walker, node: TsNode) -> Option<String> {
    if let Some(var) = find_descendant(node, "variable_declaration", 2) {
        if let Some(id) = cst::named_children(var)
            .into_iter()
            .find(|c| matches!(c.kind(), "simple_identifier" | "identifier"))
        {
            let text = cst::text(id, walker.source);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    declared_name(walker, node)
}

fn modifier_words(node: TsNode, source: &[u8]) -> Vec<String> {
    cst::modifier_tokens(node, source)
}

/// Kotlin defaults to public when no visibility modifier is present.
fn visibility(words: &[String]) -> Visibility {
    if words.iter().any(|w| w == "private") {
        Visibility::Private
    } else if words.iter().any(|w| w == "protected") {
        Visibility::Protected
    } else if words.iter().any(|w| w == "internal") {
        Visibility::Internal
    } else {
        Visibility::Public
    }
}

/// Parameters plus an optional return type, joined Kotlin-style.
fn function_signature(node: TsNode, source: &[u8]) -> Option<String> {
    let params = node
        .child_by_field_name("parameters")
        .or_else(|| cst::find_child(node, "function_value_parameters"))
        .map(|n| cst::text(n, source))?;
    let ret = node
        .child_by_field_name("return_type")
        .or_else(|| {
            cst::named_children(node)
                .into_iter()
                .find(|c| matches!(c.kind(), "user_type" | "nullable_type"))
        })
        .map(|n| cst::text(n, source));
    Some(match ret {
        Some(ret) if !ret.is_empty() => format!("{params}: {ret}"),
        _ => params,
    })
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
    if let Some(body) = cst::find_child(node, "class_body")
        .or_else(|| cst::find_child(node, "enum_class_body"))
        .or_else(|| node.child_by_field_name("body"))
    {
        walker.visit_children(body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar_for;
    use crate::policy::policy_for;
    use symgraph_core::{EdgeKind, Language};
    use tree_sitter::Parser;

    fn walk(source: &str) -> (
        Vec<symgraph_core::Node>,
        Vec<symgraph_core::Edge>,
        Vec<symgraph_core::UnresolvedReference>,
    ) {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar_for(Language::Kotlin).unwrap())
            .expect("failed to set Kotlin language");
        let tree = parser.parse(source.as_bytes(), None).expect("failed to parse");
        let mut walker = Walker::new(
            Language::Kotlin,
            policy_for(Language::Kotlin).unwrap(),
            "Example.kt",
            source.as_bytes(),
            0,
            true,
        );
        walker.walk(tree.root_node());
        walker.into_parts()
    }

    #[test]
    fn class_interface_enum_share_a_node_type() {
        let source = r#"
class Calculator {
    fun add(a: Int, b: Int): Int {
        return a + b
    }
}

interface Shape {
    fun area(): Double
}

enum class Direction {
    NORTH,
    SOUTH
}
"#;
        let (nodes, edges, _refs) = walk(source);

        let class = nodes.iter().find(|n| n.name == "Calculator").unwrap();
        assert_eq!(class.kind, NodeKind::Class);
        assert_eq!(class.visibility, Some(Visibility::Public));

        let add = nodes.iter().find(|n| n.name == "add").unwrap();
        assert_eq!(add.kind, NodeKind::Method);
        assert_eq!(add.qualified_name, "Example.kt::Calculator::add");
        assert!(edges.iter().any(|e| {
            e.kind == EdgeKind::Contains && e.source_id == class.id && e.target_id == add.id
        }));

        let shape = nodes.iter().find(|n| n.name == "Shape").unwrap();
        assert_eq!(shape.kind, NodeKind::Interface);

        let direction = nodes.iter().find(|n| n.name == "Direction").unwrap();
        assert_eq!(direction.kind, NodeKind::Enum);
        let north = nodes.iter().find(|n| n.name == "NORTH").unwrap();
        assert_eq!(north.kind, NodeKind::EnumMember);
        assert!(edges.iter().any(|e| {
            e.kind == EdgeKind::Contains && e.source_id == direction.id && e.target_id == north.id
        }));
    }

    #[test]
    fn suspend_function_is_async_with_calls() {
        let source = r#"suspend fun loadData(): List<String> { delay(1000); return listOf("a", "b", "c") }"#;
        let (nodes, _edges, refs) = walk(source);

        let load = nodes.iter().find(|n| n.name == "loadData").unwrap();
        assert_eq!(load.kind, NodeKind::Function);
        assert_eq!(load.is_async, Some(true));

        let calls: Vec<_> = refs
            .iter()
            .filter(|r| r.kind == ReferenceKind::Calls)
            .collect();
        assert!(calls.iter().any(|r| r.name == "delay"), "calls: {calls:?}");
        assert!(calls.iter().any(|r| r.name == "listOf"), "calls: {calls:?}");
        assert!(calls.iter().all(|r| r.from_node_id == load.id));
    }

    #[test]
    fn sealed_class_subclasses_extend_their_parent() {
        let source = r#"
sealed class Result {
    data class Success(val value: String) : Result()
    data class Error(val message: String) : Result()
    object Loading : Result()
}
"#;
        let (nodes, _edges, refs) = walk(source);

        let classes: Vec<_> = nodes.iter().filter(|n| n.kind == NodeKind::Class).collect();
        for name in ["Result", "Success", "Error", "Loading"] {
            assert!(classes.iter().any(|n| n.name == name), "missing {name}");
        }

        let extends: Vec<_> = refs
            .iter()
            .filter(|r| r.kind == ReferenceKind::Extends && r.name == "Result")
            .collect();
        assert_eq!(extends.len(), 3, "extends: {extends:?}");
    }

    #[test]
    fn object_and_companion_object() {
        let source = r#"
object Logger {
    fun log(message: String) {
        println(message)
    }
}

class Registry {
    companion object {
        fun default(): Registry = Registry()
    }
}
"#;
        let (nodes, _edges, _refs) = walk(source);

        let logger = nodes.iter().find(|n| n.name == "Logger").unwrap();
        assert_eq!(logger.kind, NodeKind::Class);
        let log = nodes.iter().find(|n| n.name == "log").unwrap();
        assert_eq!(log.kind, NodeKind::Method);
        assert_eq!(log.qualified_name, "Example.kt::Logger::log");

        let companion = nodes.iter().find(|n| n.name == "Companion").unwrap();
        assert_eq!(companion.kind, NodeKind::Class);
        assert_eq!(companion.is_static, Some(true));
        assert_eq!(companion.qualified_name, "Example.kt::Registry::Companion");
    }

    #[test]
    fn const_property_and_type_alias() {
        let source = r#"
const val MAX_RETRIES = 3

val endpoint = "https://example.com"

typealias Handler = (String) -> Unit
"#;
        let (nodes, _edges, _refs) = walk(source);

        let max = nodes.iter().find(|n| n.name == "MAX_RETRIES").unwrap();
        assert_eq!(max.kind, NodeKind::Constant);

        let endpoint = nodes.iter().find(|n| n.name == "endpoint").unwrap();
        assert_eq!(endpoint.kind, NodeKind::Property);

        let alias = nodes.iter().find(|n| n.name == "Handler").unwrap();
        assert_eq!(alias.kind, NodeKind::TypeAlias);
    }

    #[test]
    fn visibility_defaults_to_public() {
        let source = r#"
class Service {
    private fun internalStep() {}
    protected fun hook() {}
    fun run() {}
}
"#;
        let (nodes, _edges, _refs) = walk(source);

        let internal_step = nodes.iter().find(|n| n.name == "internalStep").unwrap();
        assert_eq!(internal_step.visibility, Some(Visibility::Private));
        let hook = nodes.iter().find(|n| n.name == "hook").unwrap();
        assert_eq!(hook.visibility, Some(Visibility::Protected));
        let run = nodes.iter().find(|n| n.name == "run").unwrap();
        assert_eq!(run.visibility, Some(Visibility::Public));
    }

    #[test]
    fn imports_flow_through_generic_dispatch() {
        let source = r#"
import com.example.models.User
import kotlin.collections.List

class App
"#;
        let (_nodes, _edges, refs) = walk(source);

        let imports: Vec<_> = refs
            .iter()
            .filter(|r| r.kind == ReferenceKind::Imports)
            .collect();
        assert!(imports.iter().any(|r| r.name.contains("com.example.models.User")));
        assert!(imports.iter().any(|r| r.name.contains("kotlin.collections.List")));
    }

    #[test]
    fn delegation_mixes_extends_and_implements() {
        let source = r#"
open class Animal(val name: String)

interface Pet

class Dog(name: String) : Animal(name), Pet {
    fun bark() {}
}
"#;
        let (_nodes, _edges, refs) = walk(source);

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Extends && r.name == "Animal"));
        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Implements && r.name == "Pet"));
    }
}
