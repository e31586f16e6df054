//! Generic CST walker.
//!
//! Performs a single depth-first pass over a parsed tree, dispatching each
//! node through the language policy. The walker owns the scope stack and the
//! output vectors; nothing is shared across files. Swift and Kotlin intercept
//! the node types they own before generic dispatch and fall back to it for
//! imports and calls.

use symgraph_core::{
    ident, Edge, EdgeKind, Language, Node, NodeKind, ReferenceKind, UnresolvedReference,
    Visibility,
};
use tree_sitter::Node as TsNode;

use crate::cst;
use crate::languages::{kotlin, swift};
use crate::policy::LanguagePolicy;

/// Which bespoke walker, if any, runs ahead of generic dispatch.
#[derive(Clone, Copy)]
enum Dialect {
    Generic,
    Swift,
    Kotlin,
}

struct Scope {
    /// Id of the emitted node owning this scope, or `None` for transparent
    /// scopes (Rust impl blocks) that only contribute qualification.
    node_id: Option<String>,
    name: String,
}

/// Optional attributes attached to an emitted node.
#[derive(Default)]
pub(crate) struct NodeAttrs {
    pub visibility: Option<Visibility>,
    pub is_exported: Option<bool>,
    pub is_async: Option<bool>,
    pub is_static: Option<bool>,
    pub is_abstract: Option<bool>,
    pub signature: Option<String>,
    pub docstring: Option<String>,
    pub decorators: Option<Vec<String>>,
}

pub struct Walker<'a> {
    pub(crate) language: Language,
    pub(crate) policy: &'static LanguagePolicy,
    pub(crate) file_path: &'a str,
    pub(crate) source: &'a [u8],
    updated_at: i64,
    include_docstrings: bool,
    dialect: Dialect,
    scopes: Vec<Scope>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    references: Vec<UnresolvedReference>,
}

impl<'a> Walker<'a> {
    pub fn new(
        language: Language,
        policy: &'static LanguagePolicy,
        file_path: &'a str,
        source: &'a [u8],
        updated_at: i64,
        include_docstrings: bool,
    ) -> Self {
        let dialect = match language {
            Language::Swift => Dialect::Swift,
            Language::Kotlin => Dialect::Kotlin,
            _ => Dialect::Generic,
        };
        Self {
            language,
            policy,
            file_path,
            source,
            updated_at,
            include_docstrings,
            dialect,
            scopes: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Walk the whole tree from the root.
    pub fn walk(&mut self, root: TsNode) {
        self.visit_children(root);
    }

    /// Drain the walker into its outputs.
    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>, Vec<UnresolvedReference>) {
        (self.nodes, self.edges, self.references)
    }

    // ── Dispatch ────────────────────────────────────────────────────────────

    pub(crate) fn visit_children(&mut self, node: TsNode) {
        for child in cst::named_children(node) {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: TsNode) {
        match self.dialect {
            Dialect::Swift => {
                if swift::dispatch(self, node) {
                    return;
                }
            }
            Dialect::Kotlin => {
                if kotlin::dispatch(self, node) {
                    return;
                }
            }
            Dialect::Generic => {}
        }

        let kind = node.kind();
        let policy = self.policy;

        if policy.function_types.contains(&kind) {
            // A shared function/method type nested in a class-like scope is a
            // method; method-only types (Go's receiver methods) are handled
            // below regardless of nesting.
            let as_method = !self.scopes.is_empty() && policy.method_types.contains(&kind);
            self.emit_callable(node, as_method);
            return;
        }
        if policy.class_types.contains(&kind) {
            self.emit_container(node, NodeKind::Class);
            return;
        }
        if policy.method_types.contains(&kind) {
            self.emit_callable(node, true);
            return;
        }
        if policy.interface_types.contains(&kind) {
            self.emit_container(node, policy.interface_kind);
            return;
        }
        if policy.struct_types.contains(&kind) {
            self.emit_container(node, NodeKind::Struct);
            return;
        }
        if policy.enum_types.contains(&kind) {
            self.emit_container(node, NodeKind::Enum);
            return;
        }
        if policy.scope_types.contains(&kind) {
            self.visit_transparent_scope(node);
            return;
        }
        if policy.import_types.contains(&kind) {
            self.emit_import(node);
            return;
        }
        if policy.call_types.contains(&kind) {
            self.emit_call(node);
            // fall through: arguments may contain further calls
        }
        self.visit_children(node);
    }

    // ── Emission ────────────────────────────────────────────────────────────

    /// Emit a node plus its containment edge, returning the node id.
    pub(crate) fn emit(&mut self, node: TsNode, kind: NodeKind, name: &str, attrs: NodeAttrs) -> String {
        let start_line = node.start_position().row as u32 + 1;
        let id = ident::node_id(self.file_path, kind, name, start_line);

        if let Some(parent_id) = self.scopes.iter().rev().find_map(|s| s.node_id.clone()) {
            self.edges.push(Edge {
                source_id: parent_id,
                target_id: id.clone(),
                kind: EdgeKind::Contains,
            });
        }

        let docstring = if self.include_docstrings {
            attrs.docstring
        } else {
            None
        };
        let qualified_name = self.qualified_name(name);

        self.nodes.push(Node {
            id: id.clone(),
            kind,
            name: name.to_string(),
            qualified_name,
            file_path: self.file_path.to_string(),
            language: self.language,
            start_line,
            end_line: node.end_position().row as u32 + 1,
            start_column: node.start_position().column as u32,
            end_column: node.end_position().column as u32,
            updated_at: self.updated_at,
            visibility: attrs.visibility,
            is_exported: attrs.is_exported,
            is_async: attrs.is_async,
            is_static: attrs.is_static,
            is_abstract: attrs.is_abstract,
            signature: attrs.signature,
            docstring,
            decorators: attrs.decorators,
        });
        id
    }

    fn emit_callable(&mut self, node: TsNode, as_method: bool) {
        let Some(name) = self.node_name(node) else {
            // Anonymous: no node, but keep walking for nested declarations.
            self.visit_children(node);
            return;
        };
        let kind = if as_method {
            NodeKind::Method
        } else {
            NodeKind::Function
        };
        let attrs = self.policy_attrs(node);
        let id = self.emit(node, kind, &name, attrs);
        self.push_scope(Some(id), name);
        let body = node.child_by_field_name(self.policy.body_field).unwrap_or(node);
        self.visit_children(body);
        self.pop_scope();
    }

    fn emit_container(&mut self, node: TsNode, kind: NodeKind) {
        let Some(name) = self.node_name(node) else {
            self.visit_children(node);
            return;
        };
        let attrs = self.policy_attrs(node);
        let id = self.emit(node, kind, &name, attrs);
        self.extract_inheritance(node, &id);
        self.push_scope(Some(id), name);
        let body = node.child_by_field_name(self.policy.body_field).unwrap_or(node);
        self.visit_children(body);
        self.pop_scope();
    }

    /// Rust impl blocks: qualify and method-ify their items without emitting
    /// a node of their own.
    fn visit_transparent_scope(&mut self, node: TsNode) {
        let name = node
            .child_by_field_name("type")
            .map(|n| cst::text(n, self.source))
            .filter(|t| !t.is_empty());
        match name {
            Some(name) => {
                self.push_scope(None, name);
                let body = node.child_by_field_name(self.policy.body_field).unwrap_or(node);
                self.visit_children(body);
                self.pop_scope();
            }
            None => self.visit_children(node),
        }
    }

    // ── References ──────────────────────────────────────────────────────────

    fn emit_import(&mut self, node: TsNode) {
        let mut targets = Vec::new();
        self.collect_import_targets(node, &mut targets);
        if targets.is_empty() {
            // Last resort: raw text minus the leading keyword.
            let text = cst::text(node, self.source);
            if let Some((_, rest)) = text.trim().split_once(char::is_whitespace) {
                let cleaned = cst::strip_quotes(rest);
                if !cleaned.is_empty() {
                    targets.push(cleaned);
                }
            }
        }
        let from = self.attribution_id();
        for target in targets {
            self.references.push(UnresolvedReference {
                from_node_id: from.clone(),
                name: target,
                kind: ReferenceKind::Imports,
                line: node.start_position().row as u32 + 1,
                column: node.start_position().column as u32,
                raw: None,
            });
        }
    }

    fn collect_import_targets(&self, node: TsNode, targets: &mut Vec<String>) {
        for field in ["source", "path", "module_name", "argument"] {
            if let Some(child) = node.child_by_field_name(field) {
                let target = cst::strip_quotes(&cst::text(child, self.source));
                if !target.is_empty() {
                    targets.push(target);
                    return;
                }
            }
        }
        for child in cst::named_children(node) {
            match child.kind() {
                "import_spec_list" | "import_spec" => {
                    self.collect_import_targets(child, targets);
                }
                "dotted_name"
                | "scoped_identifier"
                | "qualified_name"
                | "qualified_identifier"
                | "namespace_use_clause"
                | "identifier"
                | "simple_identifier"
                | "string"
                | "string_literal"
                | "interpreted_string_literal"
                | "system_lib_string" => {
                    let target = cst::strip_quotes(&cst::text(child, self.source));
                    if !target.is_empty() {
                        targets.push(target);
                    }
                }
                _ => {}
            }
        }
    }

    fn emit_call(&mut self, node: TsNode) {
        let callee = node
            .child_by_field_name("function")
            .or_else(|| node.child_by_field_name("name"))
            .or_else(|| node.child_by_field_name("method"))
            .or_else(|| cst::named_children(node).into_iter().next());
        let Some(callee) = callee else { return };
        let raw = cst::text(callee, self.source);
        if raw.is_empty() {
            return;
        }
        // Member access reduces to the property name; the receiver is kept in
        // `raw` for the downstream resolution pass.
        let name = match callee.kind() {
            "member_expression" | "attribute" => callee
                .child_by_field_name("property")
                .or_else(|| callee.child_by_field_name("attribute"))
                .or_else(|| callee.child_by_field_name("field"))
                .or_else(|| cst::named_children(callee).into_iter().last())
                .map(|p| cst::text(p, self.source))
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| raw.clone()),
            _ => raw.clone(),
        };
        let raw = if name == raw { None } else { Some(raw) };
        let from = self.attribution_id();
        self.references.push(UnresolvedReference {
            from_node_id: from,
            name,
            kind: ReferenceKind::Calls,
            line: node.start_position().row as u32 + 1,
            column: node.start_position().column as u32,
            raw,
        });
    }

    fn extract_inheritance(&mut self, node: TsNode, from_id: &str) {
        for child in cst::named_children(node) {
            match child.kind() {
                "extends_clause" | "superclass" => {
                    if let Some(target) = cst::named_children(child).into_iter().next() {
                        self.push_type_ref(from_id, ReferenceKind::Extends, target);
                    }
                }
                "class_heritage" => {
                    for sub in cst::named_children(child) {
                        match sub.kind() {
                            "extends_clause" => {
                                if let Some(target) = cst::named_children(sub).into_iter().next() {
                                    self.push_type_ref(from_id, ReferenceKind::Extends, target);
                                }
                            }
                            "implements_clause" => {
                                for target in cst::named_children(sub) {
                                    self.push_type_ref(from_id, ReferenceKind::Implements, target);
                                }
                            }
                            // JS heritage carries a bare expression.
                            _ => self.push_type_ref(from_id, ReferenceKind::Extends, sub),
                        }
                    }
                }
                "implements_clause" | "class_interface_clause" => {
                    for target in cst::named_children(child) {
                        self.push_type_ref(from_id, ReferenceKind::Implements, target);
                    }
                }
                _ => {}
            }
        }
    }

    fn push_type_ref(&mut self, from_id: &str, kind: ReferenceKind, target: TsNode) {
        let name = cst::text(target, self.source);
        if name.is_empty() {
            return;
        }
        self.references.push(UnresolvedReference {
            from_node_id: from_id.to_string(),
            name,
            kind,
            line: target.start_position().row as u32 + 1,
            column: target.start_position().column as u32,
            raw: None,
        });
    }

    /// Reference emitted by a dialect walker on behalf of a specific node.
    pub(crate) fn emit_reference_from(
        &mut self,
        from_id: &str,
        kind: ReferenceKind,
        name: String,
        at: TsNode,
    ) {
        if name.is_empty() {
            return;
        }
        self.references.push(UnresolvedReference {
            from_node_id: from_id.to_string(),
            name,
            kind,
            line: at.start_position().row as u32 + 1,
            column: at.start_position().column as u32,
            raw: None,
        });
    }

    // ── Scope bookkeeping ───────────────────────────────────────────────────

    pub(crate) fn push_scope(&mut self, node_id: Option<String>, name: String) {
        self.scopes.push(Scope { node_id, name });
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub(crate) fn in_scope(&self) -> bool {
        !self.scopes.is_empty()
    }

    fn qualified_name(&self, name: &str) -> String {
        let mut parts = Vec::with_capacity(self.scopes.len() + 2);
        parts.push(self.file_path);
        for scope in &self.scopes {
            parts.push(&scope.name);
        }
        parts.push(name);
        parts.join("::")
    }

    /// Innermost scope owning a node id, or the file-scope sentinel.
    pub(crate) fn attribution_id(&self) -> String {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.node_id.clone())
            .unwrap_or_else(|| ident::file_node_id(self.file_path))
    }

    // ── Attribute extraction ────────────────────────────────────────────────

    fn policy_attrs(&self, node: TsNode) -> NodeAttrs {
        let policy = self.policy;
        NodeAttrs {
            visibility: policy
                .visibility
                .and_then(|f| f(node, self.source))
                .or(policy.default_visibility),
            is_exported: policy.exported.map(|f| f(node, self.source)),
            is_async: policy.is_async.map(|f| f(node, self.source)),
            is_static: policy.is_static.map(|f| f(node, self.source)),
            is_abstract: None,
            signature: self.signature(node),
            docstring: self.docstring(node),
            decorators: None,
        }
    }

    fn signature(&self, node: TsNode) -> Option<String> {
        let policy = self.policy;
        let params = policy
            .params_field
            .and_then(|f| node.child_by_field_name(f))
            .map(|n| cst::text(n, self.source))?;
        let ret = policy
            .return_field
            .and_then(|f| node.child_by_field_name(f))
            .map(|n| cst::text(n, self.source));
        Some(match ret {
            Some(ret) if !ret.trim().is_empty() => {
                let ret = ret.trim().trim_start_matches(':').trim_start();
                if policy.return_leading {
                    format!("{ret} {params}")
                } else {
                    format!("{params}{}{ret}", policy.signature_joiner)
                }
            }
            _ => params,
        })
    }

    pub(crate) fn docstring(&self, node: TsNode) -> Option<String> {
        if !self.include_docstrings {
            return None;
        }
        doc_comment_above(node, self.source)
    }

    // ── Name resolution ─────────────────────────────────────────────────────

    pub(crate) fn node_name(&self, node: TsNode) -> Option<String> {
        if let Some(field) = node.child_by_field_name(self.policy.name_field) {
            if field.kind().contains("declarator") {
                if let Some(name) = declarator_name(field, self.source) {
                    return Some(name);
                }
            } else {
                let text = cst::text(field, self.source);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        if let Some(id_node) = cst::first_identifier_child(node) {
            let text = cst::text(id_node, self.source);
            if !text.is_empty() {
                return Some(text);
            }
        }
        // Go struct_type/interface_type carry no name; the enclosing
        // type_spec does.
        if let Some(parent) = node.parent() {
            if parent.kind() == "type_spec" {
                if let Some(name) = parent.child_by_field_name("name") {
                    let text = cst::text(name, self.source);
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
        None
    }
}

/// Resolve the identifier inside a C/C++ declarator chain.
fn declarator_name(decl: TsNode, source: &[u8]) -> Option<String> {
    if let Some(inner) = decl.child_by_field_name("declarator") {
        if inner.kind().contains("declarator") {
            if let Some(deeper) = inner.child_by_field_name("declarator") {
                let text = cst::text(deeper, source);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        } else {
            let text = cst::text(inner, source);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    cst::first_identifier_child(decl)
        .map(|n| cst::text(n, source))
        .filter(|t| !t.is_empty())
}

/// Collect the run of comment siblings directly above a node, cleaned of
/// comment markers and joined with newlines.
pub(crate) fn doc_comment_above(node: TsNode, source: &[u8]) -> Option<String> {
    const COMMENT_KINDS: [&str; 4] =
        ["comment", "line_comment", "block_comment", "documentation_comment"];

    let mut blocks = Vec::new();
    let mut prev = node.prev_named_sibling();
    while let Some(sibling) = prev {
        if !COMMENT_KINDS.contains(&sibling.kind()) {
            break;
        }
        blocks.push(cst::text(sibling, source));
        prev = sibling.prev_named_sibling();
    }
    if blocks.is_empty() {
        return None;
    }
    blocks.reverse();

    let mut lines = Vec::new();
    for block in &blocks {
        for line in block.lines() {
            lines.push(clean_comment_line(line));
        }
    }
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn clean_comment_line(line: &str) -> String {
    let mut rest = line.trim();
    rest = rest.strip_suffix("*/").unwrap_or(rest);
    for marker in ["/**", "///", "//!", "//", "/*", "*"] {
        if let Some(stripped) = rest.strip_prefix(marker) {
            rest = stripped;
            break;
        }
    }
    rest.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::grammar_for;
    use crate::policy::policy_for;
    use tree_sitter::{Parser, Tree};

    fn parse(language: Language, source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar_for(language).expect("grammar"))
            .expect("failed to set language");
        parser.parse(source.as_bytes(), None).expect("failed to parse")
    }

    fn walk(language: Language, path: &str, source: &str) -> (Vec<Node>, Vec<Edge>, Vec<UnresolvedReference>) {
        let tree = parse(language, source);
        let mut walker = Walker::new(
            language,
            policy_for(language).unwrap(),
            path,
            source.as_bytes(),
            0,
            true,
        );
        walker.walk(tree.root_node());
        walker.into_parts()
    }

    #[test]
    fn typescript_exported_function_with_member_call() {
        let source = "export function processPayment(amount: number): Promise<Receipt> { return stripe.charge(amount); }";
        let (nodes, _edges, refs) = walk(Language::TypeScript, "payment.ts", source);

        let func = nodes.iter().find(|n| n.name == "processPayment").unwrap();
        assert_eq!(func.kind, NodeKind::Function);
        assert_eq!(func.is_exported, Some(true));
        assert_eq!(func.qualified_name, "payment.ts::processPayment");
        assert!(func.signature.as_deref().unwrap().contains("amount: number"));

        let call = refs
            .iter()
            .find(|r| r.kind == ReferenceKind::Calls && r.name == "charge")
            .unwrap();
        assert_eq!(call.from_node_id, func.id);
        assert_eq!(call.raw.as_deref(), Some("stripe.charge"));
    }

    #[test]
    fn typescript_class_with_inheritance() {
        let source = r#"
class OrderService extends BaseService implements Billable, Auditable {
    private total: number = 0;
    async submit(): Promise<void> {
        await this.api.post();
    }
}
"#;
        let (nodes, edges, refs) = walk(Language::TypeScript, "order.ts", source);

        let class = nodes.iter().find(|n| n.name == "OrderService").unwrap();
        assert_eq!(class.kind, NodeKind::Class);

        let submit = nodes.iter().find(|n| n.name == "submit").unwrap();
        assert_eq!(submit.kind, NodeKind::Method);
        assert_eq!(submit.is_async, Some(true));
        assert_eq!(submit.qualified_name, "order.ts::OrderService::submit");
        assert!(edges.iter().any(|e| {
            e.kind == EdgeKind::Contains && e.source_id == class.id && e.target_id == submit.id
        }));

        let extends: Vec<_> = refs
            .iter()
            .filter(|r| r.kind == ReferenceKind::Extends)
            .collect();
        assert!(extends.iter().any(|r| r.name == "BaseService"));
        let implements: Vec<_> = refs
            .iter()
            .filter(|r| r.kind == ReferenceKind::Implements)
            .collect();
        assert!(implements.iter().any(|r| r.name == "Billable"));
        assert!(implements.iter().any(|r| r.name == "Auditable"));
    }

    #[test]
    fn typescript_interface_and_import() {
        let source = r#"
import { Receipt } from "./models";

export interface Repository {
    find(id: string): Receipt;
}
"#;
        let (nodes, _edges, refs) = walk(Language::TypeScript, "repo.ts", source);
        let iface = nodes.iter().find(|n| n.name == "Repository").unwrap();
        assert_eq!(iface.kind, NodeKind::Interface);

        let import = refs
            .iter()
            .find(|r| r.kind == ReferenceKind::Imports)
            .unwrap();
        assert_eq!(import.name, "./models");
        assert_eq!(import.from_node_id, ident::file_node_id("repo.ts"));
    }

    #[test]
    fn python_nested_function_is_method_and_class_methods_qualify() {
        let source = r#"
import os

class Loader:
    def read(self, path):
        return os.open(path)

def top():
    def inner():
        pass
    return inner
"#;
        let (nodes, _edges, refs) = walk(Language::Python, "loader.py", source);

        let class = nodes.iter().find(|n| n.name == "Loader").unwrap();
        assert_eq!(class.kind, NodeKind::Class);
        let read = nodes.iter().find(|n| n.name == "read").unwrap();
        assert_eq!(read.kind, NodeKind::Method);
        assert_eq!(read.qualified_name, "loader.py::Loader::read");

        let top = nodes.iter().find(|n| n.name == "top").unwrap();
        assert_eq!(top.kind, NodeKind::Function);
        let inner = nodes.iter().find(|n| n.name == "inner").unwrap();
        assert_eq!(inner.kind, NodeKind::Method);

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Imports && r.name == "os"));
        let open_call = refs
            .iter()
            .find(|r| r.kind == ReferenceKind::Calls && r.name == "open")
            .unwrap();
        assert_eq!(open_call.raw.as_deref(), Some("os.open"));
    }

    #[test]
    fn rust_impl_methods_and_trait() {
        let source = r#"
use std::collections::HashMap;

pub trait Repository {
    fn find(&self, id: &str) -> Option<Entity>;
}

pub struct Store {
    items: HashMap<String, Entity>,
}

impl Store {
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.items.get(id)
    }
}

fn helper() {}
"#;
        let (nodes, _edges, refs) = walk(Language::Rust, "store.rs", source);

        let tr = nodes.iter().find(|n| n.name == "Repository").unwrap();
        assert_eq!(tr.kind, NodeKind::Trait);
        assert_eq!(tr.visibility, Some(Visibility::Public));

        let st = nodes.iter().find(|n| n.name == "Store").unwrap();
        assert_eq!(st.kind, NodeKind::Struct);

        let get = nodes.iter().find(|n| n.name == "get").unwrap();
        assert_eq!(get.kind, NodeKind::Method);
        assert_eq!(get.qualified_name, "store.rs::Store::get");

        let helper = nodes.iter().find(|n| n.name == "helper").unwrap();
        assert_eq!(helper.kind, NodeKind::Function);
        assert_eq!(helper.visibility, Some(Visibility::Private));

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Imports && r.name == "std::collections::HashMap"));
    }

    #[test]
    fn go_receiver_method_is_method_at_top_level() {
        let source = r#"
package store

import "fmt"

type Entity struct {
    ID string
}

func (e *Entity) Describe() string {
    return fmt.Sprintf("%s", e.ID)
}

func newEntity() *Entity {
    return &Entity{}
}
"#;
        let (nodes, _edges, refs) = walk(Language::Go, "entity.go", source);

        let entity = nodes.iter().find(|n| n.name == "Entity").unwrap();
        assert_eq!(entity.kind, NodeKind::Struct);

        let describe = nodes.iter().find(|n| n.name == "Describe").unwrap();
        assert_eq!(describe.kind, NodeKind::Method);
        assert_eq!(describe.is_exported, Some(true));

        let ctor = nodes.iter().find(|n| n.name == "newEntity").unwrap();
        assert_eq!(ctor.kind, NodeKind::Function);
        assert_eq!(ctor.is_exported, Some(false));

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Imports && r.name == "fmt"));
    }

    #[test]
    fn java_methods_with_docstring_and_no_free_functions() {
        let source = r#"
import java.util.List;

public class Billing {
    /** Computes the invoice total. */
    public static int total(List<Integer> items) {
        return items.size();
    }
}
"#;
        let (nodes, _edges, refs) = walk(Language::Java, "Billing.java", source);

        let class = nodes.iter().find(|n| n.name == "Billing").unwrap();
        assert_eq!(class.kind, NodeKind::Class);
        assert_eq!(class.visibility, Some(Visibility::Public));

        let total = nodes.iter().find(|n| n.name == "total").unwrap();
        assert_eq!(total.kind, NodeKind::Method);
        assert_eq!(total.is_static, Some(true));
        assert_eq!(total.docstring.as_deref(), Some("Computes the invoice total."));

        assert!(nodes.iter().all(|n| n.kind != NodeKind::Function));
        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Imports && r.name == "java.util.List"));
    }

    #[test]
    fn ruby_class_with_superclass() {
        let source = r#"
class Invoice < Document
  def total
    items.sum
  end
end

def standalone
end
"#;
        let (nodes, _edges, refs) = walk(Language::Ruby, "invoice.rb", source);

        let class = nodes.iter().find(|n| n.name == "Invoice").unwrap();
        assert_eq!(class.kind, NodeKind::Class);

        let total = nodes.iter().find(|n| n.name == "total").unwrap();
        assert_eq!(total.kind, NodeKind::Method);

        let standalone = nodes.iter().find(|n| n.name == "standalone").unwrap();
        assert_eq!(standalone.kind, NodeKind::Function);

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Extends && r.name == "Document"));
    }

    #[test]
    fn c_function_name_via_declarator() {
        let source = r#"
#include <stdio.h>

struct point {
    int x;
    int y;
};

int area(struct point p) {
    return p.x * p.y;
}
"#;
        let (nodes, _edges, refs) = walk(Language::C, "geometry.c", source);

        let area = nodes.iter().find(|n| n.name == "area").unwrap();
        assert_eq!(area.kind, NodeKind::Function);

        let point = nodes.iter().find(|n| n.name == "point").unwrap();
        assert_eq!(point.kind, NodeKind::Struct);

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Imports && r.name == "<stdio.h>"));
    }

    #[test]
    fn php_defaults_to_public_visibility() {
        let source = r#"<?php
class Cart {
    function add($item) {
        array_push($this->items, $item);
    }
    private function clear() {}
}
"#;
        let (nodes, _edges, refs) = walk(Language::Php, "cart.php", source);

        let add = nodes.iter().find(|n| n.name == "add").unwrap();
        assert_eq!(add.kind, NodeKind::Method);
        assert_eq!(add.visibility, Some(Visibility::Public));

        let clear = nodes.iter().find(|n| n.name == "clear").unwrap();
        assert_eq!(clear.visibility, Some(Visibility::Private));

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Calls && r.name == "array_push"));
    }

    #[test]
    fn csharp_struct_and_internal_default() {
        let source = r#"
using System;

struct Vector2 {
    public float Length() {
        return 0f;
    }
}
"#;
        let (nodes, _edges, refs) = walk(Language::CSharp, "vector.cs", source);

        let vec2 = nodes.iter().find(|n| n.name == "Vector2").unwrap();
        assert_eq!(vec2.kind, NodeKind::Struct);
        assert_eq!(vec2.visibility, Some(Visibility::Internal));

        let length = nodes.iter().find(|n| n.name == "Length").unwrap();
        assert_eq!(length.kind, NodeKind::Method);
        assert_eq!(length.visibility, Some(Visibility::Public));

        assert!(refs
            .iter()
            .any(|r| r.kind == ReferenceKind::Imports && r.name == "System"));
    }

    #[test]
    fn anonymous_functions_are_not_emitted() {
        let source = "const fn = function() { return 1; };";
        let (nodes, _edges, _refs) = walk(Language::JavaScript, "anon.js", source);
        assert!(nodes.is_empty());
        assert!(nodes.iter().all(|n| n.name != "<anonymous>"));
    }
}
