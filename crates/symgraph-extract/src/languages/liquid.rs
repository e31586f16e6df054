//! Pattern-based extractor for Liquid templates.
//!
//! Liquid has no supported parser, so extraction works by regex over the raw
//! text: render/include/section tags become `component` nodes with
//! `references` to the snippet or section file, `{% schema %}` blocks become
//! `constant` nodes, and `{% assign %}` tags become `variable` nodes. Every
//! emitted node hangs off the template's own `file` node. Malformed
//! constructs are skipped without error.

use regex::Regex;
use symgraph_core::{
    ident, Edge, EdgeKind, Language, Node, NodeKind, ReferenceKind, UnresolvedReference,
};

/// Cap on how much of a schema body is kept as a docstring.
const SCHEMA_DOCSTRING_CHARS: usize = 200;

pub struct LiquidExtractor {
    render: Regex,
    section: Regex,
    schema: Regex,
    assign: Regex,
}

impl LiquidExtractor {
    pub fn new() -> Self {
        Self {
            render: Regex::new(r#"\{%-?\s*(?:render|include)\s+['"]([^'"]+)['"]"#)
                .expect("render pattern"),
            section: Regex::new(r#"\{%-?\s*section\s+['"]([^'"]+)['"]"#).expect("section pattern"),
            schema: Regex::new(r"(?s)\{%-?\s*schema\s*-?%\}(.*?)\{%-?\s*endschema\s*-?%\}")
                .expect("schema pattern"),
            assign: Regex::new(r"\{%-?\s*assign\s+([A-Za-z_][A-Za-z0-9_]*)\s*=")
                .expect("assign pattern"),
        }
    }

    /// Extract nodes, edges, and references from template text.
    pub fn extract(
        &self,
        file_path: &str,
        source: &str,
        updated_at: i64,
    ) -> (Vec<Node>, Vec<Edge>, Vec<UnresolvedReference>) {
        let mut out = Output {
            file_path,
            source,
            updated_at,
            file_id: ident::file_node_id(file_path),
            nodes: Vec::new(),
            edges: Vec::new(),
            references: Vec::new(),
        };
        out.emit_file_node();

        for captures in self.render.captures_iter(source) {
            let whole = captures.get(0).expect("match");
            let name = &captures[1];
            let id = out.emit(NodeKind::Component, name, whole.start(), whole.end(), None);
            out.reference(&id, format!("snippets/{name}.liquid"), whole.start());
        }

        for captures in self.section.captures_iter(source) {
            let whole = captures.get(0).expect("match");
            let name = &captures[1];
            let id = out.emit(NodeKind::Component, name, whole.start(), whole.end(), None);
            out.reference(&id, format!("sections/{name}.liquid"), whole.start());
        }

        for captures in self.schema.captures_iter(source) {
            let whole = captures.get(0).expect("match");
            let body = captures[1].trim().to_string();
            let name = schema_name(&body).unwrap_or_else(|| "schema".to_string());
            let docstring: String = body.chars().take(SCHEMA_DOCSTRING_CHARS).collect();
            out.emit(
                NodeKind::Constant,
                &name,
                whole.start(),
                whole.end(),
                Some(docstring),
            );
        }

        for captures in self.assign.captures_iter(source) {
            let whole = captures.get(0).expect("match");
            let name = &captures[1];
            out.emit(NodeKind::Variable, name, whole.start(), whole.end(), None);
        }

        (out.nodes, out.edges, out.references)
    }
}

impl Default for LiquidExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Name from a schema body's top-level JSON `name` string, if it parses.
fn schema_name(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("name")?.as_str().map(str::to_string)
}

struct Output<'a> {
    file_path: &'a str,
    source: &'a str,
    updated_at: i64,
    file_id: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    references: Vec<UnresolvedReference>,
}

impl Output<'_> {
    fn emit_file_node(&mut self) {
        let line_count = self.source.lines().count().max(1) as u32;
        self.nodes.push(Node {
            id: self.file_id.clone(),
            kind: NodeKind::File,
            name: ident::file_basename(self.file_path).to_string(),
            qualified_name: self.file_path.to_string(),
            file_path: self.file_path.to_string(),
            language: Language::Liquid,
            start_line: 1,
            end_line: line_count,
            start_column: 0,
            end_column: 0,
            updated_at: self.updated_at,
            visibility: None,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: None,
            decorators: None,
        });
    }

    fn emit(
        &mut self,
        kind: NodeKind,
        name: &str,
        start: usize,
        end: usize,
        docstring: Option<String>,
    ) -> String {
        let (start_line, start_column) = line_col(self.source, start);
        let (end_line, end_column) = line_col(self.source, end);
        let id = ident::node_id(self.file_path, kind, name, start_line);

        self.edges.push(Edge {
            source_id: self.file_id.clone(),
            target_id: id.clone(),
            kind: EdgeKind::Contains,
        });
        self.nodes.push(Node {
            id: id.clone(),
            kind,
            name: name.to_string(),
            qualified_name: format!("{}::{name}", self.file_path),
            file_path: self.file_path.to_string(),
            language: Language::Liquid,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: None,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: docstring.filter(|d| !d.is_empty()),
            decorators: None,
        });
        id
    }

    fn reference(&mut self, from_id: &str, target: String, offset: usize) {
        let (line, column) = line_col(self.source, offset);
        self.references.push(UnresolvedReference {
            from_node_id: from_id.to_string(),
            name: target,
            kind: ReferenceKind::References,
            line,
            column,
            raw: None,
        });
    }
}

/// 1-based line and 0-based column for a byte offset.
fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let prefix = &source[..offset.min(source.len())];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
    let column = match prefix.rfind('\n') {
        Some(pos) => (offset - pos - 1) as u32,
        None => offset as u32,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(path: &str, source: &str) -> (Vec<Node>, Vec<Edge>, Vec<UnresolvedReference>) {
        LiquidExtractor::new().extract(path, source, 0)
    }

    #[test]
    fn render_tag_emits_component_and_reference() {
        let source = "{% render 'product-card' %}";
        let (nodes, edges, refs) = extract("index.liquid", source);

        let file = nodes.iter().find(|n| n.kind == NodeKind::File).unwrap();
        assert_eq!(file.name, "index.liquid");

        let card = nodes.iter().find(|n| n.name == "product-card").unwrap();
        assert_eq!(card.kind, NodeKind::Component);
        assert_eq!(card.start_line, 1);

        assert!(edges.iter().any(|e| {
            e.kind == EdgeKind::Contains && e.source_id == file.id && e.target_id == card.id
        }));

        let reference = refs.iter().find(|r| r.kind == ReferenceKind::References).unwrap();
        assert_eq!(reference.name, "snippets/product-card.liquid");
        assert_eq!(reference.from_node_id, card.id);
    }

    #[test]
    fn include_and_section_tags() {
        let source = "{% include 'header' %}\n{% section 'featured' %}\n";
        let (nodes, _edges, refs) = extract("layout.liquid", source);

        assert!(nodes.iter().any(|n| n.name == "header" && n.kind == NodeKind::Component));
        let featured = nodes.iter().find(|n| n.name == "featured").unwrap();
        assert_eq!(featured.start_line, 2);

        assert!(refs.iter().any(|r| r.name == "snippets/header.liquid"));
        assert!(refs.iter().any(|r| r.name == "sections/featured.liquid"));
    }

    #[test]
    fn schema_block_parses_json_name() {
        let source = r#"{% schema %}
{
  "name": "Featured products",
  "settings": []
}
{% endschema %}"#;
        let (nodes, _edges, _refs) = extract("section.liquid", source);

        let schema = nodes.iter().find(|n| n.kind == NodeKind::Constant).unwrap();
        assert_eq!(schema.name, "Featured products");
        assert!(schema.docstring.as_deref().unwrap().starts_with('{'));
    }

    #[test]
    fn malformed_schema_falls_back_to_default_name() {
        let source = "{% schema %} not json at all {% endschema %}";
        let (nodes, _edges, _refs) = extract("broken.liquid", source);

        let schema = nodes.iter().find(|n| n.kind == NodeKind::Constant).unwrap();
        assert_eq!(schema.name, "schema");
    }

    #[test]
    fn assign_emits_variable() {
        let source = "{% assign discounted_price = product.price | times: 0.9 %}";
        let (nodes, _edges, _refs) = extract("price.liquid", source);

        let var = nodes.iter().find(|n| n.kind == NodeKind::Variable).unwrap();
        assert_eq!(var.name, "discounted_price");
    }

    #[test]
    fn unknown_constructs_are_skipped_silently() {
        let source = "{% weird_tag 'x' %}\n{{ product.title }}\n";
        let (nodes, edges, refs) = extract("noop.liquid", source);

        // Only the file node.
        assert_eq!(nodes.len(), 1);
        assert!(edges.is_empty());
        assert!(refs.is_empty());
    }

    #[test]
    fn line_col_math() {
        assert_eq!(line_col("abc\ndef", 0), (1, 0));
        assert_eq!(line_col("abc\ndef", 4), (2, 0));
        assert_eq!(line_col("abc\ndef", 6), (2, 2));
    }
}
