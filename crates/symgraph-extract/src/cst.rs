//! Small helpers over tree-sitter nodes shared by the walkers.

use tree_sitter::Node as TsNode;

/// Node kinds that can serve as a symbol name.
pub(crate) const IDENTIFIER_KINDS: [&str; 4] =
    ["identifier", "type_identifier", "simple_identifier", "constant"];

/// Source text of a node. Invalid UTF-8 yields an empty string.
pub(crate) fn text(node: TsNode, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

/// All children, named and anonymous, in order.
pub(crate) fn children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children in order.
pub(crate) fn named_children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// First direct child (named or not) with the given kind.
pub(crate) fn find_child<'t>(node: TsNode<'t>, kind: &str) -> Option<TsNode<'t>> {
    children(node).into_iter().find(|c| c.kind() == kind)
}

/// True if any direct child has the given kind (keyword tokens included).
pub(crate) fn has_token(node: TsNode, token: &str) -> bool {
    children(node).iter().any(|c| c.kind() == token)
}

/// Like `has_token`, but also looks one level deeper (modifier bags wrap
/// their keyword tokens in several grammars).
pub(crate) fn has_token_deep(node: TsNode, token: &str) -> bool {
    for child in children(node) {
        if child.kind() == token {
            return true;
        }
        if children(child).iter().any(|c| c.kind() == token) {
            return true;
        }
    }
    false
}

/// Whitespace-split words of the node's `modifiers`/`modifier` children.
pub(crate) fn modifier_tokens(node: TsNode, source: &[u8]) -> Vec<String> {
    let mut tokens = Vec::new();
    for child in children(node) {
        if child.kind() == "modifiers" || child.kind() == "modifier" {
            tokens.extend(text(child, source).split_whitespace().map(str::to_string));
        }
    }
    tokens
}

/// First named child whose kind is an identifier variant.
pub(crate) fn first_identifier_child<'t>(node: TsNode<'t>) -> Option<TsNode<'t>> {
    named_children(node)
        .into_iter()
        .find(|c| IDENTIFIER_KINDS.contains(&c.kind()))
}

/// Trim surrounding string-literal quotes and a trailing semicolon.
pub(crate) fn strip_quotes(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches(';').trim();
    let trimmed = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .or_else(|| trimmed.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .unwrap_or(trimmed);
    trimmed.to_string()
}
