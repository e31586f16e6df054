//! Stable identity hashing for graph nodes and file contents.
//!
//! A node id is `kind:` followed by 32 hex characters: SHA-256 over
//! `(file path, kind, name, start line)` truncated to 16 bytes. Identity is
//! stable across re-extractions of an unchanged file and survives edits that
//! keep a symbol's name and start line.

use sha2::{Digest, Sha256};

use crate::NodeKind;

/// Compute the stable id for a node.
pub fn node_id(file_path: &str, kind: NodeKind, name: &str, start_line: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_path.as_bytes());
    hasher.update([0u8]);
    hasher.update(kind.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(start_line.to_le_bytes());
    let digest = hasher.finalize();

    let mut id = String::with_capacity(kind.as_str().len() + 1 + 32);
    id.push_str(kind.as_str());
    id.push(':');
    for byte in &digest[..16] {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}

/// The id of a file's own node, also used as the file-scope sentinel for
/// references emitted outside any named scope.
pub fn file_node_id(file_path: &str) -> String {
    node_id(file_path, NodeKind::File, file_basename(file_path), 1)
}

/// Final path segment, used as a file node's display name.
pub fn file_basename(file_path: &str) -> &str {
    file_path.rsplit('/').next().unwrap_or(file_path)
}

/// SHA-256 hex digest of raw file bytes, for incremental change detection.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_prefixed_and_32_hex() {
        let id = node_id("src/payment.ts", NodeKind::Function, "processPayment", 1);
        let (prefix, hex) = id.split_once(':').unwrap();
        assert_eq!(prefix, "function");
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn id_is_deterministic() {
        let a = node_id("a.rs", NodeKind::Struct, "Config", 10);
        let b = node_id("a.rs", NodeKind::Struct, "Config", 10);
        assert_eq!(a, b);
    }

    #[test]
    fn id_depends_on_every_component() {
        let base = node_id("a.rs", NodeKind::Function, "run", 3);
        assert_ne!(base, node_id("b.rs", NodeKind::Function, "run", 3));
        assert_ne!(base, node_id("a.rs", NodeKind::Method, "run", 3));
        assert_ne!(base, node_id("a.rs", NodeKind::Function, "walk", 3));
        assert_ne!(base, node_id("a.rs", NodeKind::Function, "run", 4));
    }

    #[test]
    fn file_node_id_uses_basename() {
        assert_eq!(
            file_node_id("templates/index.liquid"),
            node_id("templates/index.liquid", NodeKind::File, "index.liquid", 1)
        );
        assert_eq!(file_basename("index.liquid"), "index.liquid");
    }

    #[test]
    fn content_hash_is_full_sha256() {
        let hash = content_hash(b"fn main() {}");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, content_hash(b"fn main() {}"));
        assert_ne!(hash, content_hash(b"fn main() { }"));
    }
}
