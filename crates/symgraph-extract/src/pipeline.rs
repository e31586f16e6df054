//! Incremental sync pipeline.
//!
//! Consumes a stream of `(path, bytes)` pairs from an external walker,
//! re-extracts only files whose content hash changed, and hands each batch
//! to a downstream sink that atomically replaces the file's previous batch.

use std::collections::HashMap;

use symgraph_core::{
    ident, Edge, ExtractConfig, ExtractionResult, FileRecord, Node, SymgraphError,
    UnresolvedReference,
};

use crate::extractor::Extractor;
use crate::registry;

// ── Change detection ────────────────────────────────────────────────────────

/// Tracks file content hashes so unchanged files can be skipped.
pub struct ChangeDetector {
    known_hashes: HashMap<String, String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self {
            known_hashes: HashMap::new(),
        }
    }

    /// True if the file is new or its content hash differs.
    pub fn is_changed(&self, path: &str, content: &[u8]) -> bool {
        let hash = ident::content_hash(content);
        self.known_hashes.get(path) != Some(&hash)
    }

    /// Record the hash for a file after a successful sync.
    pub fn update_hash(&mut self, path: &str, content: &[u8]) {
        self.known_hashes
            .insert(path.to_string(), ident::content_hash(content));
    }

    /// Forget a deleted file.
    pub fn remove_hash(&mut self, path: &str) {
        self.known_hashes.remove(path);
    }

    pub fn tracked_count(&self) -> usize {
        self.known_hashes.len()
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ── Sink ────────────────────────────────────────────────────────────────────

/// Downstream consumer of extraction batches.
///
/// `replace_file` atomically replaces any previous batch for the same path;
/// `remove_file` drops a deleted file's batch.
pub trait GraphSink {
    fn replace_file(
        &mut self,
        file: &FileRecord,
        result: &ExtractionResult,
    ) -> Result<(), SymgraphError>;

    fn remove_file(&mut self, path: &str) -> Result<(), SymgraphError>;
}

/// One file's stored batch.
#[derive(Debug, Clone)]
pub struct FileBatch {
    pub file: FileRecord,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub references: Vec<UnresolvedReference>,
}

/// In-memory sink, usable as a test double or a staging buffer.
#[derive(Default)]
pub struct MemorySink {
    batches: HashMap<String, FileBatch>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self, path: &str) -> Option<&FileBatch> {
        self.batches.get(path)
    }

    pub fn file_count(&self) -> usize {
        self.batches.len()
    }
}

impl GraphSink for MemorySink {
    fn replace_file(
        &mut self,
        file: &FileRecord,
        result: &ExtractionResult,
    ) -> Result<(), SymgraphError> {
        self.batches.insert(
            file.path.clone(),
            FileBatch {
                file: file.clone(),
                nodes: result.nodes.clone(),
                edges: result.edges.clone(),
                references: result.unresolved_references.clone(),
            },
        );
        Ok(())
    }

    fn remove_file(&mut self, path: &str) -> Result<(), SymgraphError> {
        self.batches.remove(path);
        Ok(())
    }
}

// ── Pipeline ────────────────────────────────────────────────────────────────

/// Outcome of syncing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Indexed {
        nodes: usize,
        edges: usize,
        references: usize,
    },
    /// Content hash unchanged since the last sync.
    Skipped,
    /// Extraction reported an error; the previous batch and hash are kept so
    /// the file is retried next time.
    Failed,
}

/// Aggregate counters for one sync run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncReport {
    pub files_seen: usize,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_references: usize,
}

pub struct SyncPipeline<S: GraphSink> {
    extractor: Extractor,
    changes: ChangeDetector,
    sink: S,
}

impl<S: GraphSink> SyncPipeline<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, ExtractConfig::default())
    }

    pub fn with_config(sink: S, config: ExtractConfig) -> Self {
        Self {
            extractor: Extractor::with_config(config),
            changes: ChangeDetector::new(),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn change_detector(&self) -> &ChangeDetector {
        &self.changes
    }

    /// Sync one file from the walker stream.
    pub fn sync_file(&mut self, path: &str, content: &[u8]) -> Result<SyncOutcome, SymgraphError> {
        if !self.changes.is_changed(path, content) {
            return Ok(SyncOutcome::Skipped);
        }

        let language = registry::detect_language(path);
        let result = self.extractor.extract(path, content, Some(language));
        if result.has_errors() {
            tracing::warn!(
                "Extraction failed for {path}: {}",
                result
                    .errors
                    .first()
                    .map(|e| e.message.as_str())
                    .unwrap_or("unknown error")
            );
            return Ok(SyncOutcome::Failed);
        }

        let file = FileRecord {
            path: path.to_string(),
            language,
            content_hash: ident::content_hash(content),
            line_count: content.split(|&b| b == b'\n').count() as u32,
        };
        self.sink.replace_file(&file, &result)?;
        self.changes.update_hash(path, content);

        Ok(SyncOutcome::Indexed {
            nodes: result.nodes.len(),
            edges: result.edges.len(),
            references: result.unresolved_references.len(),
        })
    }

    /// Drop a deleted file from the sink and the hash table.
    pub fn remove_file(&mut self, path: &str) -> Result<(), SymgraphError> {
        self.changes.remove_hash(path);
        self.sink.remove_file(path)
    }

    /// Sync a whole stream of `(path, bytes)` pairs, continuing past
    /// per-file failures.
    pub fn sync_many<I>(&mut self, files: I) -> Result<SyncReport, SymgraphError>
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        let mut report = SyncReport::default();
        for (path, content) in files {
            report.files_seen += 1;
            match self.sync_file(&path, &content)? {
                SyncOutcome::Indexed {
                    nodes,
                    edges,
                    references,
                } => {
                    report.files_indexed += 1;
                    report.total_nodes += nodes;
                    report.total_edges += edges;
                    report.total_references += references;
                }
                SyncOutcome::Skipped => report.files_skipped += 1,
                SyncOutcome::Failed => report.files_failed += 1,
            }
        }
        tracing::info!(
            "Synced {} files: {} indexed, {} skipped, {} failed, {} nodes, {} references",
            report.files_seen,
            report.files_indexed,
            report.files_skipped,
            report.files_failed,
            report.total_nodes,
            report.total_references,
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_is_changed() {
        let detector = ChangeDetector::new();
        assert!(detector.is_changed("foo.rs", b"fn main() {}"));
    }

    #[test]
    fn same_content_not_changed() {
        let mut detector = ChangeDetector::new();
        let content = b"fn main() {}";
        detector.update_hash("foo.rs", content);
        assert!(!detector.is_changed("foo.rs", content));
    }

    #[test]
    fn remove_hash_makes_changed_again() {
        let mut detector = ChangeDetector::new();
        detector.update_hash("foo.rs", b"content");
        detector.remove_hash("foo.rs");
        assert!(detector.is_changed("foo.rs", b"content"));
        assert_eq!(detector.tracked_count(), 0);
    }

    #[test]
    fn second_sync_of_unchanged_file_is_skipped() {
        let mut pipeline = SyncPipeline::new(MemorySink::new());
        let source = b"pub fn hello() {}".to_vec();

        let first = pipeline.sync_file("lib.rs", &source).unwrap();
        assert!(matches!(first, SyncOutcome::Indexed { nodes, .. } if nodes > 0));

        let second = pipeline.sync_file("lib.rs", &source).unwrap();
        assert_eq!(second, SyncOutcome::Skipped);

        let third = pipeline.sync_file("lib.rs", b"pub fn hello() { todo!() }").unwrap();
        assert!(matches!(third, SyncOutcome::Indexed { .. }));
    }

    #[test]
    fn replace_semantics_in_sink() {
        let mut pipeline = SyncPipeline::new(MemorySink::new());
        pipeline
            .sync_file("a.py", b"def one(): pass\ndef two(): pass\n")
            .unwrap();
        assert_eq!(pipeline.sink().batch("a.py").unwrap().nodes.len(), 2);

        pipeline.sync_file("a.py", b"def one(): pass\n").unwrap();
        assert_eq!(pipeline.sink().batch("a.py").unwrap().nodes.len(), 1);
    }

    #[test]
    fn unsupported_file_fails_without_touching_sink() {
        let mut pipeline = SyncPipeline::new(MemorySink::new());
        let outcome = pipeline.sync_file("notes.txt", b"plain text").unwrap();
        assert_eq!(outcome, SyncOutcome::Failed);
        assert!(pipeline.sink().batch("notes.txt").is_none());
        // Failed files are not hashed, so they are retried next sync.
        assert_eq!(pipeline.change_detector().tracked_count(), 0);
    }

    #[test]
    fn remove_file_clears_sink_and_hashes() {
        let mut pipeline = SyncPipeline::new(MemorySink::new());
        pipeline.sync_file("lib.rs", b"pub fn f() {}").unwrap();
        assert_eq!(pipeline.sink().file_count(), 1);

        pipeline.remove_file("lib.rs").unwrap();
        assert_eq!(pipeline.sink().file_count(), 0);
        assert_eq!(pipeline.change_detector().tracked_count(), 0);
    }

    #[test]
    fn sync_many_aggregates_counts() {
        let mut pipeline = SyncPipeline::new(MemorySink::new());
        let files = vec![
            ("a.rs".to_string(), b"pub fn a() {}".to_vec()),
            ("b.go".to_string(), b"package main\nfunc B() {}\n".to_vec()),
            ("skip.txt".to_string(), b"nope".to_vec()),
        ];
        let report = pipeline.sync_many(files.clone()).unwrap();
        assert_eq!(report.files_seen, 3);
        assert_eq!(report.files_indexed, 2);
        assert_eq!(report.files_failed, 1);
        assert!(report.total_nodes >= 2);

        let again = pipeline.sync_many(files).unwrap();
        assert_eq!(again.files_skipped, 2);
        assert_eq!(again.files_failed, 1);
    }

    #[test]
    fn file_record_carries_hash_and_line_count() {
        let mut pipeline = SyncPipeline::new(MemorySink::new());
        pipeline.sync_file("lib.rs", b"pub fn a() {}\npub fn b() {}\n").unwrap();

        let batch = pipeline.sink().batch("lib.rs").unwrap();
        assert_eq!(batch.file.content_hash.len(), 64);
        assert_eq!(batch.file.line_count, 3);
        assert_eq!(batch.file.language, symgraph_core::Language::Rust);
    }
}
