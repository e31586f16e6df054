//! symgraph-extract: Tree-sitter based extraction of a code knowledge graph.
//!
//! Parses source files across thirteen language dialects and emits typed
//! symbol nodes (functions, classes, methods, interfaces, structs, enums, …),
//! containment edges, and unresolved by-name references for a downstream
//! linking pass. Node identity is stable across re-extractions, and the sync
//! pipeline skips unchanged files by SHA-256 content hash.
//!
//! # Architecture
//!
//! - **registry** — file path → language tag detection, supported-language set
//! - **parser** — warm tree-sitter parser per language behind a lock
//! - **policy** — static per-language extraction policies (type sets, field
//!   names, attribute extractors)
//! - **walker** — generic depth-first CST walker driven by the policy table
//! - **languages** — bespoke Swift and Kotlin walkers plus the pattern-based
//!   Liquid extractor
//! - **extractor** — entry point mapping `(path, bytes)` to an
//!   `ExtractionResult`; never throws
//! - **pipeline** — incremental sync with change detection and a sink trait

mod cst;
pub mod extractor;
pub mod languages;
pub mod parser;
pub mod pipeline;
pub mod policy;
pub mod registry;
pub mod walker;

pub use extractor::Extractor;
pub use parser::ParserPool;
pub use pipeline::{
    ChangeDetector, FileBatch, GraphSink, MemorySink, SyncOutcome, SyncPipeline, SyncReport,
};
pub use policy::{policy_for, LanguagePolicy};
pub use registry::{detect_language, is_supported, supported_languages};
pub use walker::Walker;
