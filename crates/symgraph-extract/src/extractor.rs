//! Extraction entry point.
//!
//! Maps `(path, bytes)` to an `ExtractionResult`. Every failure mode becomes
//! an error record in the result; the extractor never throws across its
//! boundary.

use std::time::Instant;

use symgraph_core::{
    ExtractConfig, ExtractionResult, Language, Severity, SymgraphError,
};

use crate::languages::liquid::LiquidExtractor;
use crate::parser::ParserPool;
use crate::policy;
use crate::registry;
use crate::walker::Walker;

pub struct Extractor {
    pool: ParserPool,
    liquid: LiquidExtractor,
    config: ExtractConfig,
}

impl Extractor {
    pub fn new() -> Self {
        Self::with_config(ExtractConfig::default())
    }

    pub fn with_config(config: ExtractConfig) -> Self {
        Self {
            pool: ParserPool::new(),
            liquid: LiquidExtractor::new(),
            config,
        }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract one file. The language is detected from the path unless an
    /// explicit tag is given.
    pub fn extract(
        &self,
        file_path: &str,
        source: &[u8],
        language: Option<Language>,
    ) -> ExtractionResult {
        let started = Instant::now();
        let language = language.unwrap_or_else(|| registry::detect_language(file_path));
        let mut result = self.extract_inner(file_path, source, language);
        result.duration_ms = started.elapsed().as_millis() as u64;
        result
    }

    fn extract_inner(
        &self,
        file_path: &str,
        source: &[u8],
        language: Language,
    ) -> ExtractionResult {
        if source.len() > self.config.max_file_bytes {
            tracing::warn!(
                "Skipping {file_path}: {} bytes exceeds limit of {}",
                source.len(),
                self.config.max_file_bytes
            );
            return ExtractionResult::from_error(
                format!(
                    "file exceeds size limit ({} > {} bytes)",
                    source.len(),
                    self.config.max_file_bytes
                ),
                Severity::Warning,
            );
        }

        if language == Language::Liquid {
            let text = String::from_utf8_lossy(source);
            let updated_at = chrono::Utc::now().timestamp_millis();
            let (nodes, edges, references) = self.liquid.extract(file_path, &text, updated_at);
            return ExtractionResult {
                nodes,
                edges,
                unresolved_references: references,
                errors: Vec::new(),
                duration_ms: 0,
            };
        }

        let Some(policy) = policy::policy_for(language) else {
            let err = SymgraphError::UnsupportedLanguage {
                path: file_path.to_string(),
                language: language.to_string(),
            };
            return ExtractionResult::from_error(err.to_string(), Severity::Error);
        };

        let tree = match self.pool.parse(file_path, language, source) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::warn!("Parse failure: {err}");
                return ExtractionResult::from_error(err.to_string(), Severity::Error);
            }
        };

        let updated_at = chrono::Utc::now().timestamp_millis();
        let mut walker = Walker::new(
            language,
            policy,
            file_path,
            source,
            updated_at,
            self.config.include_docstrings,
        );
        walker.walk(tree.root_node());
        let (nodes, edges, references) = walker.into_parts();

        ExtractionResult {
            nodes,
            edges,
            unresolved_references: references,
            errors: Vec::new(),
            duration_ms: 0,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
