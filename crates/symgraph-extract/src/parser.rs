//! Parser gateway: one warm tree-sitter parser per language behind a lock.
//!
//! Parser instances own non-trivial memory (tables, scratch buffers), so they
//! are created lazily and reused across files. The pool is the locked variant
//! of the resource model; callers that extract in parallel should give each
//! worker its own pool.

use std::collections::HashMap;
use std::sync::Mutex;

use symgraph_core::{Language, SymgraphError};
use tree_sitter::{Parser, Tree};

/// Resolve the tree-sitter grammar for a language, if one exists.
pub fn grammar_for(language: Language) -> Option<tree_sitter::Language> {
    let grammar: tree_sitter::Language = match language {
        Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        Language::JavaScript | Language::Jsx => tree_sitter_javascript::LANGUAGE.into(),
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::Go => tree_sitter_go::LANGUAGE.into(),
        Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
        Language::C => tree_sitter_c::LANGUAGE.into(),
        Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
        Language::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        Language::Ruby => tree_sitter_ruby::LANGUAGE.into(),
        Language::Swift => tree_sitter_swift::LANGUAGE.into(),
        Language::Kotlin => tree_sitter_kotlin_ng::LANGUAGE.into(),
        Language::Liquid | Language::Unknown => return None,
    };
    Some(grammar)
}

/// Holds one parser per language, created on first use.
pub struct ParserPool {
    parsers: Mutex<HashMap<Language, Parser>>,
}

impl ParserPool {
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Parse UTF-8 source bytes into a concrete syntax tree.
    ///
    /// Never panics: a missing grammar, a poisoned lock, or a parser that
    /// produces no tree all surface as `SymgraphError::Parse`.
    pub fn parse(&self, path: &str, language: Language, source: &[u8]) -> Result<Tree, SymgraphError> {
        let mut parsers = self.parsers.lock().map_err(|_| SymgraphError::Parse {
            path: path.to_string(),
            message: "parser pool lock poisoned".to_string(),
        })?;

        if !parsers.contains_key(&language) {
            let grammar = grammar_for(language).ok_or_else(|| SymgraphError::Parse {
                path: path.to_string(),
                message: format!("no grammar for language `{language}`"),
            })?;
            let mut parser = Parser::new();
            parser.set_language(&grammar).map_err(|e| SymgraphError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })?;
            parsers.insert(language, parser);
        }

        let parser = parsers
            .get_mut(&language)
            .expect("parser inserted above");
        parser.parse(source, None).ok_or_else(|| SymgraphError::Parse {
            path: path.to_string(),
            message: "parser produced no tree".to_string(),
        })
    }
}

impl Default for ParserPool {
    fn default() -> Self {
        Self::new()
    }
}
