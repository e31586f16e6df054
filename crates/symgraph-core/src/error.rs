/// Unified error type for symgraph.
#[derive(Debug, thiserror::Error)]
pub enum SymgraphError {
    #[error("Unsupported language `{language}` for {path}")]
    UnsupportedLanguage { path: String, language: String },

    #[error("Parse failure in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid node kind: {0}")]
    InvalidNodeKind(String),

    #[error("Invalid language tag: {0}")]
    InvalidLanguage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
