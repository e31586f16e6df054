//! Graph vocabulary: languages, node/edge/reference kinds, and the records
//! emitted by extraction.

use serde::{Deserialize, Serialize};

use crate::SymgraphError;

// ── Languages ───────────────────────────────────────────────────────────────

/// Closed set of language tags the extractor knows about.
///
/// Detection is by file extension only; anything else maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    Python,
    Go,
    Rust,
    Java,
    C,
    Cpp,
    CSharp,
    Php,
    Ruby,
    Swift,
    Kotlin,
    Liquid,
    Unknown,
}

impl Language {
    /// Detect the language from a file path by its extension (case-sensitive,
    /// suffix after the final dot).
    pub fn from_path(path: &str) -> Self {
        let ext = match path.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => return Self::Unknown,
        };
        match ext {
            "ts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            "js" | "mjs" | "cjs" => Self::JavaScript,
            "jsx" => Self::Jsx,
            "py" => Self::Python,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "java" => Self::Java,
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "hpp" => Self::Cpp,
            "cs" => Self::CSharp,
            "php" => Self::Php,
            "rb" => Self::Ruby,
            "swift" => Self::Swift,
            "kt" | "kts" => Self::Kotlin,
            "liquid" => Self::Liquid,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
            Self::Python => "python",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Java => "java",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Liquid => "liquid",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = SymgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "typescript" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "javascript" => Ok(Self::JavaScript),
            "jsx" => Ok(Self::Jsx),
            "python" => Ok(Self::Python),
            "go" => Ok(Self::Go),
            "rust" => Ok(Self::Rust),
            "java" => Ok(Self::Java),
            "c" => Ok(Self::C),
            "cpp" => Ok(Self::Cpp),
            "csharp" => Ok(Self::CSharp),
            "php" => Ok(Self::Php),
            "ruby" => Ok(Self::Ruby),
            "swift" => Ok(Self::Swift),
            "kotlin" => Ok(Self::Kotlin),
            "liquid" => Ok(Self::Liquid),
            "unknown" => Ok(Self::Unknown),
            _ => Err(SymgraphError::InvalidLanguage(s.to_string())),
        }
    }
}

// ── Node kinds ──────────────────────────────────────────────────────────────

/// The kind of an emitted graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Function,
    Method,
    Class,
    Struct,
    Interface,
    Trait,
    Enum,
    EnumMember,
    Property,
    Constant,
    Variable,
    TypeAlias,
    Component,
    Route,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Trait => "trait",
            Self::Enum => "enum",
            Self::EnumMember => "enum_member",
            Self::Property => "property",
            Self::Constant => "constant",
            Self::Variable => "variable",
            Self::TypeAlias => "type_alias",
            Self::Component => "component",
            Self::Route => "route",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = SymgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "function" => Ok(Self::Function),
            "method" => Ok(Self::Method),
            "class" => Ok(Self::Class),
            "struct" => Ok(Self::Struct),
            "interface" => Ok(Self::Interface),
            "trait" => Ok(Self::Trait),
            "enum" => Ok(Self::Enum),
            "enum_member" => Ok(Self::EnumMember),
            "property" => Ok(Self::Property),
            "constant" => Ok(Self::Constant),
            "variable" => Ok(Self::Variable),
            "type_alias" => Ok(Self::TypeAlias),
            "component" => Ok(Self::Component),
            "route" => Ok(Self::Route),
            _ => Err(SymgraphError::InvalidNodeKind(s.to_string())),
        }
    }
}

// ── Edge and reference kinds ────────────────────────────────────────────────

/// The kind of an edge between two graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Contains,
    Calls,
    Imports,
    Extends,
    Implements,
    References,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Contains => "contains",
            Self::Calls => "calls",
            Self::Imports => "imports",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::References => "references",
        };
        f.write_str(s)
    }
}

/// The kind of an unresolved, by-name reference awaiting a linking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Calls,
    Imports,
    Extends,
    Implements,
    References,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Calls => "calls",
            Self::Imports => "imports",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::References => "references",
        };
        f.write_str(s)
    }
}

// ── Visibility ──────────────────────────────────────────────────────────────

/// Visibility of a symbol, normalized across languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Internal,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

// ── Records ─────────────────────────────────────────────────────────────────

/// A symbol node extracted from a source file.
///
/// Lines are 1-based, columns 0-based. `updated_at` is the extraction
/// wall-clock time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub qualified_name: String,
    pub file_path: String,
    pub language: Language,
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exported: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decorators: Option<Vec<String>>,
}

/// A typed edge between two nodes of the same extraction batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
}

/// A by-name reference to a symbol that a later pass resolves against the
/// global graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReference {
    /// Id of the node the reference originates from (or the file-scope
    /// sentinel id for top-level references).
    pub from_node_id: String,
    /// Raw textual name of the target.
    pub name: String,
    pub kind: ReferenceKind,
    pub line: u32,
    pub column: u32,
    /// Unreduced callee text when `name` was narrowed (e.g. the full
    /// `obj.foo` for a member call reduced to `foo`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Severity of a reported extraction problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A problem encountered while extracting one file. Never fatal to the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionError {
    pub message: String,
    pub severity: Severity,
}

/// Everything extracted from a single file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub unresolved_references: Vec<UnresolvedReference>,
    pub errors: Vec<ExtractionError>,
    pub duration_ms: u64,
}

impl ExtractionResult {
    /// An empty result carrying a single error record.
    pub fn from_error(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            errors: vec![ExtractionError {
                message: message.into(),
                severity,
            }],
            ..Self::default()
        }
    }

    /// True if any recorded problem has `Severity::Error`.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.severity == Severity::Error)
    }
}

/// The file entity handed to the downstream sink together with a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: String,
    pub language: Language,
    pub content_hash: String,
    pub line_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_detection_by_extension() {
        assert_eq!(Language::from_path("src/payment.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("app/View.tsx"), Language::Tsx);
        assert_eq!(Language::from_path("lib/util.mjs"), Language::JavaScript);
        assert_eq!(Language::from_path("lib/util.cjs"), Language::JavaScript);
        assert_eq!(Language::from_path("main.py"), Language::Python);
        assert_eq!(Language::from_path("pkg/server.go"), Language::Go);
        assert_eq!(Language::from_path("src/lib.rs"), Language::Rust);
        assert_eq!(Language::from_path("include/api.h"), Language::C);
        assert_eq!(Language::from_path("src/engine.hpp"), Language::Cpp);
        assert_eq!(Language::from_path("App.kts"), Language::Kotlin);
        assert_eq!(Language::from_path("templates/index.liquid"), Language::Liquid);
        assert_eq!(Language::from_path("notes.txt"), Language::Unknown);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            NodeKind::File,
            NodeKind::EnumMember,
            NodeKind::TypeAlias,
            NodeKind::Component,
        ] {
            let parsed: NodeKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn node_serializes_with_camel_case_keys() {
        let node = Node {
            id: "function:abc".into(),
            kind: NodeKind::Function,
            name: "processPayment".into(),
            qualified_name: "payment.ts::processPayment".into(),
            file_path: "payment.ts".into(),
            language: Language::TypeScript,
            start_line: 1,
            end_line: 3,
            start_column: 0,
            end_column: 1,
            updated_at: 0,
            visibility: None,
            is_exported: Some(true),
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: Some("(amount: number): Promise<Receipt>".into()),
            docstring: None,
            decorators: None,
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["qualifiedName"], "payment.ts::processPayment");
        assert_eq!(json["filePath"], "payment.ts");
        assert_eq!(json["startLine"], 1);
        assert_eq!(json["isExported"], true);
        assert_eq!(json["language"], "typescript");
        assert!(json.get("isAsync").is_none());
    }

    #[test]
    fn enum_member_uses_snake_case_value() {
        let json = serde_json::to_value(NodeKind::EnumMember).unwrap();
        assert_eq!(json, "enum_member");
        assert_eq!(NodeKind::EnumMember.to_string(), "enum_member");
    }
}
