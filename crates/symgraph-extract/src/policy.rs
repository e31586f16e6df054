//! Static extraction policies, one per language.
//!
//! A policy declares which CST node types represent functions, classes,
//! methods, interfaces, structs, enums, imports, and calls; which fields
//! yield name, body, parameters, and return type; and optional extractors
//! for visibility, exportedness, asyncness, and staticness. The generic
//! walker is entirely driven by this table; only Swift and Kotlin carry
//! bespoke walkers on top of it.

use symgraph_core::{Language, NodeKind, Visibility};
use tree_sitter::Node as TsNode;

use crate::cst;

/// Boolean attribute extractor (async, static, exported).
pub type FlagFn = for<'t> fn(TsNode<'t>, &[u8]) -> bool;
/// Visibility extractor; `None` falls back to the policy default.
pub type VisibilityFn = for<'t> fn(TsNode<'t>, &[u8]) -> Option<Visibility>;

/// Extraction policy for one language.
pub struct LanguagePolicy {
    pub function_types: &'static [&'static str],
    pub class_types: &'static [&'static str],
    pub method_types: &'static [&'static str],
    pub interface_types: &'static [&'static str],
    pub struct_types: &'static [&'static str],
    pub enum_types: &'static [&'static str],
    pub import_types: &'static [&'static str],
    pub call_types: &'static [&'static str],
    /// Node types that push a qualification scope without emitting a node
    /// (Rust `impl_item`).
    pub scope_types: &'static [&'static str],

    pub name_field: &'static str,
    pub body_field: &'static str,
    pub params_field: Option<&'static str>,
    pub return_field: Option<&'static str>,
    /// Joiner between the parameter and return slices of a signature.
    pub signature_joiner: &'static str,
    /// Put the return type before the parameters (Java-style leading type).
    pub return_leading: bool,

    /// Node kind emitted for `interface_types` (`trait` for Rust).
    pub interface_kind: NodeKind,
    pub default_visibility: Option<Visibility>,

    pub visibility: Option<VisibilityFn>,
    pub exported: Option<FlagFn>,
    pub is_async: Option<FlagFn>,
    pub is_static: Option<FlagFn>,
}

/// Look up the policy for a language. TSX and JSX alias the TS/JS policies.
pub fn policy_for(language: Language) -> Option<&'static LanguagePolicy> {
    match language {
        Language::TypeScript | Language::Tsx => Some(&TYPESCRIPT),
        Language::JavaScript | Language::Jsx => Some(&JAVASCRIPT),
        Language::Python => Some(&PYTHON),
        Language::Go => Some(&GO),
        Language::Rust => Some(&RUST),
        Language::Java => Some(&JAVA),
        Language::C => Some(&C),
        Language::Cpp => Some(&CPP),
        Language::CSharp => Some(&CSHARP),
        Language::Php => Some(&PHP),
        Language::Ruby => Some(&RUBY),
        Language::Swift => Some(&SWIFT),
        Language::Kotlin => Some(&KOTLIN),
        Language::Liquid | Language::Unknown => None,
    }
}

// ── Attribute extractors ────────────────────────────────────────────────────

fn ts_visibility(node: TsNode, source: &[u8]) -> Option<Visibility> {
    let modifier = cst::find_child(node, "accessibility_modifier")?;
    match cst::text(modifier, source).as_str() {
        "public" => Some(Visibility::Public),
        "private" => Some(Visibility::Private),
        "protected" => Some(Visibility::Protected),
        _ => None,
    }
}

fn ts_exported(node: TsNode, _source: &[u8]) -> bool {
    node.parent()
        .is_some_and(|parent| parent.kind() == "export_statement")
}

fn has_async_token(node: TsNode, _source: &[u8]) -> bool {
    cst::has_token(node, "async")
}

fn has_static_token(node: TsNode, _source: &[u8]) -> bool {
    cst::has_token(node, "static")
}

fn rust_visibility(node: TsNode, source: &[u8]) -> Option<Visibility> {
    let modifier = cst::find_child(node, "visibility_modifier")?;
    let text = cst::text(modifier, source);
    if text == "pub" {
        Some(Visibility::Public)
    } else if text.starts_with("pub(") {
        Some(Visibility::Internal)
    } else {
        None
    }
}

fn rust_async(node: TsNode, _source: &[u8]) -> bool {
    cst::has_token_deep(node, "async")
}

fn go_exported(node: TsNode, source: &[u8]) -> bool {
    node.child_by_field_name("name")
        .map(|name| cst::text(name, source))
        .is_some_and(|name| name.chars().next().is_some_and(char::is_uppercase))
}

fn modifier_visibility(node: TsNode, source: &[u8]) -> Option<Visibility> {
    let tokens = cst::modifier_tokens(node, source);
    if tokens.iter().any(|t| t == "private") {
        Some(Visibility::Private)
    } else if tokens.iter().any(|t| t == "protected") {
        Some(Visibility::Protected)
    } else if tokens.iter().any(|t| t == "public") {
        Some(Visibility::Public)
    } else if tokens.iter().any(|t| t == "internal") {
        Some(Visibility::Internal)
    } else {
        None
    }
}

fn modifier_static(node: TsNode, source: &[u8]) -> bool {
    cst::modifier_tokens(node, source).iter().any(|t| t == "static")
}

fn modifier_async(node: TsNode, source: &[u8]) -> bool {
    cst::modifier_tokens(node, source).iter().any(|t| t == "async")
}

fn php_visibility(node: TsNode, source: &[u8]) -> Option<Visibility> {
    let modifier = cst::find_child(node, "visibility_modifier")?;
    match cst::text(modifier, source).as_str() {
        "public" => Some(Visibility::Public),
        "private" => Some(Visibility::Private),
        "protected" => Some(Visibility::Protected),
        _ => None,
    }
}

fn php_static(node: TsNode, _source: &[u8]) -> bool {
    cst::find_child(node, "static_modifier").is_some()
}

// ── Policies ────────────────────────────────────────────────────────────────

static TYPESCRIPT: LanguagePolicy = LanguagePolicy {
    function_types: &["function_declaration", "generator_function_declaration"],
    class_types: &["class_declaration"],
    method_types: &["method_definition", "public_field_definition"],
    interface_types: &["interface_declaration"],
    struct_types: &[],
    enum_types: &["enum_declaration"],
    import_types: &["import_statement"],
    call_types: &["call_expression"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: Some("return_type"),
    signature_joiner: ": ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: Some(ts_visibility),
    exported: Some(ts_exported),
    is_async: Some(has_async_token),
    is_static: Some(has_static_token),
};

static JAVASCRIPT: LanguagePolicy = LanguagePolicy {
    function_types: &["function_declaration", "generator_function_declaration"],
    class_types: &["class_declaration"],
    method_types: &["method_definition", "field_definition"],
    interface_types: &[],
    struct_types: &[],
    enum_types: &[],
    import_types: &["import_statement"],
    call_types: &["call_expression"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: None,
    signature_joiner: ": ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: None,
    exported: Some(ts_exported),
    is_async: Some(has_async_token),
    is_static: Some(has_static_token),
};

static PYTHON: LanguagePolicy = LanguagePolicy {
    function_types: &["function_definition"],
    class_types: &["class_definition"],
    method_types: &["function_definition"],
    interface_types: &[],
    struct_types: &[],
    enum_types: &[],
    import_types: &["import_statement", "import_from_statement"],
    call_types: &["call"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: Some("return_type"),
    signature_joiner: " -> ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: None,
    exported: None,
    is_async: Some(has_async_token),
    is_static: None,
};

static GO: LanguagePolicy = LanguagePolicy {
    function_types: &["function_declaration"],
    class_types: &[],
    method_types: &["method_declaration"],
    interface_types: &["interface_type"],
    struct_types: &["struct_type"],
    enum_types: &[],
    import_types: &["import_declaration"],
    call_types: &["call_expression"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: Some("result"),
    signature_joiner: " ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: None,
    exported: Some(go_exported),
    is_async: None,
    is_static: None,
};

static RUST: LanguagePolicy = LanguagePolicy {
    function_types: &["function_item"],
    class_types: &[],
    method_types: &["function_item"],
    interface_types: &["trait_item"],
    struct_types: &["struct_item"],
    enum_types: &["enum_item"],
    import_types: &["use_declaration"],
    call_types: &["call_expression"],
    scope_types: &["impl_item"],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: Some("return_type"),
    signature_joiner: " -> ",
    return_leading: false,
    interface_kind: NodeKind::Trait,
    default_visibility: Some(Visibility::Private),
    visibility: Some(rust_visibility),
    exported: None,
    is_async: Some(rust_async),
    is_static: None,
};

static JAVA: LanguagePolicy = LanguagePolicy {
    // Java has no free functions; the top-level function branch never fires.
    function_types: &[],
    class_types: &["class_declaration"],
    method_types: &["method_declaration", "constructor_declaration"],
    interface_types: &["interface_declaration"],
    struct_types: &[],
    enum_types: &["enum_declaration"],
    import_types: &["import_declaration"],
    call_types: &["method_invocation"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: Some("type"),
    signature_joiner: " ",
    return_leading: true,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: Some(modifier_visibility),
    exported: None,
    is_async: None,
    is_static: Some(modifier_static),
};

static C: LanguagePolicy = LanguagePolicy {
    function_types: &["function_definition"],
    class_types: &[],
    method_types: &[],
    interface_types: &[],
    struct_types: &["struct_specifier"],
    enum_types: &["enum_specifier"],
    import_types: &["preproc_include"],
    call_types: &["call_expression"],
    scope_types: &[],
    name_field: "declarator",
    body_field: "body",
    params_field: None,
    return_field: None,
    signature_joiner: " ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: None,
    exported: None,
    is_async: None,
    is_static: None,
};

static CPP: LanguagePolicy = LanguagePolicy {
    function_types: &["function_definition"],
    class_types: &["class_specifier"],
    method_types: &["function_definition"],
    interface_types: &[],
    struct_types: &["struct_specifier"],
    enum_types: &["enum_specifier"],
    import_types: &["preproc_include"],
    call_types: &["call_expression"],
    scope_types: &[],
    name_field: "declarator",
    body_field: "body",
    params_field: None,
    return_field: None,
    signature_joiner: " ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: None,
    exported: None,
    is_async: None,
    is_static: None,
};

static CSHARP: LanguagePolicy = LanguagePolicy {
    function_types: &[],
    class_types: &["class_declaration"],
    method_types: &["method_declaration", "constructor_declaration"],
    interface_types: &["interface_declaration"],
    struct_types: &["struct_declaration"],
    enum_types: &["enum_declaration"],
    import_types: &["using_directive"],
    call_types: &["invocation_expression"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: Some("returns"),
    signature_joiner: " ",
    return_leading: true,
    interface_kind: NodeKind::Interface,
    default_visibility: Some(Visibility::Internal),
    visibility: Some(modifier_visibility),
    exported: None,
    is_async: Some(modifier_async),
    is_static: Some(modifier_static),
};

static PHP: LanguagePolicy = LanguagePolicy {
    function_types: &["function_definition"],
    class_types: &["class_declaration"],
    method_types: &["method_declaration"],
    interface_types: &["interface_declaration"],
    struct_types: &[],
    enum_types: &["enum_declaration"],
    import_types: &["namespace_use_declaration"],
    call_types: &[
        "function_call_expression",
        "member_call_expression",
        "scoped_call_expression",
    ],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: Some("return_type"),
    signature_joiner: ": ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: Some(Visibility::Public),
    visibility: Some(php_visibility),
    exported: None,
    is_async: None,
    is_static: Some(php_static),
};

static RUBY: LanguagePolicy = LanguagePolicy {
    function_types: &["method"],
    class_types: &["class"],
    method_types: &["method", "singleton_method"],
    interface_types: &[],
    struct_types: &[],
    enum_types: &[],
    import_types: &[],
    call_types: &["call", "method_call"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: Some("parameters"),
    return_field: None,
    signature_joiner: " ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: None,
    visibility: None,
    exported: None,
    is_async: None,
    is_static: None,
};

// Swift and Kotlin keep their structural type sets empty: the dialect
// walkers own those node types. Imports and calls still flow through the
// generic dispatch.
static SWIFT: LanguagePolicy = LanguagePolicy {
    function_types: &[],
    class_types: &[],
    method_types: &[],
    interface_types: &[],
    struct_types: &[],
    enum_types: &[],
    import_types: &["import_declaration"],
    call_types: &["call_expression"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: None,
    return_field: None,
    signature_joiner: " -> ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: Some(Visibility::Internal),
    visibility: None,
    exported: None,
    is_async: None,
    is_static: None,
};

static KOTLIN: LanguagePolicy = LanguagePolicy {
    function_types: &[],
    class_types: &[],
    method_types: &[],
    interface_types: &[],
    struct_types: &[],
    enum_types: &[],
    import_types: &["import_header", "import"],
    call_types: &["call_expression"],
    scope_types: &[],
    name_field: "name",
    body_field: "body",
    params_field: None,
    return_field: None,
    signature_joiner: ": ",
    return_leading: false,
    interface_kind: NodeKind::Interface,
    default_visibility: Some(Visibility::Public),
    visibility: None,
    exported: None,
    is_async: None,
    is_static: None,
};
