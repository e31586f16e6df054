//! Language registry: path → tag detection and the supported-language set.

use symgraph_core::Language;

use crate::policy;

/// Detect the language tag for a file path.
pub fn detect_language(path: &str) -> Language {
    Language::from_path(path)
}

/// A language is supported iff it has a parser and a policy, or is handled
/// by the pattern-based Liquid extractor.
pub fn is_supported(language: Language) -> bool {
    language == Language::Liquid || policy::policy_for(language).is_some()
}

/// All supported language tags, in declaration order.
pub fn supported_languages() -> Vec<Language> {
    [
        Language::TypeScript,
        Language::Tsx,
        Language::JavaScript,
        Language::Jsx,
        Language::Python,
        Language::Go,
        Language::Rust,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Php,
        Language::Ruby,
        Language::Swift,
        Language::Kotlin,
        Language::Liquid,
    ]
    .into_iter()
    .filter(|lang| is_supported(*lang))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_by_extension() {
        assert_eq!(detect_language("payment.ts"), Language::TypeScript);
        assert_eq!(detect_language("Main.kt"), Language::Kotlin);
        assert_eq!(detect_language("index.liquid"), Language::Liquid);
        assert_eq!(detect_language("README"), Language::Unknown);
    }

    #[test]
    fn every_tag_except_unknown_is_supported() {
        let supported = supported_languages();
        assert_eq!(supported.len(), 16);
        assert!(!is_supported(Language::Unknown));
        assert!(is_supported(Language::Liquid));
        assert!(is_supported(Language::Swift));
    }
}
