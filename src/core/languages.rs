//! Language code to display name lookup

use std::collections::BTreeMap;

/// Languages the translator ships with
const DEFAULT_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("ca", "Catalan"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fil", "Filipino"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("km", "Khmer"),
    ("ko", "Korean"),
    ("lo", "Lao"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("ms", "Malay"),
    ("my", "Burmese"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sv", "Swedish"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

/// Read-only language registry, injected wherever names are displayed
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    names: BTreeMap<String, String>,
}

impl LanguageRegistry {
    /// Registry with the built-in language table
    pub fn builtin() -> Self {
        Self::from_pairs(DEFAULT_LANGUAGES.iter().copied())
    }

    /// Registry from arbitrary (code, name) pairs
    pub fn from_pairs<I, C, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        }
    }

    /// Human name for a code; unknown codes fall back to the code itself
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.names.get(code).map(String::as_str).unwrap_or(code)
    }

    /// `"French (fr)"` style label used in reports
    pub fn label(&self, code: &str) -> String {
        format!("{} ({})", self.display_name(code), code)
    }

    /// All known codes, sorted
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Every known code except `source`
    pub fn targets_excluding(&self, source: &str) -> Vec<String> {
        self.codes()
            .filter(|code| *code != source)
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(registry.display_name("fr"), "French");
        assert_eq!(registry.display_name("fil"), "Filipino");
        assert_eq!(registry.label("de"), "German (de)");
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let registry = LanguageRegistry::from_pairs([("fr", "French")]);
        assert_eq!(registry.display_name("xx"), "xx");
        assert_eq!(registry.label("xx"), "xx (xx)");
    }

    #[test]
    fn test_targets_exclude_source() {
        let registry = LanguageRegistry::builtin();
        let targets = registry.targets_excluding("en");
        assert_eq!(targets.len(), registry.len() - 1);
        assert!(!targets.iter().any(|code| code == "en"));
    }
}
