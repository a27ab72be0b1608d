use async_trait::async_trait;
use std::collections::HashMap;

use coolie_core::{TranslationError, Translator};

/// Word lists keyed by language name ("Hindi", "Tamil", ...).
///
/// Language names are matched case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    languages: HashMap<String, HashMap<String, String>>,
}

impl Default for Dictionary {
    fn default() -> Self {
        let greetings = [
            ("Hindi", "नमस्ते"),
            ("Marathi", "नमस्कार"),
            ("Tamil", "வணக்கம்"),
            ("Bengali", "নমস্কার"),
            ("Gujarati", "નમસ્તે"),
        ];

        let languages = greetings
            .into_iter()
            .map(|(language, hello)| {
                let words = HashMap::from([("hello".to_string(), hello.to_string())]);
                (language.to_lowercase(), words)
            })
            .collect();

        Self { languages }
    }
}

impl Dictionary {
    pub fn new(languages: HashMap<String, HashMap<String, String>>) -> Self {
        let languages = languages
            .into_iter()
            .map(|(language, words)| (language.to_lowercase(), normalize(words)))
            .collect();
        Self { languages }
    }

    /// Built-in word lists with `extra` merged in; entries in `extra` win.
    pub fn with_entries(extra: HashMap<String, HashMap<String, String>>) -> Self {
        let mut dictionary = Self::default();
        for (language, words) in extra {
            dictionary
                .languages
                .entry(language.to_lowercase())
                .or_default()
                .extend(normalize(words));
        }
        dictionary
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Word-for-word substitution. Unknown words and unknown languages pass
    /// through unchanged (lower-cased); whitespace collapses to single spaces.
    pub fn translate(&self, text: &str, language: &str) -> String {
        let lowered = text.to_lowercase();
        let words = self.languages.get(&language.to_lowercase());

        lowered
            .split_whitespace()
            .map(|token| {
                words
                    .and_then(|w| w.get(token))
                    .map(String::as_str)
                    .unwrap_or(token)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Tokens are lower-cased before lookup, so keys must be too.
fn normalize(words: HashMap<String, String>) -> HashMap<String, String> {
    words
        .into_iter()
        .map(|(word, translation)| (word.to_lowercase(), translation))
        .collect()
}

/// [`Translator`] backed by a static [`Dictionary`]; never fails.
#[derive(Debug, Clone, Default)]
pub struct DictionaryTranslator {
    dictionary: Dictionary,
}

impl DictionaryTranslator {
    pub fn new(dictionary: Dictionary) -> Self {
        Self { dictionary }
    }
}

#[async_trait]
impl Translator for DictionaryTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        Ok(self.dictionary.translate(text, target))
    }

    fn provider(&self) -> &'static str {
        "dictionary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_word() {
        let dict = Dictionary::default();
        assert_eq!(dict.translate("Hello", "Hindi"), "नमस्ते");
        assert_eq!(dict.translate("HELLO", "Tamil"), "வணக்கம்");
    }

    #[test]
    fn test_language_name_case_insensitive() {
        let dict = Dictionary::default();
        assert_eq!(dict.translate("hello", "hindi"), "नमस्ते");
        assert_eq!(dict.translate("hello", "BENGALI"), "নমস্কার");
    }

    #[test]
    fn test_unknown_word_passes_through() {
        let dict = Dictionary::default();
        assert_eq!(dict.translate("unknown_word", "Hindi"), "unknown_word");
    }

    #[test]
    fn test_unknown_language_is_identity() {
        let dict = Dictionary::default();
        assert_eq!(dict.translate("Hello there", "Klingon"), "hello there");
    }

    #[test]
    fn test_whitespace_collapses() {
        let dict = Dictionary::default();
        assert_eq!(dict.translate("  hello \t  friend\n", "Marathi"), "नमस्कार friend");
        assert_eq!(dict.translate("   ", "Hindi"), "");
    }

    #[test]
    fn test_extra_entries_merge() {
        let extra = HashMap::from([(
            "Hindi".to_string(),
            HashMap::from([("Porter".to_string(), "कुली".to_string())]),
        )]);
        let dict = Dictionary::with_entries(extra);
        assert_eq!(dict.translate("Hello porter", "Hindi"), "नमस्ते कुली");
    }

    #[tokio::test]
    async fn test_translator_is_total() {
        let translator = DictionaryTranslator::default();
        let out = translator.translate("hello", "auto", "Gujarati").await.unwrap();
        assert_eq!(out, "નમસ્તે");
        assert_eq!(translator.provider(), "dictionary");
    }
}
