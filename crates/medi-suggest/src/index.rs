//! Pure substring filter over a fixed phrase corpus.

use serde::{Deserialize, Serialize};

use crate::corpus;

/// Filter thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Trimmed queries shorter than this (in chars) match nothing.
    pub min_query_chars: usize,
    /// Maximum number of matches returned.
    pub max_matches: usize,
    /// Matches are only worth displaying when there are at least this many.
    pub min_display_matches: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            max_matches: 5,
            min_display_matches: 2,
        }
    }
}

/// Static corpus of candidate phrases with their lowercase forms precomputed.
#[derive(Debug, Clone)]
pub struct SuggestionIndex {
    phrases: Vec<String>,
    folded: Vec<String>,
}

impl Default for SuggestionIndex {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SuggestionIndex {
    /// Index over the built-in prompt corpus.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(corpus::phrases().map(str::to_string))
    }

    /// Index over an arbitrary phrase list; order is preserved.
    pub fn new(phrases: impl IntoIterator<Item = String>) -> Self {
        let phrases: Vec<String> = phrases.into_iter().collect();
        let folded = phrases.iter().map(|phrase| phrase.to_lowercase()).collect();
        Self { phrases, folded }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    /// Phrases containing the trimmed query case-insensitively, in corpus order,
    /// capped at `options.max_matches`.
    ///
    /// Returns nothing when the trimmed query is shorter than
    /// `options.min_query_chars`.
    #[must_use]
    pub fn filter(&self, query: &str, options: FilterOptions) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < options.min_query_chars {
            return Vec::new();
        }

        self.folded
            .iter()
            .zip(&self.phrases)
            .filter(|(folded, _)| folded.contains(&needle))
            .map(|(_, phrase)| phrase.as_str())
            .take(options.max_matches)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("a")]
    #[case("  d  ")]
    #[case("   ")]
    fn short_queries_match_nothing(#[case] query: &str) {
        let index = SuggestionIndex::builtin();
        assert!(index.filter(query, FilterOptions::default()).is_empty());
    }

    #[rstest]
    #[case("patients")]
    #[case("PATIENT")]
    #[case("  with ")]
    #[case("fi")]
    #[case("e")]
    #[case("an")]
    fn matches_are_capped_and_contain_query(#[case] query: &str) {
        let index = SuggestionIndex::builtin();
        let needle = query.trim().to_lowercase();
        let matches = index.filter(query, FilterOptions::default());
        assert!(matches.len() <= 5);
        for phrase in matches {
            assert!(phrase.to_lowercase().contains(&needle), "{phrase} !~ {needle}");
        }
    }

    #[test]
    fn diabetes_prefix_finds_phrase() {
        let index = SuggestionIndex::builtin();
        assert_eq!(
            index.filter("diabet", FilterOptions::default()),
            vec!["Find patients with diabetes"]
        );
    }

    #[test]
    fn corpus_order_is_preserved() {
        let index = SuggestionIndex::builtin();
        assert_eq!(
            index.filter("all patients", FilterOptions::default()),
            vec![
                "Find all patients",
                "Show me all patients",
                "List all patients in the system",
                "Get all patients",
                "Fetch all patients",
            ]
        );
    }

    #[test]
    fn custom_cap_is_honoured() {
        let index = SuggestionIndex::builtin();
        let options = FilterOptions {
            max_matches: 2,
            ..FilterOptions::default()
        };
        assert_eq!(index.filter("patients", options).len(), 2);
    }

    #[test]
    fn no_match_returns_empty() {
        let index = SuggestionIndex::builtin();
        assert!(index.filter("zzzz", FilterOptions::default()).is_empty());
    }
}
