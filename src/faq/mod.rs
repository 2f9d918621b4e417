//! FAQ store
//!
//! Loads a static question → answer table and serves fuzzy lookups against
//! it. The table is read once at startup and never mutated.

mod similarity;

use std::collections::BTreeMap;
use std::path::Path;

pub use similarity::{SequenceRatio, SimilarityScorer};

/// Default similarity cutoff for accepting a fuzzy match
pub const DEFAULT_CUTOFF: f32 = 0.85;

/// Static question → answer table with fuzzy lookup
pub struct FaqStore {
    entries: Vec<(String, String)>,
    cutoff: f32,
    scorer: Box<dyn SimilarityScorer>,
}

impl FaqStore {
    /// Load a FAQ table from a JSON object file (`{"question": "answer"}`)
    ///
    /// Missing or unparsable files are not fatal: a warning is logged and an
    /// empty store is returned, so a broken FAQ degrades to search/default
    /// replies instead of aborting startup.
    #[must_use]
    pub fn load(path: &Path, cutoff: f32) -> Self {
        let table = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(table) => {
                    tracing::info!(
                        path = %path.display(),
                        entries = table.len(),
                        "loaded FAQ table"
                    );
                    table
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse FAQ table, continuing with an empty one"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read FAQ table, continuing with an empty one"
                );
                BTreeMap::new()
            }
        };

        Self::from_table(table, cutoff)
    }

    /// Build a store from an in-memory table
    #[must_use]
    pub fn from_table(table: BTreeMap<String, String>, cutoff: f32) -> Self {
        let entries = table
            .into_iter()
            .map(|(question, answer)| (question.trim().to_string(), answer))
            .collect();

        Self {
            entries,
            cutoff,
            scorer: Box::new(SequenceRatio),
        }
    }

    /// Swap in a different similarity scorer
    #[must_use]
    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answer for the best-matching question at or above the cutoff
    ///
    /// Scoring is case-insensitive. Ranking keeps the first strictly-best
    /// key in table order (keys are sorted), so equal scores resolve to the
    /// same entry on every call.
    #[must_use]
    pub fn best_match(&self, utterance: &str) -> Option<&str> {
        let needle = utterance.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<(f32, &str)> = None;
        for (question, answer) in &self.entries {
            let score = self.scorer.score(&needle, &question.to_lowercase());
            if score >= self.cutoff && best.is_none_or(|(s, _)| score > s) {
                best = Some((score, answer));
            }
        }

        best.map(|(_, answer)| answer)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn store(pairs: &[(&str, &str)], cutoff: f32) -> FaqStore {
        let table = pairs
            .iter()
            .map(|(q, a)| ((*q).to_string(), (*a).to_string()))
            .collect();
        FaqStore::from_table(table, cutoff)
    }

    #[test]
    fn missing_file_yields_empty_store() {
        let faq = FaqStore::load(Path::new("/nonexistent/faq.json"), DEFAULT_CUTOFF);
        assert!(faq.is_empty());
        assert!(faq.best_match("anything").is_none());
    }

    #[test]
    fn malformed_file_yields_empty_store() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let faq = FaqStore::load(file.path(), DEFAULT_CUTOFF);
        assert!(faq.is_empty());
    }

    #[test]
    fn loads_json_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"what is aria": "A voice assistant."}}"#).unwrap();

        let faq = FaqStore::load(file.path(), DEFAULT_CUTOFF);
        assert_eq!(faq.len(), 1);
        assert_eq!(faq.best_match("what is aria"), Some("A voice assistant."));
    }

    #[test]
    fn exact_match_returns_answer() {
        let faq = store(&[("hello", "hi there")], DEFAULT_CUTOFF);
        assert_eq!(faq.best_match("hello"), Some("hi there"));
    }

    #[test]
    fn match_is_case_insensitive() {
        let faq = store(&[("hello", "hi there")], DEFAULT_CUTOFF);
        assert_eq!(faq.best_match("HELLO"), Some("hi there"));
    }

    #[test]
    fn one_edit_matches_at_default_cutoff() {
        // "helo" vs "hello" scores 8/9 ≈ 0.889
        let faq = store(&[("hello", "hi there")], DEFAULT_CUTOFF);
        assert_eq!(faq.best_match("helo"), Some("hi there"));
    }

    #[test]
    fn one_edit_misses_at_strict_cutoff() {
        let faq = store(&[("hello", "hi there")], 0.9);
        assert!(faq.best_match("helo").is_none());
    }

    #[test]
    fn unrelated_utterance_misses() {
        let faq = store(&[("hello", "hi there")], DEFAULT_CUTOFF);
        assert!(faq.best_match("what is the weather").is_none());
    }

    #[test]
    fn empty_utterance_misses() {
        let faq = store(&[("hello", "hi there")], DEFAULT_CUTOFF);
        assert!(faq.best_match("   ").is_none());
    }

    #[test]
    fn tied_scores_resolve_to_first_key() {
        // both keys score 0.8 against "aa"; "aax" sorts first
        let faq = store(&[("aay", "second"), ("aax", "first")], 0.8);
        assert_eq!(faq.best_match("aa"), Some("first"));
    }

    #[test]
    fn higher_score_wins_regardless_of_order() {
        let faq = store(&[("aaaa", "close"), ("aaab", "closer")], 0.5);
        assert_eq!(faq.best_match("aaab"), Some("closer"));
    }
}
