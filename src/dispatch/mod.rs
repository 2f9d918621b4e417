//! Response dispatch
//!
//! The decision core: given a transcribed utterance, answer from the FAQ,
//! delegate to web search, or fall back to a default reply. One decision per
//! call, no state retained across calls.

use crate::faq::FaqStore;
use crate::search::{self, SearchBackend};

/// Reply when the search branch triggers but no backend is configured
pub const SEARCH_UNAVAILABLE_REPLY: &str =
    "Web search isn't configured right now, so I can't look that up.";

/// Reply when the search backend fails
pub const SEARCH_FAILED_REPLY: &str = "Sorry, I couldn't find information on that right now.";

/// Prefix that routes an utterance to web search, matched case-insensitively
const SEARCH_PREFIX: &str = "search:";

/// Dispatch tunables
#[derive(Debug, Clone, Copy)]
pub struct DispatchPolicy {
    /// Maximum number of search results to request and summarize
    pub max_results: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self { max_results: 5 }
    }
}

/// Decides how to answer one utterance
///
/// Branch order: FAQ match, then the search trigger, then the default echo
/// reply. The FAQ always outranks search, even when the utterance carries
/// trigger syntax.
pub struct Dispatcher {
    faq: FaqStore,
    search: Option<Box<dyn SearchBackend>>,
    policy: DispatchPolicy,
}

impl Dispatcher {
    /// Create a dispatcher
    ///
    /// `search` is `None` when no provider credential is configured; the
    /// search branch then answers with a fixed unavailability reply.
    #[must_use]
    pub fn new(
        faq: FaqStore,
        search: Option<Box<dyn SearchBackend>>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            faq,
            search,
            policy,
        }
    }

    /// Decide and compose the reply for one utterance
    ///
    /// Never fails: collaborator errors are logged and become user-facing
    /// fallback replies.
    pub async fn respond(&self, utterance: &str) -> String {
        if let Some(answer) = self.faq.best_match(utterance) {
            tracing::debug!("answered from FAQ");
            return answer.to_string();
        }

        if let Some(query) = search_query(utterance) {
            return self.run_search(query).await;
        }

        format!("You said: \"{utterance}\". I don't have an answer for that yet.")
    }

    async fn run_search(&self, query: &str) -> String {
        let Some(backend) = &self.search else {
            tracing::warn!("search triggered but no backend is configured");
            return SEARCH_UNAVAILABLE_REPLY.to_string();
        };

        match backend.search(query, self.policy.max_results).await {
            Ok(results) => search::summarize(&results),
            Err(e) => {
                tracing::warn!(error = %e, query, "web search failed");
                SEARCH_FAILED_REPLY.to_string()
            }
        }
    }
}

/// Extract the search query if the utterance starts with the trigger prefix
///
/// `"search: weather today"` → `Some("weather today")`: the prefix is
/// matched case-insensitively and the remainder is trimmed of surrounding
/// whitespace.
#[must_use]
pub fn search_query(utterance: &str) -> Option<&str> {
    let trimmed = utterance.trim_start();
    let head = trimmed.get(..SEARCH_PREFIX.len())?;

    if head.eq_ignore_ascii_case(SEARCH_PREFIX) {
        Some(trimmed[SEARCH_PREFIX.len()..].trim())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_extracts_trimmed_query() {
        assert_eq!(search_query("search: weather today"), Some("weather today"));
        assert_eq!(search_query("  search:   weather today  "), Some("weather today"));
    }

    #[test]
    fn prefix_is_case_insensitive() {
        assert_eq!(search_query("SEARCH: rust news"), Some("rust news"));
        assert_eq!(search_query("Search:rust news"), Some("rust news"));
    }

    #[test]
    fn non_prefixed_utterances_do_not_trigger() {
        assert!(search_query("tell me about search engines").is_none());
        assert!(search_query("searching for something").is_none());
        assert!(search_query("").is_none());
    }

    #[test]
    fn bare_prefix_yields_empty_query() {
        assert_eq!(search_query("search:"), Some(""));
    }

    #[test]
    fn short_utterances_do_not_panic() {
        assert!(search_query("hi").is_none());
        assert!(search_query("héllo").is_none());
    }
}
