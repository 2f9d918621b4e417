//! Web search collaborator
//!
//! Provides web search via configurable providers (Serper, Brave). The
//! dispatcher only sees the [`SearchBackend`] trait, so tests can substitute
//! their own backend.

mod summarize;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub use summarize::{NO_RESULTS_MESSAGE, summarize};

/// Placeholder for a result missing its title
pub const NO_TITLE: &str = "No title";

/// Placeholder for a result missing its snippet
pub const NO_SNIPPET: &str = "No snippet available";

/// One web search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result snippet/description
    pub snippet: String,
    /// Result URL
    pub link: String,
}

/// The search collaborator boundary
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search for `query`, returning at most `max_results` hits in provider
    /// relevance order
    ///
    /// # Errors
    ///
    /// Returns error if the request or response decoding fails
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// Search provider backend
#[derive(Debug, Clone)]
enum Provider {
    /// Serper (Google) Search API
    Serper { api_key: String },
    /// Brave Search API
    Brave { api_key: String },
}

/// Web search over a third-party HTTP API
pub struct WebSearchTool {
    provider: Provider,
    client: reqwest::Client,
}

/// Serper API request body
#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

/// Serper API response
#[derive(Debug, Deserialize)]
struct SerperResponse {
    organic: Option<Vec<SerperHit>>,
}

#[derive(Debug, Deserialize)]
struct SerperHit {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

impl From<SerperHit> for SearchResult {
    fn from(hit: SerperHit) -> Self {
        Self {
            title: hit.title.unwrap_or_else(|| NO_TITLE.to_string()),
            snippet: hit.snippet.unwrap_or_else(|| NO_SNIPPET.to_string()),
            link: hit.link.unwrap_or_default(),
        }
    }
}

/// Brave Search API response
#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWebResults>,
}

#[derive(Debug, Deserialize)]
struct BraveWebResults {
    results: Vec<BraveHit>,
}

#[derive(Debug, Deserialize)]
struct BraveHit {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
}

impl From<BraveHit> for SearchResult {
    fn from(hit: BraveHit) -> Self {
        Self {
            title: hit.title.unwrap_or_else(|| NO_TITLE.to_string()),
            snippet: hit.description.unwrap_or_else(|| NO_SNIPPET.to_string()),
            link: hit.url.unwrap_or_default(),
        }
    }
}

impl WebSearchTool {
    /// Create a new web search tool with Serper
    #[must_use]
    pub fn new_serper(api_key: String) -> Self {
        Self {
            provider: Provider::Serper { api_key },
            client: reqwest::Client::new(),
        }
    }

    /// Create a new web search tool with Brave Search
    #[must_use]
    pub fn new_brave(api_key: String) -> Self {
        Self {
            provider: Provider::Brave { api_key },
            client: reqwest::Client::new(),
        }
    }

    /// Search using the Serper API
    async fn search_serper(
        &self,
        api_key: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .post("https://google.serper.dev/search")
            .header("X-API-KEY", api_key)
            .header("Content-Type", "application/json")
            .json(&SerperRequest {
                q: query,
                num: max_results,
            })
            .send()
            .await?
            .error_for_status()
            .map_err(Error::Http)?;

        let decoded: SerperResponse = response.json().await?;

        let mut results: Vec<SearchResult> = decoded
            .organic
            .unwrap_or_default()
            .into_iter()
            .map(SearchResult::from)
            .collect();
        results.truncate(max_results);

        Ok(results)
    }

    /// Search using the Brave Search API
    async fn search_brave(
        &self,
        api_key: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get("https://api.search.brave.com/res/v1/web/search")
            .header("X-Subscription-Token", api_key)
            .query(&[("q", query), ("count", &max_results.to_string())])
            .send()
            .await?
            .error_for_status()
            .map_err(Error::Http)?;

        let decoded: BraveResponse = response.json().await?;

        let mut results: Vec<SearchResult> = decoded
            .web
            .map(|web| web.results.into_iter().map(SearchResult::from).collect())
            .unwrap_or_default();
        results.truncate(max_results);

        Ok(results)
    }
}

#[async_trait]
impl SearchBackend for WebSearchTool {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        tracing::debug!(query, max_results, "running web search");

        match &self.provider {
            Provider::Serper { api_key } => self.search_serper(api_key, query, max_results).await,
            Provider::Brave { api_key } => self.search_brave(api_key, query, max_results).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_serper_selects_provider() {
        let tool = WebSearchTool::new_serper("test-key".to_string());
        assert!(matches!(tool.provider, Provider::Serper { .. }));
    }

    #[test]
    fn new_brave_selects_provider() {
        let tool = WebSearchTool::new_brave("test-key".to_string());
        assert!(matches!(tool.provider, Provider::Brave { .. }));
    }

    #[test]
    fn serper_hit_missing_fields_get_placeholders() {
        let decoded: SerperResponse = serde_json::from_str(r#"{"organic": [{}]}"#).unwrap();
        let results: Vec<SearchResult> = decoded
            .organic
            .unwrap()
            .into_iter()
            .map(SearchResult::from)
            .collect();

        assert_eq!(results[0].title, NO_TITLE);
        assert_eq!(results[0].snippet, NO_SNIPPET);
        assert_eq!(results[0].link, "");
    }

    #[test]
    fn serper_hit_present_fields_survive() {
        let decoded: SerperResponse = serde_json::from_str(
            r#"{"organic": [{"title": "A", "link": "https://a.example", "snippet": "s"}]}"#,
        )
        .unwrap();
        let result = SearchResult::from(decoded.organic.unwrap().remove(0));

        assert_eq!(result.title, "A");
        assert_eq!(result.snippet, "s");
        assert_eq!(result.link, "https://a.example");
    }

    #[test]
    fn brave_hit_missing_fields_get_placeholders() {
        let decoded: BraveResponse =
            serde_json::from_str(r#"{"web": {"results": [{}]}}"#).unwrap();
        let result = SearchResult::from(decoded.web.unwrap().results.remove(0));

        assert_eq!(result.title, NO_TITLE);
        assert_eq!(result.snippet, NO_SNIPPET);
        assert_eq!(result.link, "");
    }

    #[test]
    fn empty_serper_response_decodes_to_no_results() {
        let decoded: SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.organic.is_none());
    }
}
