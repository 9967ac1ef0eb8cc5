//! Web search collaborator
//!
//! Agents enrich their prompts with search snippets. Search is advisory: a
//! failed call must never sink an analysis, so the trait is infallible and
//! implementations absorb every transport or decode error into an empty
//! result list.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const EXA_API_URL: &str = "https://api.exa.ai/search";

/// One ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Trait for the search collaborator. Never fails: on any internal error the
/// implementation returns an empty list.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        max_snippet_chars: usize,
    ) -> Vec<SearchHit>;
}

/// Exa search client (connection-pooled).
pub struct ExaSearch {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ExaSearch {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: EXA_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn search_inner(
        &self,
        query: &str,
        max_results: usize,
        max_snippet_chars: usize,
    ) -> Result<Vec<SearchHit>, reqwest::Error> {
        let request = ExaRequest {
            query: query.to_string(),
            num_results: max_results,
            use_autoprompt: true,
            contents: ExaContents {
                text: ExaText {
                    max_characters: max_snippet_chars,
                },
            },
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: ExaResponse = response.json().await?;

        let hits = body
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                title: r.title.unwrap_or_default(),
                url: r.url,
                snippet: truncate_chars(&r.text.unwrap_or_default(), max_snippet_chars),
            })
            .collect();

        Ok(hits)
    }
}

#[async_trait]
impl SearchProvider for ExaSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        max_snippet_chars: usize,
    ) -> Vec<SearchHit> {
        match self.search_inner(query, max_results, max_snippet_chars).await {
            Ok(hits) => {
                debug!(query, hits = hits.len(), "Exa search completed");
                hits
            }
            Err(e) => {
                warn!(query, "Exa search failed, continuing without results: {}", e);
                vec![]
            }
        }
    }
}

/// Search stub returning no results, for development & testing.
pub struct NullSearch;

#[async_trait]
impl SearchProvider for NullSearch {
    async fn search(&self, _query: &str, _max_results: usize, _max_snippet_chars: usize) -> Vec<SearchHit> {
        vec![]
    }
}

/// Cap a snippet at `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaRequest {
    query: String,
    num_results: usize,
    use_autoprompt: bool,
    contents: ExaContents,
}

#[derive(Debug, Serialize)]
struct ExaContents {
    text: ExaText,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaText {
    max_characters: usize,
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
struct ExaResult {
    #[serde(default)]
    title: Option<String>,
    url: String,
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_exa_shape() {
        let request = ExaRequest {
            query: "Joe's Pizza Brooklyn business information".to_string(),
            num_results: 3,
            use_autoprompt: true,
            contents: ExaContents {
                text: ExaText {
                    max_characters: 1000,
                },
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["numResults"], 3);
        assert_eq!(json["useAutoprompt"], true);
        assert_eq!(json["contents"]["text"]["maxCharacters"], 1000);
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let json = r#"{"results": [{"url": "https://example.com"}]}"#;
        let response: ExaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert!(response.results[0].title.is_none());
    }

    #[test]
    fn snippets_are_capped() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[tokio::test]
    async fn null_search_returns_empty() {
        let hits = NullSearch.search("anything", 5, 500).await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_empty_not_error() {
        let search = ExaSearch::new("key".to_string())
            .with_base_url("http://127.0.0.1:1/search".to_string());
        let hits = search.search("anything", 3, 500).await;
        assert!(hits.is_empty());
    }
}
