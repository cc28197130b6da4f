use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Core trait for the news backend (search + preview)
#[async_trait::async_trait]
pub trait NewsApi: Send + Sync {
    /// Run the primary search. Non-2xx statuses are errors; the envelope is
    /// returned as-is otherwise, `success = false` included.
    async fn search(&self, request: &SearchRequest) -> Result<SearchEnvelope>;

    /// Fetch image + preview text for one article URL
    async fn preview(&self, url: &str) -> Result<Preview>;
}

/// Body of the primary search call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: u32,
    pub enrich: bool,
    pub parallel: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, options: &common::SearchConfig) -> Self {
        Self {
            query: query.into(),
            max_results: options.max_results,
            enrich: options.enrich,
            parallel: options.parallel,
        }
    }
}

/// Search response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// One search record as the backend sends it; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub source: Option<String>,
    pub published_date: Option<String>,
    pub url: Option<String>,
}

/// Preview response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Preview {
    pub image: Option<String>,
    pub preview_text: Option<String>,
}

/// Backend health report
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Health {
    pub status: String,
    pub agents: Option<serde_json::Value>,
}

pub mod http;

/// Pull a human-readable message out of an error body.
/// FastAPI puts it under `detail`, the envelope under `message`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "message"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()).map(String::from))
}
