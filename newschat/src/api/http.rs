use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use common::ApiConfig;

use super::{extract_error_message, Health, NewsApi, Preview, SearchEnvelope, SearchRequest};

/// Non-2xx answer from the backend, with whatever message its body carried.
#[derive(Debug, thiserror::Error)]
#[error("news API error {status}: {}", .message.as_deref().unwrap_or("no message"))]
pub struct ApiStatusError {
    pub status: u16,
    pub message: Option<String>,
}

/// News backend reached over HTTP/JSON
pub struct HttpNewsApi {
    search_url: url::Url,
    preview_url: url::Url,
    health_url: url::Url,
    client: Client,
}

impl HttpNewsApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build reqwest client")?;

        Ok(Self {
            search_url: config.endpoint(&config.search_path)?,
            preview_url: config.endpoint(&config.preview_path)?,
            health_url: config.endpoint(&config.health_path)?,
            client,
        })
    }

    /// Default paths under `base_url`.
    pub fn from_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        })
    }

    pub async fn health(&self) -> Result<Health> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .context("Health HTTP request failed")?;
        let response = ensure_success(response).await?;
        response.json().await.context("Failed to parse health response")
    }
}

#[async_trait::async_trait]
impl NewsApi for HttpNewsApi {
    async fn search(&self, request: &SearchRequest) -> Result<SearchEnvelope> {
        debug!(query = %request.query, url = %self.search_url, "sending search request");
        let response = self
            .client
            .post(self.search_url.clone())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .context("Search HTTP request failed")?;

        let response = ensure_success(response).await?;
        let envelope: SearchEnvelope = response
            .json()
            .await
            .context("Failed to parse search response")?;
        Ok(envelope)
    }

    async fn preview(&self, url: &str) -> Result<Preview> {
        let response = self
            .client
            .get(self.preview_url.clone())
            .query(&[("url", url)])
            .send()
            .await
            .context("Preview HTTP request failed")?;

        let response = ensure_success(response).await?;
        response.json().await.context("Failed to parse preview response")
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiStatusError {
        status: status.as_u16(),
        message: extract_error_message(&body),
    }
    .into())
}
