use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Preview, RawArticle};

pub const NO_DESCRIPTION: &str = "No description available";
pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Enriched article card shown in the side panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    /// Empty when the search result had no link; such articles are never enriched.
    pub url: String,
    pub image_url: String,
    pub published_at: DateTime<Utc>,
    #[serde(skip)]
    enriched: bool,
}

impl Article {
    /// Build a card from a raw search record, applying every field fallback.
    pub fn from_raw(raw: RawArticle, id: String, ingested_at: DateTime<Utc>, placeholder_image: &str) -> Self {
        let description = non_empty(raw.description)
            .or_else(|| non_empty(raw.summary))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        let published_at = non_empty(raw.published_date)
            .and_then(|d| parse_published(&d))
            .unwrap_or(ingested_at);

        Self {
            id,
            title: non_empty(raw.title).unwrap_or_else(|| UNTITLED.to_string()),
            description,
            source: non_empty(raw.source).unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            url: non_empty(raw.url).unwrap_or_default(),
            image_url: non_empty(raw.image_url).unwrap_or_else(|| placeholder_image.to_string()),
            published_at,
            enriched: false,
        }
    }

    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn is_enriched(&self) -> bool {
        self.enriched
    }

    /// Overlay preview data. Only the first call has any effect; blank preview
    /// fields leave the current values in place.
    pub fn apply_preview(&mut self, preview: Preview) {
        if self.enriched {
            return;
        }
        self.enriched = true;
        if let Some(image) = non_empty(preview.image) {
            self.image_url = image;
        }
        if let Some(text) = non_empty(preview.preview_text) {
            self.description = text;
        }
    }
}

/// Append-only collection backing the article panel.
#[derive(Debug, Default, Clone)]
pub struct ArticleStore {
    articles: Vec<Article>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Concatenate a batch after the existing cards.
    pub fn extend(&mut self, batch: Vec<Article>) {
        self.articles.extend(batch);
    }

    /// Index of the card with this id, for scroll-to.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.articles.iter().position(|a| a.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Backends hand out RFC 3339 (search API), RFC 2822 (RSS) or bare SQL-ish dates.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
