use futures::future::join_all;
use tracing::{info, warn};

use crate::api::{NewsApi, Preview};
use crate::articles::Article;
use crate::error::ChatError;

/// Outcome of the preview lookup for one slot of the batch
#[derive(Debug)]
pub enum PreviewOutcome {
    /// Article has no url; nothing was requested.
    Skipped,
    Fetched(Preview),
    Failed(ChatError),
}

/// Request one preview per article with a url, all at once, and wait for every one.
/// The returned outcomes line up with `articles` by index.
pub async fn fetch_previews(api: &dyn NewsApi, articles: &[Article]) -> Vec<PreviewOutcome> {
    let tasks = articles.iter().map(|article| async move {
        if !article.has_url() {
            return PreviewOutcome::Skipped;
        }
        match api.preview(&article.url).await {
            Ok(preview) => PreviewOutcome::Fetched(preview),
            Err(e) => PreviewOutcome::Failed(ChatError::PreviewUnavailable {
                url: article.url.clone(),
                reason: format!("{:#}", e),
            }),
        }
    });
    join_all(tasks).await
}

/// Write each fetched preview back into its own slot. Failures leave the
/// article as normalized.
pub fn merge_previews(articles: &mut [Article], outcomes: Vec<PreviewOutcome>) -> usize {
    let mut enriched = 0;
    for (article, outcome) in articles.iter_mut().zip(outcomes) {
        match outcome {
            PreviewOutcome::Fetched(preview) => {
                article.apply_preview(preview);
                enriched += 1;
            }
            PreviewOutcome::Failed(e) => {
                warn!(article_id = %article.id, "enrichment: {}", e);
            }
            PreviewOutcome::Skipped => {}
        }
    }
    enriched
}

/// Fan out preview requests for a normalized batch and fold the results in.
pub async fn enrich_articles(api: &dyn NewsApi, mut articles: Vec<Article>) -> Vec<Article> {
    let requested = articles.iter().filter(|a| a.has_url()).count();
    if requested == 0 {
        return articles;
    }
    let outcomes = fetch_previews(api, &articles).await;
    let enriched = merge_previews(&mut articles, outcomes);
    info!("enrichment: {}/{} previews applied", enriched, requested);
    articles
}
