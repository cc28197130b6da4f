use std::future::Future;
use std::sync::Arc;

use tracing::{error, info, warn};

use common::{Config, SearchConfig};

use crate::api::http::ApiStatusError;
use crate::api::{NewsApi, SearchRequest};
use crate::articles::{Article, ArticleStore};
use crate::assembler::{assemble, search_error_message};
use crate::enrichment::enrich_articles;
use crate::error::ChatError;
use crate::ids::{Clock, IdGenerator, SystemClock, UuidIds};
use crate::query::normalize_query;
use crate::transcript::Transcript;

const GENERIC_SEARCH_FAILURE: &str = "Failed to fetch news";

/// Everything the rendering layer draws
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub transcript: Transcript,
    pub articles: ArticleStore,
    pub pending: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panel index for a clicked title.
    pub fn locate_article(&self, article_id: &str) -> Option<usize> {
        self.articles.position(article_id)
    }
}

/// Handle for a search that has been started with [`ChatSession::begin`].
/// It must be handed back to `complete` or `cancel`.
#[derive(Debug)]
#[must_use = "a started search must be completed or cancelled"]
pub struct PendingSearch {
    query: String,
}

impl PendingSearch {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Owned collaborators for one search run; cheap to clone and `'static`,
/// so the network part can be spawned off the UI loop.
#[derive(Clone)]
pub struct SearchContext {
    api: Arc<dyn NewsApi>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    options: SearchConfig,
    placeholder_image: String,
}

impl SearchContext {
    /// Search, normalize, then enrich. Touches no session state.
    pub async fn run(self, query: String) -> Result<Vec<Article>, ChatError> {
        let request = SearchRequest::new(query.as_str(), &self.options);
        let envelope = self.api.search(&request).await.map_err(into_search_failed)?;

        if !envelope.success {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_SEARCH_FAILURE.to_string());
            return Err(ChatError::search_failed(message));
        }

        let ingested_at = self.clock.now();
        let articles: Vec<Article> = envelope
            .articles
            .into_iter()
            .map(|raw| Article::from_raw(raw, self.ids.next_id(), ingested_at, &self.placeholder_image))
            .collect();
        info!(query = %query, "search: {} articles returned", articles.len());

        if !self.options.enrich {
            return Ok(articles);
        }
        Ok(enrich_articles(self.api.as_ref(), articles).await)
    }
}

fn into_search_failed(e: anyhow::Error) -> ChatError {
    error!("search: {:#}", e);
    let message = e
        .downcast_ref::<ApiStatusError>()
        .and_then(|status| status.message.clone())
        .unwrap_or_else(|| GENERIC_SEARCH_FAILURE.to_string());
    ChatError::search_failed(message)
}

/// Owns the session state and drives the query → search → enrich → answer cycle.
pub struct ChatSession {
    state: SessionState,
    context: SearchContext,
    backend: String,
}

impl ChatSession {
    pub fn new(api: Arc<dyn NewsApi>, config: &Config) -> Self {
        Self {
            state: SessionState::new(),
            context: SearchContext {
                api,
                ids: Arc::new(UuidIds),
                clock: Arc::new(SystemClock),
                options: config.search.clone(),
                placeholder_image: config.display.placeholder_image_url.clone(),
            },
            backend: config.api.base_url.clone(),
        }
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.context.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.context.clock = clock;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending
    }

    /// Validate the input and record it: user entry, then loading entry.
    /// Rejected input (blank, or a search already running) leaves the state untouched.
    pub fn begin(&mut self, raw: &str) -> Result<PendingSearch, ChatError> {
        let query = normalize_query(raw)?;
        if self.state.pending {
            warn!(query = %query, "search already in progress, rejecting query");
            return Err(ChatError::Busy);
        }

        let now = self.context.clock.now();
        self.state.transcript.append_user(&query, now);
        self.state.transcript.append_loading(now);
        self.state.pending = true;
        Ok(PendingSearch { query })
    }

    /// Network half of a started search, detached from `self`.
    pub fn search_task(&self, pending: &PendingSearch) -> impl Future<Output = Result<Vec<Article>, ChatError>> + Send + 'static {
        self.context.clone().run(pending.query.clone())
    }

    /// Fold a finished search into the state. Returns the number of articles added;
    /// a failed search is written to the transcript and handed back as the error.
    pub fn complete(
        &mut self,
        pending: PendingSearch,
        outcome: Result<Vec<Article>, ChatError>,
    ) -> Result<usize, ChatError> {
        let now = self.context.clock.now();
        let result = match outcome {
            Ok(articles) => {
                let response = assemble(&pending.query, &articles);
                let added = articles.len();
                self.state.transcript.resolve_loading(&response.text, response.title_refs, now);
                self.state.articles.extend(articles);
                info!(query = %pending.query, "search complete: {} articles added", added);
                Ok(added)
            }
            Err(e) => {
                error!(query = %pending.query, "search failed: {}", e);
                self.state
                    .transcript
                    .resolve_loading(&search_error_message(&self.backend), Vec::new(), now);
                Err(e)
            }
        };
        self.state.pending = false;
        result
    }

    /// Abandon a started search without an answer.
    pub fn cancel(&mut self, pending: PendingSearch) {
        info!(query = %pending.query, "search cancelled");
        self.state.transcript.remove_loading();
        self.state.pending = false;
    }

    /// Run one full cycle. If this future is dropped mid-flight, the loading
    /// entry is removed and `pending` reset.
    pub async fn submit(&mut self, raw: &str) -> Result<usize, ChatError> {
        let pending = self.begin(raw)?;
        let search = self.search_task(&pending);

        let mut guard = ResetOnDrop {
            state: &mut self.state,
            armed: true,
        };
        let outcome = search.await;
        guard.armed = false;
        drop(guard);

        self.complete(pending, outcome)
    }
}

struct ResetOnDrop<'a> {
    state: &'a mut SessionState,
    armed: bool,
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.transcript.remove_loading();
            self.state.pending = false;
        }
    }
}
