use thiserror::Error;

/// Failures the chat core distinguishes. Only `SearchFailed` ever reaches the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Input was blank after trimming.
    #[error("query is empty")]
    EmptyQuery,

    /// A search is already in flight for this session.
    #[error("a search is already in progress")]
    Busy,

    /// Transport error, non-2xx status, or an envelope with `success = false`.
    #[error("search failed: {message}")]
    SearchFailed { message: String },

    /// Preview for a single article could not be fetched.
    #[error("preview unavailable for {url}: {reason}")]
    PreviewUnavailable { url: String, reason: String },
}

impl ChatError {
    pub fn search_failed(message: impl Into<String>) -> Self {
        ChatError::SearchFailed {
            message: message.into(),
        }
    }
}
