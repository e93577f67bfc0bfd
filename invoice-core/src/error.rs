use thiserror::Error;

/// Errors from loading or saving an invoice draft.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("invalid invoice draft: {0}")]
    Json(#[from] serde_json::Error),
}
