use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures surfaced by the message service.
///
/// A `lastMessageId` that matches no stored message is deliberately NOT in
/// here: the store treats it like an absent cursor.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Datastore unreachable, or a read/write failed.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    /// A stored avatar link did not parse as a URL; surfaces on view
    /// construction during reads, never silently swallowed.
    #[error("malformed avatar link {link:?}: {source}")]
    Rendering {
        link: String,
        source: url::ParseError,
    },
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        // Both kinds mean bad state on a trusted path, so both map to 500.
        tracing::error!("{self}");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
