use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use brusio_core::{ContentType, MessageVM};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQuery {
    #[serde(default)]
    pub last_message_id: Option<String>,
}

/// Handler for GET /api/v1/messages
///
/// Without `lastMessageId` (or with it empty) returns the latest window;
/// with it, only messages after the given id.
pub async fn get_messages(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageVM>>, ServiceError> {
    let messages = match query.last_message_id.as_deref() {
        Some(id) if !id.is_empty() => state.service.after(id).await?,
        _ => state.service.latest().await?,
    };
    Ok(Json(messages))
}

/// Handler for POST /api/v1/messages
///
/// The body's `content` is raw source; posts default to markdown, matching
/// what the board's clients send.
pub async fn post_message(
    Extension(state): Extension<Arc<AppState>>,
    Json(message): Json<MessageVM>,
) -> Result<StatusCode, ServiceError> {
    tracing::debug!(user = %message.user.name, "posting message");
    state.service.post(message, ContentType::Markdown).await?;
    Ok(StatusCode::CREATED)
}
