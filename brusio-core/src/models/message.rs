use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::UserVM;

/// API-facing projection of a stored message, assembled on demand and never
/// itself persisted.
///
/// On retrieval `content` is the already-rendered display string and `id` is
/// set; on a post `content` is the raw source (markdown or plain text) and
/// `id` is absent, since the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageVM {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    pub user: UserVM,
    #[serde(with = "time::serde::rfc3339")]
    pub sent: OffsetDateTime, // RFC3339 UTC on the wire
}
