use brusio_core::ContentType;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Message as persisted. `id` is `None` until the repository assigns one on
/// save; every other field is set at creation and never mutated (there is no
/// update or delete of individual messages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Option<String>,
    pub content: String,
    pub content_type: ContentType,
    pub sent: OffsetDateTime,
    pub username: String,
    pub user_avatar_image_link: String,
}

/// Message store over the SQLite pool. Safe for concurrent use from multiple
/// request handlers; the pool serializes access to the database.
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
    window: i64,
}

const SELECT_COLUMNS: &str =
    "message_id, content, content_type, sent, username, user_avatar_image_link";

impl MessageRepository {
    /// `window` bounds how many messages a single read returns.
    pub fn new(pool: SqlitePool, window: i64) -> Self {
        Self { pool, window }
    }

    /// Inserts a message, assigning it a fresh UUIDv4 id. Any id already on
    /// the message is ignored; ids are store-assigned only. Returns the
    /// stored message, with `sent` truncated to the store's millisecond
    /// precision.
    pub async fn save(&self, message: Message) -> sqlx::Result<Message> {
        let id = Uuid::new_v4().to_string();
        let sent_millis = sent_to_millis(message.sent);
        sqlx::query(
            "INSERT INTO messages (message_id, content, content_type, sent, username, user_avatar_image_link) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&message.content)
        .bind(message.content_type.as_str())
        .bind(sent_millis)
        .bind(&message.username)
        .bind(&message.user_avatar_image_link)
        .execute(&self.pool)
        .await?;

        Ok(Message {
            id: Some(id),
            sent: sent_from_millis(sent_millis)?,
            ..message
        })
    }

    /// The most recent `window` messages, returned oldest-first (ascending
    /// `sent`, ties broken by insertion order). An empty board yields an
    /// empty vector.
    pub async fn find_latest(&self) -> sqlx::Result<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} \
             FROM (SELECT * FROM messages ORDER BY sent DESC, seq DESC LIMIT ?) \
             ORDER BY sent ASC, seq ASC"
        ))
        .bind(self.window)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_message).collect()
    }

    /// The most recent `window` messages strictly after the position of
    /// `after_id`, oldest-first. An unknown `after_id` is not an error: it
    /// behaves exactly like having no cursor at all.
    pub async fn find_latest_after(&self, after_id: &str) -> sqlx::Result<Vec<Message>> {
        let cursor = sqlx::query("SELECT sent, seq FROM messages WHERE message_id = ?")
            .bind(after_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(cursor) = cursor else {
            return self.find_latest().await;
        };
        let sent: i64 = cursor.try_get("sent")?;
        let seq: i64 = cursor.try_get("seq")?;

        // same windowed shape as find_latest, with the cursor predicate
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} \
             FROM (SELECT * FROM messages \
                   WHERE sent > ? OR (sent = ? AND seq > ?) \
                   ORDER BY sent DESC, seq DESC LIMIT ?) \
             ORDER BY sent ASC, seq ASC"
        ))
        .bind(sent)
        .bind(sent)
        .bind(seq)
        .bind(self.window)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_message).collect()
    }

    /// Clears the board. Test/reset use only.
    pub async fn delete_all(&self) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM messages").execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_message(row: &SqliteRow) -> sqlx::Result<Message> {
    let content_type_raw: String = row.try_get("content_type")?;
    let content_type = ContentType::parse(&content_type_raw).ok_or_else(|| {
        sqlx::Error::Decode(format!("unknown content type {content_type_raw:?}").into())
    })?;
    let sent_millis: i64 = row.try_get("sent")?;
    Ok(Message {
        id: Some(row.try_get("message_id")?),
        content: row.try_get("content")?,
        content_type,
        sent: sent_from_millis(sent_millis)?,
        username: row.try_get("username")?,
        user_avatar_image_link: row.try_get("user_avatar_image_link")?,
    })
}

// Timestamps are stored as unix milliseconds so that ordering is a plain
// integer comparison; RFC3339 text of mixed sub-second precision would not
// sort correctly.
fn sent_to_millis(sent: OffsetDateTime) -> i64 {
    (sent.unix_timestamp_nanos() / 1_000_000) as i64
}

fn sent_from_millis(millis: i64) -> sqlx::Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
