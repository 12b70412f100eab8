use anyhow::Context;
use axum::http::StatusCode;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

use crate::repository::MessageRepository;
use crate::service::MessageService;

pub mod controllers;
pub mod error;
pub mod repository;
pub mod routes;
pub mod service;

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub service: MessageService,
}

impl AppState {
    pub fn new(pool: SqlitePool, window: i64) -> Self {
        let service = MessageService::new(MessageRepository::new(pool.clone(), window));
        Self { pool, service }
    }
}

// Given a file path, returns a valid SQLite URL. Creates parent directories
// if they do not exist yet.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite:///{}", s))
}

/// Builds the SQLite DB URL from the DATABASE_URL environment variable.
/// Falls back to "brusio.db" in the current directory when unset;
/// "sqlite::memory:" is passed through untouched.
pub fn build_sqlite_url() -> anyhow::Result<String> {
    let raw = std::env::var("DATABASE_URL").unwrap_or_else(|_| "brusio.db".to_string());
    if raw == "sqlite::memory:" {
        return Ok(raw);
    }
    // Strip any "sqlite://" prefix to get back to a plain file path
    let path_part = if raw.starts_with("sqlite://") {
        raw.trim_start_matches("sqlite:///")
            .trim_start_matches("sqlite://")
            .to_string()
    } else {
        raw
    };
    sqlite_url_for_path(&PathBuf::from(path_part))
}

/// How many recent messages a single read returns. Overridable via the
/// MESSAGES_WINDOW environment variable; defaults to 10.
pub fn messages_window() -> i64 {
    std::env::var("MESSAGES_WINDOW")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(10)
}

// Connect to the database and return a connection pool.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

/// Runs the database migrations. Creates the messages table if it does not
/// exist; `seq` is the insertion-order tiebreak for messages whose truncated
/// `sent` collides, and never leaves the store.
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let stmts = [
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            seq          INTEGER PRIMARY KEY AUTOINCREMENT,
            message_id   TEXT NOT NULL UNIQUE,
            content      TEXT NOT NULL,
            content_type TEXT NOT NULL,
            sent         INTEGER NOT NULL,
            username     TEXT NOT NULL,
            user_avatar_image_link TEXT NOT NULL
        );"#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_messages_sent ON messages(sent, seq);"#,
    ];
    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| format!("apply migration: {}", &s[..s.len().min(40)].replace('\n', " ")))?;
    }
    Ok(())
}

/// Database health check: tries to acquire a connection from the pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
