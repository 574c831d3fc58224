//! Card library stored in an SQLite database.

use crate::db_path;
use crate::error::{Error, Result};
use log::*;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqliteConnection;
use sqlx::sqlite::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;
use std::str::FromStr;

/// Seeded into the tag list when the schema is created
pub const DEFAULT_TAGS: [&str; 10] = [
    "Array",
    "BFS",
    "Binary Search",
    "DFS",
    "DP",
    "Graph",
    "Hash Table",
    "Two Pointers",
    "Stack",
    "Queue",
];

const SCHEMA_VERSION: i32 = 1;

#[derive(Clone)]
pub struct SqliteStore {
    pub conn: SqlitePool,
}

impl SqliteStore {
    /// Open the database at [`db_path`], creating it on first use.
    pub async fn default() -> Result<Self> {
        Self::open(&db_path()?).await
    }

    pub async fn open(path: &Path) -> Result<Self> {
        info!("opening card database {path:?}");
        let store = Self {
            conn: conn(path).await?,
        };
        store.check_schema().await?;
        Ok(store)
    }

    /// A private database that lives as long as the store.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // every connection to :memory: is a separate database, so keep exactly one alive
        let conn = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { conn };
        store.check_schema().await?;
        Ok(store)
    }

    async fn check_schema(&self) -> Result<()> {
        let user_version: i32 = sqlx::query_scalar("PRAGMA user_version;")
            .fetch_one(&self.conn)
            .await?;
        if user_version > SCHEMA_VERSION {
            warn!("database schema {user_version} is newer than {SCHEMA_VERSION}");
        }
        if user_version > 0 {
            return Ok(());
        }

        // another process may be creating the schema right now: take the write
        // lock first and look again
        let mut conn = self.conn.acquire().await?;
        sqlx::raw_sql("BEGIN EXCLUSIVE;").execute(&mut *conn).await?;
        let created = match create_schema(&mut conn).await {
            Ok(()) => sqlx::raw_sql("COMMIT;")
                .execute(&mut *conn)
                .await
                .map(|_| ())
                .map_err(Error::from),
            Err(e) => Err(e),
        };
        if created.is_err() {
            if let Err(rollback) = sqlx::raw_sql("ROLLBACK;").execute(&mut *conn).await {
                warn!("rollback failed: {rollback}");
            }
        }
        created
    }
}

/// Runs inside an exclusive transaction.
async fn create_schema(conn: &mut SqliteConnection) -> Result<()> {
    let user_version: i32 = sqlx::query_scalar("PRAGMA user_version;")
        .fetch_one(&mut *conn)
        .await?;
    if user_version > 0 {
        debug!("schema version {user_version} created concurrently");
        return Ok(());
    }

    info!("creating schema version {SCHEMA_VERSION}");
    let seed = DEFAULT_TAGS
        .iter()
        .map(|tag| format!("('{}')", tag.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ");
    sqlx::raw_sql(&format!(
        "
CREATE TABLE cards (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    tags TEXT NOT NULL, -- JSON array
    difficulty INTEGER NOT NULL,
    last_review TEXT NOT NULL, -- YYYY-MM-DD
    next_review TEXT NOT NULL, -- YYYY-MM-DD
    interval INTEGER NOT NULL,
    repetitions INTEGER NOT NULL,
    ease_factor REAL NOT NULL,
    review_count INTEGER NOT NULL,
    link TEXT
) STRICT;
CREATE INDEX cards_next_review ON cards(next_review);
CREATE TABLE tags (
    name TEXT PRIMARY KEY NOT NULL
) STRICT;
INSERT INTO tags (name) VALUES {seed};
PRAGMA user_version = {SCHEMA_VERSION};
         "
    ))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn conn(path: &Path) -> sqlx::Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqlitePoolOptions::new().connect_with(options).await
}
