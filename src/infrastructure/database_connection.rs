// Database connection and pool management
// This module handles SQLite database connections using sqlx

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create the database file directory if it doesn't exist
        let db_path = if database_url.starts_with("sqlite://") {
            database_url.trim_start_matches("sqlite://")
        } else if database_url.starts_with("sqlite:") {
            database_url.trim_start_matches("sqlite:")
        } else {
            database_url
        };

        if db_path != ":memory:" {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }

        // WAL + busy timeout: worker transactions serialize on the write lock
        // instead of failing when they contend on camera-name inserts
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema on first connect. The unique constraint on
    /// `camera.name` and the composite primary key on `camera_used` are the
    /// store-level guarantees the pipeline relies on.
    pub async fn migrate(&self) -> Result<()> {
        let create_movie_sql = r#"
            CREATE TABLE IF NOT EXISTS movie (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                english_title TEXT NOT NULL
            )
        "#;

        let create_camera_sql = r#"
            CREATE TABLE IF NOT EXISTS camera (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                medium TEXT NOT NULL DEFAULT 'unclassified'
            )
        "#;

        let create_camera_used_sql = r#"
            CREATE TABLE IF NOT EXISTS camera_used (
                movie_id TEXT NOT NULL REFERENCES movie (id),
                camera_id INTEGER NOT NULL REFERENCES camera (id),
                PRIMARY KEY (movie_id, camera_id)
            )
        "#;

        let create_indexes_sql = r#"
            CREATE INDEX IF NOT EXISTS idx_camera_used_camera_id ON camera_used (camera_id)
        "#;

        sqlx::query(create_movie_sql).execute(&self.pool).await?;
        sqlx::query(create_camera_sql).execute(&self.pool).await?;
        sqlx::query(create_camera_used_sql)
            .execute(&self.pool)
            .await?;
        sqlx::query(create_indexes_sql).execute(&self.pool).await?;

        Ok(())
    }
}
