//! Movie/camera repository
//!
//! Implements the `MovieStore` seam on top of sqlx. One movie's full
//! enrichment is one transaction: camera rows are resolved first (insert or
//! reuse by unique name), then the movie row, then the association rows.
//! Any mid-sequence failure rolls the entire transaction back, including
//! camera rows created inside it.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::domain::entities::{Camera, Movie};
use crate::domain::repositories::MovieStore;

#[derive(Clone)]
pub struct MovieRepository {
    pool: SqlitePool,
}

/// Store-wide row counts for the final run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSummary {
    pub movies: i64,
    pub cameras: i64,
    pub links: i64,
}

impl MovieRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Cameras linked to one movie, in name order.
    pub async fn cameras_for_movie(&self, movie_id: &str) -> Result<Vec<Camera>> {
        let cameras = sqlx::query_as::<_, Camera>(
            r#"
            SELECT c.id, c.name, c.medium
            FROM camera c
            JOIN camera_used cu ON cu.camera_id = c.id
            WHERE cu.movie_id = ?
            ORDER BY c.name
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cameras)
    }

    /// Row counts across the whole store.
    pub async fn count_summary(&self) -> Result<StoreSummary> {
        let movies = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movie")
            .fetch_one(&self.pool)
            .await?;
        let cameras = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM camera")
            .fetch_one(&self.pool)
            .await?;
        let links = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM camera_used")
            .fetch_one(&self.pool)
            .await?;

        Ok(StoreSummary {
            movies,
            cameras,
            links,
        })
    }
}

#[async_trait]
impl MovieStore for MovieRepository {
    async fn find_movie(&self, movie_id: &str) -> Result<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT id, title, english_title FROM movie WHERE id = ?",
        )
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    async fn upsert_movie_with_cameras(
        &self,
        movie_id: &str,
        title: &str,
        english_title: &str,
        camera_names: &[String],
    ) -> Result<Movie> {
        let mut tx = self.pool.begin().await?;

        // Resolve every camera name to a row id. ON CONFLICT DO NOTHING plus
        // the re-select is the "lose the race, reuse the winner's row"
        // recovery: the unique constraint on name is authoritative.
        let mut camera_ids = Vec::with_capacity(camera_names.len());
        for name in camera_names {
            sqlx::query("INSERT INTO camera (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(name)
                .execute(&mut *tx)
                .await?;

            let camera_id =
                sqlx::query_scalar::<_, i64>("SELECT id FROM camera WHERE name = ?")
                    .bind(name)
                    .fetch_one(&mut *tx)
                    .await?;
            camera_ids.push(camera_id);
        }

        // Plain INSERT: a movie row is created at most once and never updated.
        // A duplicate id aborts here and rolls back the camera rows above.
        sqlx::query("INSERT INTO movie (id, title, english_title) VALUES (?, ?, ?)")
            .bind(movie_id)
            .bind(title)
            .bind(english_title)
            .execute(&mut *tx)
            .await?;

        // INSERT OR IGNORE collapses duplicate names within one extraction
        // list onto the composite primary key.
        for camera_id in camera_ids {
            sqlx::query("INSERT OR IGNORE INTO camera_used (movie_id, camera_id) VALUES (?, ?)")
                .bind(movie_id)
                .bind(camera_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Movie {
            id: movie_id.to_string(),
            title: title.to_string(),
            english_title: english_title.to_string(),
        })
    }
}
