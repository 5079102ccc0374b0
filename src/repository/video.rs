use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::models::{Video, VideoStatus};

pub struct VideoRepository;

impl VideoRepository {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(executor: E, video: &Video) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, name, file_size, mime_type, duration, width, height,
                                video_url, thumbnail_url, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&video.id)
        .bind(&video.user_id)
        .bind(&video.name)
        .bind(video.file_size)
        .bind(&video.mime_type)
        .bind(video.duration)
        .bind(video.dimensions.width)
        .bind(video.dimensions.height)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.status)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
        executor: E,
        id: &str,
    ) -> sqlx::Result<Option<Video>> {
        sqlx::query_as("SELECT * FROM videos WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_user<'e, E: SqliteExecutor<'e>>(
        executor: E,
        user_id: &str,
    ) -> sqlx::Result<Vec<Video>> {
        sqlx::query_as("SELECT * FROM videos WHERE user_id = ? ORDER BY created_at DESC, rowid DESC")
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Store asset URLs and move the video to `status`. Returns rows affected.
    pub async fn set_assets<'e, E: SqliteExecutor<'e>>(
        executor: E,
        id: &str,
        video_url: &str,
        thumbnail_url: &str,
        status: VideoStatus,
        now: DateTime<Utc>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE videos SET video_url = ?, thumbnail_url = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(video_url)
        .bind(thumbnail_url)
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Share links, whitelist rows and access records go with it (FK cascade).
    pub async fn delete<'e, E: SqliteExecutor<'e>>(executor: E, id: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
