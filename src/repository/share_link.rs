use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::models::{ShareLink, User};

pub struct ShareLinkRepository;

impl ShareLinkRepository {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(executor: E, link: &ShareLink) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO share_links (id, video_id, creator_id, visibility, expires_at,
                                     created_at, updated_at, last_viewed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&link.id)
        .bind(&link.video_id)
        .bind(&link.creator_id)
        .bind(link.visibility)
        .bind(link.expires_at)
        .bind(link.created_at)
        .bind(link.updated_at)
        .bind(link.last_viewed_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
        executor: E,
        id: &str,
    ) -> sqlx::Result<Option<ShareLink>> {
        sqlx::query_as("SELECT * FROM share_links WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_video<'e, E: SqliteExecutor<'e>>(
        executor: E,
        video_id: &str,
    ) -> sqlx::Result<Vec<ShareLink>> {
        sqlx::query_as(
            "SELECT * FROM share_links WHERE video_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(video_id)
        .fetch_all(executor)
        .await
    }

    /// Persist visibility and expiry. Returns rows affected.
    pub async fn update<'e, E: SqliteExecutor<'e>>(executor: E, link: &ShareLink) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE share_links SET visibility = ?, expires_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(link.visibility)
        .bind(link.expires_at)
        .bind(link.updated_at)
        .bind(&link.id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn touch_last_viewed<'e, E: SqliteExecutor<'e>>(
        executor: E,
        id: &str,
        viewed_at: DateTime<Utc>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query("UPDATE share_links SET last_viewed_at = ? WHERE id = ?")
            .bind(viewed_at)
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E: SqliteExecutor<'e>>(executor: E, id: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM share_links WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn whitelist<'e, E: SqliteExecutor<'e>>(
        executor: E,
        link_id: &str,
    ) -> sqlx::Result<Vec<User>> {
        sqlx::query_as(
            r#"
            SELECT u.*
            FROM share_link_whitelist w
            JOIN users u ON u.id = w.user_id
            WHERE w.share_link_id = ?
            ORDER BY u.email ASC
            "#,
        )
        .bind(link_id)
        .fetch_all(executor)
        .await
    }

    pub async fn add_to_whitelist<'e, E: SqliteExecutor<'e>>(
        executor: E,
        link_id: &str,
        user_id: &str,
    ) -> sqlx::Result<()> {
        sqlx::query("INSERT OR IGNORE INTO share_link_whitelist (share_link_id, user_id) VALUES (?, ?)")
            .bind(link_id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn clear_whitelist<'e, E: SqliteExecutor<'e>>(executor: E, link_id: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM share_link_whitelist WHERE share_link_id = ?")
            .bind(link_id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
