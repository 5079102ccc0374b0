use sqlx::SqliteExecutor;

use crate::models::LinkAccess;

pub struct LinkAccessRepository;

impl LinkAccessRepository {
    pub async fn insert<'e, E: SqliteExecutor<'e>>(executor: E, access: &LinkAccess) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO link_accesses (id, share_link_id, video_id, viewer_email, viewed_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&access.id)
        .bind(&access.share_link_id)
        .bind(&access.video_id)
        .bind(&access.viewer_email)
        .bind(access.viewed_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Newest first; insertion order breaks ties on equal timestamps.
    pub async fn find_by_video<'e, E: SqliteExecutor<'e>>(
        executor: E,
        video_id: &str,
    ) -> sqlx::Result<Vec<LinkAccess>> {
        sqlx::query_as(
            "SELECT * FROM link_accesses WHERE video_id = ? ORDER BY viewed_at DESC, rowid DESC",
        )
        .bind(video_id)
        .fetch_all(executor)
        .await
    }

    pub async fn find_by_link<'e, E: SqliteExecutor<'e>>(
        executor: E,
        share_link_id: &str,
    ) -> sqlx::Result<Vec<LinkAccess>> {
        sqlx::query_as(
            "SELECT * FROM link_accesses WHERE share_link_id = ? ORDER BY viewed_at DESC, rowid DESC",
        )
        .bind(share_link_id)
        .fetch_all(executor)
        .await
    }
}
