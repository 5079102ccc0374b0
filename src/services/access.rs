use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{not_found_on_missing_reference, AppError, Result};
use crate::models::{normalize_email, LinkAccess};
use crate::repository::{LinkAccessRepository, ShareLinkRepository};

/// Append-only audit log of link resolutions
pub struct AccessService;

impl AccessService {
    /// Record one visit and stamp `last_viewed_at` on the link, atomically.
    ///
    /// Performs no authorization; callers must have already admitted the viewer.
    /// The video must be the one the link shares.
    pub async fn record_access(
        db: &Database,
        share_link_id: &str,
        video_id: &str,
        viewer_email: Option<&str>,
    ) -> Result<LinkAccess> {
        let viewer_email = viewer_email
            .map(normalize_email)
            .filter(|email| !email.is_empty());

        let access = LinkAccess {
            id: Uuid::new_v4().to_string(),
            share_link_id: share_link_id.to_string(),
            video_id: video_id.to_string(),
            viewer_email,
            viewed_at: Utc::now(),
        };

        let mut tx = db.pool().begin().await?;

        let link = ShareLinkRepository::find_by_id(&mut *tx, share_link_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Share link not found".to_string()))?;
        if link.video_id != video_id {
            return Err(AppError::InvalidArgument(
                "Video ID does not match the share link".to_string(),
            ));
        }

        LinkAccessRepository::insert(&mut *tx, &access)
            .await
            .map_err(|e| not_found_on_missing_reference(e, "Share link or video"))?;
        ShareLinkRepository::touch_last_viewed(&mut *tx, share_link_id, access.viewed_at).await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded access {} to link {} (viewer: {})",
            access.id,
            share_link_id,
            access.viewer_email.as_deref().unwrap_or("anonymous")
        );
        Ok(access)
    }

    /// Access history of a video, newest first
    pub async fn list_by_video(db: &Database, video_id: &str) -> Result<Vec<LinkAccess>> {
        let accesses = LinkAccessRepository::find_by_video(db.pool(), video_id).await?;
        Ok(accesses)
    }
}
