use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{
    normalize_email, CreateLinkRequest, ResolvedLink, ShareLink, ShareLinkDetail,
    UpdateLinkRequest, Visibility,
};
use crate::repository::{
    LinkAccessRepository, ShareLinkRepository, UserRepository, VideoRepository,
};
use crate::services::{authorization, AccessService};

/// Share link lifecycle: create, resolve, update, delete.
///
/// Expiry is evaluated lazily against the wall clock whenever a link is
/// resolved. Expired links stay in storage until they are deleted explicitly.
pub struct LinkService;

impl LinkService {
    /// Create a new share link
    pub async fn create_link(db: &Database, req: CreateLinkRequest) -> Result<ShareLinkDetail> {
        let creator_id = required(req.creator_id, "Creator ID is required")?;
        let video_id = required(req.video_id, "Video ID is required")?;
        let visibility = req
            .visibility
            .as_deref()
            .and_then(Visibility::from_str)
            .ok_or_else(|| {
                AppError::InvalidArgument(
                    "Valid visibility (PUBLIC or PRIVATE) is required".to_string(),
                )
            })?;

        let now = Utc::now();
        if let Some(expires_at) = req.expires_at {
            if expires_at <= now {
                return Err(AppError::InvalidArgument(
                    "expiresAt must be in the future".to_string(),
                ));
            }
        }

        VideoRepository::find_by_id(db.pool(), &video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        UserRepository::find_by_id(db.pool(), &creator_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Creator not found".to_string()))?;

        let link = ShareLink {
            id: Uuid::new_v4().to_string(),
            video_id,
            creator_id,
            visibility,
            expires_at: req.expires_at,
            created_at: now,
            updated_at: now,
            last_viewed_at: None,
        };

        let mut tx = db.pool().begin().await?;
        ShareLinkRepository::insert(&mut *tx, &link).await?;
        if visibility == Visibility::Private && !req.user_whitelist.is_empty() {
            attach_whitelist(&mut tx, &link.id, &req.user_whitelist).await?;
        }
        tx.commit().await?;

        tracing::info!(
            "Created {} share link {} for video {}",
            link.visibility.as_str(),
            link.id,
            link.video_id
        );
        Self::load_detail(db, link).await
    }

    /// Resolve a link with its relations, refusing expired ones
    pub async fn get_link(db: &Database, id: &str) -> Result<ShareLinkDetail> {
        Self::get_link_at(db, id, Utc::now()).await
    }

    /// Same as `get_link`, evaluated at an explicit instant
    pub async fn get_link_at(db: &Database, id: &str, now: DateTime<Utc>) -> Result<ShareLinkDetail> {
        let link = Self::find_active(db, id, now).await?;
        Self::load_detail(db, link).await
    }

    /// Links of a video, newest first. Expired links are included.
    pub async fn list_by_video(db: &Database, video_id: &str) -> Result<Vec<ShareLink>> {
        let links = ShareLinkRepository::find_by_video(db.pool(), video_id).await?;
        Ok(links)
    }

    /// Partially update a link.
    ///
    /// Switching to PUBLIC keeps the stored whitelist. A supplied whitelist
    /// replaces the stored one only when the link ends up PRIVATE.
    pub async fn update_link(
        db: &Database,
        id: &str,
        req: UpdateLinkRequest,
    ) -> Result<ShareLinkDetail> {
        let visibility = match req.visibility.as_deref() {
            Some(v) => Some(Visibility::from_str(v).ok_or_else(|| {
                AppError::InvalidArgument("Invalid visibility value".to_string())
            })?),
            None => None,
        };

        let mut link = Self::find(db, id).await?;
        if let Some(visibility) = visibility {
            link.visibility = visibility;
        }
        if let Some(expires_at) = req.expires_at {
            link.expires_at = expires_at;
        }
        link.updated_at = Utc::now();

        let mut tx = db.pool().begin().await?;
        if ShareLinkRepository::update(&mut *tx, &link).await? == 0 {
            return Err(AppError::NotFound("Share link not found".to_string()));
        }
        if let Some(emails) = &req.user_whitelist {
            if link.visibility == Visibility::Private {
                ShareLinkRepository::clear_whitelist(&mut *tx, &link.id).await?;
                attach_whitelist(&mut tx, &link.id, emails).await?;
            }
        }
        tx.commit().await?;

        tracing::info!("Updated share link {}", link.id);
        Self::load_detail(db, link).await
    }

    /// Delete a link. Deleting twice yields `NotFound`.
    pub async fn delete_link(db: &Database, id: &str) -> Result<()> {
        if ShareLinkRepository::delete(db.pool(), id).await? == 0 {
            return Err(AppError::NotFound("Share link not found".to_string()));
        }
        tracing::info!("Deleted share link {}", id);
        Ok(())
    }

    /// Full viewer flow: resolve, authorize, then record the visit.
    pub async fn resolve_link(
        db: &Database,
        id: &str,
        viewer_email: Option<&str>,
    ) -> Result<ResolvedLink> {
        let link = Self::find_active(db, id, Utc::now()).await?;
        let whitelist = ShareLinkRepository::whitelist(db.pool(), &link.id).await?;

        let allowed = whitelist.iter().map(|u| u.email.as_str());
        if let Err(e) = authorization::authorize(link.visibility, allowed, viewer_email) {
            tracing::warn!(
                "Denied access to link {} for {}",
                link.id,
                viewer_email.unwrap_or("anonymous")
            );
            return Err(e);
        }

        let access = AccessService::record_access(db, &link.id, &link.video_id, viewer_email).await?;

        Ok(ResolvedLink {
            share_link_id: link.id,
            redirect_to: format!("/video/{}", link.video_id),
            video_id: link.video_id,
            access,
        })
    }

    async fn find(db: &Database, id: &str) -> Result<ShareLink> {
        ShareLinkRepository::find_by_id(db.pool(), id)
            .await?
            .ok_or_else(|| AppError::NotFound("Share link not found".to_string()))
    }

    async fn find_active(db: &Database, id: &str, now: DateTime<Utc>) -> Result<ShareLink> {
        let link = Self::find(db, id).await?;
        if link.is_expired_at(now) {
            return Err(AppError::Expired("Share link has expired".to_string()));
        }
        Ok(link)
    }

    async fn load_detail(db: &Database, link: ShareLink) -> Result<ShareLinkDetail> {
        let creator = UserRepository::find_by_id(db.pool(), &link.creator_id).await?;
        let user_whitelist = ShareLinkRepository::whitelist(db.pool(), &link.id).await?;
        let accesses = LinkAccessRepository::find_by_link(db.pool(), &link.id).await?;

        Ok(ShareLinkDetail {
            link,
            creator,
            user_whitelist,
            accesses,
        })
    }
}

fn required(value: Option<String>, message: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidArgument(message.to_string()))
}

/// Resolve emails to users and attach them; unknown emails are skipped.
async fn attach_whitelist(conn: &mut SqliteConnection, link_id: &str, emails: &[String]) -> Result<()> {
    for email in emails {
        let email = normalize_email(email);
        if email.is_empty() {
            continue;
        }
        match UserRepository::find_by_email(&mut *conn, &email).await? {
            Some(user) => ShareLinkRepository::add_to_whitelist(&mut *conn, link_id, &user.id).await?,
            None => tracing::debug!("Dropping unknown whitelist email {} for link {}", email, link_id),
        }
    }
    Ok(())
}
