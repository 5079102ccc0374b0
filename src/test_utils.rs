//! Fixtures shared by the unit tests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::models::{Dimensions, ShareLink, User, Video, VideoStatus, Visibility};
use crate::repository::{ShareLinkRepository, UserRepository, VideoRepository};

pub async fn seed_user(db: &Database, email: &str) -> User {
    let id = Uuid::new_v4().to_string();
    UserRepository::upsert(db.pool(), &id, email, "Test User", Utc::now())
        .await
        .expect("seed user");
    UserRepository::find_by_id(db.pool(), &id)
        .await
        .expect("load user")
        .expect("user exists")
}

pub async fn seed_video(db: &Database, owner_id: &str) -> Video {
    let now = Utc::now();
    let video = Video {
        id: Uuid::new_v4().to_string(),
        user_id: owner_id.to_string(),
        name: "clip.mp4".to_string(),
        file_size: 2048,
        mime_type: Some("video/mp4".to_string()),
        duration: Some(3.0),
        dimensions: Dimensions { width: 640, height: 360 },
        video_url: None,
        thumbnail_url: None,
        status: VideoStatus::Processing,
        created_at: now,
        updated_at: now,
    };
    VideoRepository::insert(db.pool(), &video).await.expect("seed video");
    video
}

/// Inserts straight through the repository, so expiry in the past is allowed.
pub async fn seed_link(
    db: &Database,
    video_id: &str,
    creator_id: &str,
    visibility: Visibility,
    expires_at: Option<DateTime<Utc>>,
) -> ShareLink {
    let now = Utc::now();
    let link = ShareLink {
        id: Uuid::new_v4().to_string(),
        video_id: video_id.to_string(),
        creator_id: creator_id.to_string(),
        visibility,
        expires_at,
        created_at: now,
        updated_at: now,
        last_viewed_at: None,
    };
    ShareLinkRepository::insert(db.pool(), &link).await.expect("seed link");
    link
}
