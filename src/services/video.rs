use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{CompleteProcessingRequest, CreateVideoRequest, Video, VideoStatus};
use crate::repository::{UserRepository, VideoRepository};

/// Video records. Transcoding and asset upload happen elsewhere; this service
/// only tracks metadata and the URLs the pipeline reports back.
pub struct VideoService;

impl VideoService {
    /// Register an upload; the video starts out PROCESSING
    pub async fn create_video(db: &Database, req: CreateVideoRequest) -> Result<Video> {
        let user_id = req
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::InvalidArgument("User ID is required".to_string()))?;

        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidArgument("Name is required".to_string()));
        }
        if req.file_size < 0 || req.dimensions.width < 0 || req.dimensions.height < 0 {
            return Err(AppError::InvalidArgument(
                "File size and dimensions must not be negative".to_string(),
            ));
        }

        UserRepository::find_by_id(db.pool(), &user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4().to_string(),
            user_id,
            name: name.to_string(),
            file_size: req.file_size,
            mime_type: req.mime_type,
            duration: req.duration,
            dimensions: req.dimensions,
            video_url: None,
            thumbnail_url: None,
            status: VideoStatus::Processing,
            created_at: now,
            updated_at: now,
        };
        VideoRepository::insert(db.pool(), &video).await?;

        tracing::info!("Registered video {} for user {}", video.id, video.user_id);
        Ok(video)
    }

    /// Get video by ID
    pub async fn get_video(db: &Database, id: &str) -> Result<Video> {
        VideoRepository::find_by_id(db.pool(), id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Videos owned by a user, newest first
    pub async fn list_videos(db: &Database, user_id: &str) -> Result<Vec<Video>> {
        let videos = VideoRepository::find_by_user(db.pool(), user_id).await?;
        Ok(videos)
    }

    /// Write back the processed asset URLs and mark the video READY
    pub async fn complete_processing(
        db: &Database,
        id: &str,
        req: CompleteProcessingRequest,
    ) -> Result<Video> {
        let video_url = req.video_url.trim();
        let thumbnail_url = req.thumbnail_url.trim();
        if video_url.is_empty() || thumbnail_url.is_empty() {
            return Err(AppError::InvalidArgument(
                "videoURL and thumbnailURL are required".to_string(),
            ));
        }

        let updated = VideoRepository::set_assets(
            db.pool(),
            id,
            video_url,
            thumbnail_url,
            VideoStatus::Ready,
            Utc::now(),
        )
        .await?;
        if updated == 0 {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        tracing::info!("Video {} is ready", id);
        Self::get_video(db, id).await
    }

    /// Delete a video together with its share links and access history
    pub async fn delete_video(db: &Database, id: &str) -> Result<()> {
        if VideoRepository::delete(db.pool(), id).await? == 0 {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        tracing::info!("Deleted video {}", id);
        Ok(())
    }
}
