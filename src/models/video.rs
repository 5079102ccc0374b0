use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Processing state of an uploaded video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum VideoStatus {
    Processing,
    Ready,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i64,
    pub height: i64,
}

/// Video model
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub duration: Option<f64>,
    #[sqlx(flatten)]
    pub dimensions: Dimensions,
    #[serde(rename = "videoURL")]
    pub video_url: Option<String>,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: Option<String>,
    pub status: VideoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a new upload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub dimensions: Dimensions,
}

/// Asset locations written back by the processing pipeline
#[derive(Debug, Deserialize)]
pub struct CompleteProcessingRequest {
    #[serde(rename = "videoURL", alias = "videoUrl")]
    pub video_url: String,
    #[serde(rename = "thumbnailURL", alias = "thumbnailUrl")]
    pub thumbnail_url: String,
}

/// Video query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQuery {
    pub user_id: Option<String>,
}
