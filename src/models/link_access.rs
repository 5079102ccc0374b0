use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One recorded resolution of a share link. Never updated once written.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAccess {
    pub id: String,
    pub share_link_id: String,
    pub video_id: String,
    pub viewer_email: Option<String>,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAccessRequest {
    pub share_link_id: Option<String>,
    pub video_id: Option<String>,
    pub viewer_email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessQuery {
    pub video_id: Option<String>,
}
