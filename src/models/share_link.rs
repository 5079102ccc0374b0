use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::models::{LinkAccess, User};

/// Who may resolve a share link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PUBLIC" => Some(Visibility::Public),
            "PRIVATE" => Some(Visibility::Private),
            _ => None,
        }
    }
}

/// Share link model
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub id: String,
    pub video_id: String,
    pub creator_id: String,
    pub visibility: Visibility,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_viewed_at: Option<DateTime<Utc>>,
}

impl ShareLink {
    /// Expired once `expires_at` lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|e| e < now).unwrap_or(false)
    }
}

/// Share link with its relations attached
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkDetail {
    #[serde(flatten)]
    pub link: ShareLink,
    pub creator: Option<User>,
    pub user_whitelist: Vec<User>,
    pub accesses: Vec<LinkAccess>,
}

/// Request to create a share link
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub creator_id: Option<String>,
    pub video_id: Option<String>,
    pub visibility: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_whitelist: Vec<String>,
}

/// Partial update of a share link
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    pub visibility: Option<String>,
    /// Absent leaves the expiry alone, `null` clears it.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub user_whitelist: Option<Vec<String>>,
}

/// Distinguishes an explicit `null` from a missing field.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Link query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkQuery {
    pub video_id: Option<String>,
}

/// Viewer identity presented when opening a link
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveLinkRequest {
    pub viewer_email: Option<String>,
}

/// Outcome of a successful link resolution
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLink {
    pub share_link_id: String,
    pub video_id: String,
    pub redirect_to: String,
    pub access: LinkAccess,
}
