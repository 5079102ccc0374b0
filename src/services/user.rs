use chrono::Utc;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{normalize_email, ProvisionUserRequest, User};
use crate::repository::UserRepository;

/// User service
pub struct UserService;

impl UserService {
    /// Provision a user from the identity provider.
    ///
    /// The first sign-in creates the row; later sign-ins only sync email and name.
    pub async fn provision_user(db: &Database, req: ProvisionUserRequest) -> Result<User> {
        let id = req
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::InvalidArgument("ID is required".to_string()))?;
        let email = req
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AppError::InvalidArgument("Email is required".to_string()))?;

        UserRepository::upsert(db.pool(), &id, &email, req.name.trim(), Utc::now())
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::InvalidArgument("Email already belongs to another user".to_string())
                }
                _ => AppError::Storage(e),
            })?;

        tracing::debug!("Provisioned user {}", id);
        Self::get_user(db, &id).await
    }

    /// Get user by ID
    pub async fn get_user(db: &Database, user_id: &str) -> Result<User> {
        UserRepository::find_by_id(db.pool(), user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
