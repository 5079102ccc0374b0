use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

use crate::models::User;

pub struct UserRepository;

impl UserRepository {
    /// Insert a user, or sync email and name when the id already exists
    pub async fn upsert<'e, E: SqliteExecutor<'e>>(
        executor: E,
        id: &str,
        email: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_by_id<'e, E: SqliteExecutor<'e>>(
        executor: E,
        id: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Email comparison is case-insensitive (the column is `COLLATE NOCASE`)
    pub async fn find_by_email<'e, E: SqliteExecutor<'e>>(
        executor: E,
        email: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(executor)
            .await
    }
}
