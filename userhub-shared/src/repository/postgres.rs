/// PostgreSQL user repository
///
/// Issues plain parameterised statements against the `users` table through a
/// shared `PgPool`. The pool is cheap to clone, so the repository is too.

use super::{RepositoryResult, UserRepository};
use crate::db::pool::health_check;
use crate::models::user::{NewUser, User};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// User repository backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, new_user: NewUser) -> RepositoryResult<i32> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, comment, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(new_user.username)
        .bind(new_user.email)
        .bind(new_user.comment)
        .bind(new_user.avatar)
        .fetch_one(&self.pool)
        .await?;

        debug!(id, "Inserted user");
        Ok(id)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, comment, avatar
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete_by_username(&self, username: &str) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_avatar_path(&self, id: i32, path: &str) -> RepositoryResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET avatar = $1
            WHERE id = $2
            "#,
        )
        .bind(path)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}
