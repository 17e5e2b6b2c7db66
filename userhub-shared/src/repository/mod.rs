/// User repository contract
///
/// This module defines the persistence operations the request handlers rely
/// on. Handlers hold an `Arc<dyn UserRepository>` and never see SQL.
///
/// # Implementations
///
/// - [`PgUserRepository`]: PostgreSQL via sqlx
/// - [`InMemoryUserRepository`]: lock-protected vector, for tests and demos
///
/// # Example
///
/// ```
/// use userhub_shared::models::user::NewUser;
/// use userhub_shared::repository::{InMemoryUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryUserRepository::new();
///
/// let id = repo
///     .insert(NewUser {
///         username: "alice".to_string(),
///         email: "a@x.com".to_string(),
///         comment: "hi".to_string(),
///         avatar: None,
///     })
///     .await?;
///
/// repo.update_avatar_path(id, "avatars/1.png").await?;
/// assert_eq!(repo.delete_by_username("alice").await?, 1);
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

use crate::models::user::{NewUser, User};
use async_trait::async_trait;

/// Repository error types
///
/// The `Display` text of these errors is forwarded to clients verbatim by
/// several endpoints.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Query, constraint or connectivity failure reported by the driver
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Backend refused the operation
    #[error("{0}")]
    Unavailable(String),
}

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence operations over the `users` table
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a row and returns its database-assigned id
    async fn insert(&self, new_user: NewUser) -> RepositoryResult<i32>;

    /// Returns every row in backend order
    ///
    /// No ordering is guaranteed.
    async fn list_all(&self) -> RepositoryResult<Vec<User>>;

    /// Deletes every row whose username matches exactly, returning the count
    async fn delete_by_username(&self, username: &str) -> RepositoryResult<u64>;

    /// Overwrites the avatar path of one row, returning the rows affected
    ///
    /// An unknown id yields `Ok(0)`.
    async fn update_avatar_path(&self, id: i32, path: &str) -> RepositoryResult<u64>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> RepositoryResult<()>;
}
