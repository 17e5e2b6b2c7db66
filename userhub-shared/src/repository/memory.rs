/// In-memory user repository
///
/// Keeps rows in a vector behind an async lock and hands out ids from a
/// counter starting at 1, the way a `SERIAL` column does. It is the
/// database-less variant of the service and the backend used by the API
/// integration tests.
///
/// A failure can be injected with [`InMemoryUserRepository::fail_with`]; every
/// operation then returns [`RepositoryError::Unavailable`] carrying that
/// message until [`InMemoryUserRepository::recover`] is called.

use super::{RepositoryError, RepositoryResult, UserRepository};
use crate::models::user::{NewUser, User};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug)]
struct State {
    users: Vec<User>,
    next_id: i32,
    failure: Option<String>,
}

impl State {
    fn check(&self) -> RepositoryResult<()> {
        match &self.failure {
            Some(message) => Err(RepositoryError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

/// User repository backed by process memory
#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                users: Vec::new(),
                next_id: 1,
                failure: None,
            }),
        }
    }

    /// Makes every following operation fail with `message`
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.write().await.failure = Some(message.into());
    }

    /// Clears an injected failure
    pub async fn recover(&self) {
        self.state.write().await.failure = None;
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new_user: NewUser) -> RepositoryResult<i32> {
        let mut state = self.state.write().await;
        state.check()?;

        let id = state.next_id;
        state.next_id += 1;
        state.users.push(User {
            id,
            username: new_user.username,
            email: new_user.email,
            comment: new_user.comment,
            avatar: new_user.avatar,
        });

        Ok(id)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let state = self.state.read().await;
        state.check()?;
        Ok(state.users.clone())
    }

    async fn delete_by_username(&self, username: &str) -> RepositoryResult<u64> {
        let mut state = self.state.write().await;
        state.check()?;

        let before = state.users.len();
        state.users.retain(|user| user.username != username);
        Ok((before - state.users.len()) as u64)
    }

    async fn update_avatar_path(&self, id: i32, path: &str) -> RepositoryResult<u64> {
        let mut state = self.state.write().await;
        state.check()?;

        match state.users.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.avatar = Some(path.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> RepositoryResult<()> {
        self.state.read().await.check()
    }
}
