/// User model
///
/// This module provides the `User` row type and the `NewUser` insert input.
/// Persistence lives behind the `UserRepository` trait in
/// [`crate::repository`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id       SERIAL PRIMARY KEY,
///     username TEXT NOT NULL,
///     email    TEXT NOT NULL,
///     comment  TEXT NOT NULL,
///     avatar   TEXT
/// );
/// ```
///
/// `avatar` is nullable. A NULL avatar stays `None` all the way through the
/// data layer; only the presentation layer swaps in [`DEFAULT_AVATAR`].

use serde::{Deserialize, Serialize};

/// Avatar reported to clients for users that never had one stored
pub const DEFAULT_AVATAR: &str = "alex.jpg";

/// User row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Database-assigned identifier, never changes after insert
    pub id: i32,

    /// Login name, also the key used by delete
    ///
    /// Not unique at the schema level.
    pub username: String,

    /// Email address
    pub email: String,

    /// Free text, may be empty
    pub comment: String,

    /// Relative path of the stored avatar file, `None` when NULL
    pub avatar: Option<String>,
}

impl User {
    /// Avatar to show to clients
    ///
    /// Returns the stored path, or [`DEFAULT_AVATAR`] when the column is NULL.
    /// A stored empty string is returned as is.
    pub fn display_avatar(&self) -> &str {
        self.avatar.as_deref().unwrap_or(DEFAULT_AVATAR)
    }
}

/// Input for inserting a new user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Free text
    pub comment: String,

    /// Avatar path; `None` is stored as NULL
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(avatar: Option<&str>) -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            comment: String::new(),
            avatar: avatar.map(str::to_string),
        }
    }

    #[test]
    fn test_display_avatar_substitutes_null() {
        assert_eq!(user(None).display_avatar(), "alex.jpg");
    }

    #[test]
    fn test_display_avatar_keeps_stored_value() {
        assert_eq!(user(Some("avatars/7.png")).display_avatar(), "avatars/7.png");
        assert_eq!(user(Some("")).display_avatar(), "");
    }

    #[test]
    fn test_new_user_default() {
        let new_user = NewUser::default();
        assert!(new_user.username.is_empty());
        assert!(new_user.avatar.is_none());
    }
}
