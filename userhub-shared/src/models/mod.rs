/// Database models for userhub
///
/// # Models
///
/// - `user`: The user row and its insert input
///
/// # Example
///
/// ```
/// use userhub_shared::models::user::{User, DEFAULT_AVATAR};
///
/// let user = User {
///     id: 1,
///     username: "alice".to_string(),
///     email: "a@x.com".to_string(),
///     comment: "hi".to_string(),
///     avatar: None,
/// };
///
/// assert_eq!(user.display_avatar(), DEFAULT_AVATAR);
/// ```

pub mod user;
