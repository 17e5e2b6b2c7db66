/// User endpoints
///
/// # Endpoints
///
/// - `GET /users` - List users
/// - `POST /users` - Create user (multipart form)
/// - `DELETE /users/:username` - Delete user(s) by username

use super::{save_failed, UploadedFile};
use crate::{
    app::{AppState, UPLOADS_DIR},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use userhub_shared::{
    models::user::{NewUser, User},
    storage::base_name,
};

/// User as returned by the list endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub comment: String,

    /// Stored avatar path, or the default avatar when none was ever stored
    pub avatar: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let avatar = user.display_avatar().to_string();
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            comment: user.comment,
            avatar,
        }
    }
}

/// Create user response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,

    /// Database-assigned id
    pub id: i32,

    /// Stored avatar path, empty when no file was sent
    pub avatar: String,
}

/// Plain confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Parsed create user form
#[derive(Debug, Default)]
struct CreateUserForm {
    username: String,
    email: String,
    comment: String,
    avatar: Option<UploadedFile>,
}

fn invalid_form(err: impl std::fmt::Display) -> ApiError {
    warn!(error = %err, "Malformed create user form");
    ApiError::BadRequest("Invalid form data".to_string())
}

/// Reads the create user form
///
/// Missing text fields stay empty. An `avatar` part without a usable file
/// name, which is what browsers send when no file was picked, is ignored.
async fn read_create_form(mut multipart: Multipart) -> ApiResult<CreateUserForm> {
    let mut form = CreateUserForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "username" => form.username = field.text().await.map_err(invalid_form)?,
            "email" => form.email = field.text().await.map_err(invalid_form)?,
            "comment" => form.comment = field.text().await.map_err(invalid_form)?,
            "avatar" => {
                let file_name = field.file_name().and_then(base_name).map(str::to_string);
                let data = field.bytes().await.map_err(invalid_form)?;

                if let Some(file_name) = file_name {
                    form.avatar = Some(UploadedFile { file_name, data });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Create user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: multipart/form-data
///
/// username=alice, email=a@x.com, comment=hi, avatar=@photo.png (optional)
/// ```
///
/// # Response
///
/// ```json
/// { "message": "User added", "id": 1, "avatar": "uploads/photo.png" }
/// ```
///
/// The file is written under `uploads/<basename>` before the insert and only
/// published once the insert succeeded. A file with the same name is replaced.
///
/// # Errors
///
/// - `400 Bad Request`: Body is not a readable multipart form
/// - `500 Internal Server Error`: File could not be written, or the insert
///   failed (database message returned as is)
///
/// A file that cannot be moved into place after the insert still answers 500,
/// but the row stays; a client retrying the request adds a second row.
pub async fn create_user(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<CreateUserResponse>> {
    let form = read_create_form(multipart.map_err(invalid_form)?).await?;

    let staged = match &form.avatar {
        Some(file) => {
            let relative = format!("{}/{}", UPLOADS_DIR, file.file_name);
            Some(state.files.stage(&relative, &file.data).await.map_err(save_failed)?)
        }
        None => None,
    };
    let avatar = staged.as_ref().map(|file| file.relative_path().to_string());

    let new_user = NewUser {
        username: form.username,
        email: form.email,
        comment: form.comment,
        avatar: avatar.clone(),
    };
    let username = new_user.username.clone();

    let id = match state.users.insert(new_user).await {
        Ok(id) => id,
        Err(err) => {
            if let Some(staged) = staged {
                staged.discard().await;
            }
            return Err(err.into());
        }
    };

    if let Some(staged) = staged {
        staged.commit().await.map_err(save_failed)?;
    }

    info!(id, username = %username, avatar = ?avatar, "User added");

    Ok(Json(CreateUserResponse {
        message: "User added".to_string(),
        id,
        avatar: avatar.unwrap_or_default(),
    }))
}

/// List users
///
/// # Endpoint
///
/// ```text
/// GET /users
/// ```
///
/// # Response
///
/// ```json
/// [
///   { "id": 1, "username": "alice", "email": "a@x.com", "comment": "hi", "avatar": "alex.jpg" }
/// ]
/// ```
///
/// Users without a stored avatar are reported with the default avatar. The
/// order is whatever the backend returns.
///
/// # Errors
///
/// - `500 Internal Server Error`: Query failed (database message returned as is)
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.list_all().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Delete user
///
/// Removes every row whose username matches exactly. Stored avatar files are
/// left on disk.
///
/// # Endpoint
///
/// ```text
/// DELETE /users/:username
/// ```
///
/// # Response
///
/// ```json
/// { "message": "User deleted successfully" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: `{"message": "User does not exist", "username": "..."}`
/// - `500 Internal Server Error`: Delete failed (database message returned as is)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = state.users.delete_by_username(&username).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound {
            key: "username",
            value: json!(username),
        });
    }

    if deleted > 1 {
        warn!(username = %username, deleted, "Username matched several users");
    }
    info!(username = %username, deleted, "User deleted");

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
