/// Avatar upload endpoint
///
/// # Endpoint
///
/// - `POST /users/:id/avatar` - Upload avatar (multipart form, field `file`)

use super::{save_failed, UploadedFile};
use crate::{
    app::{AppState, AVATARS_DIR},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use userhub_shared::storage::{base_name, extension};

/// Name of the multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Upload avatar response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadAvatarResponse {
    pub message: String,

    /// Relative path of the stored avatar, `avatars/<id><ext>`
    pub avatar_url: String,
}

/// Parses a user id path segment; only positive integers are accepted
pub fn parse_user_id(raw: &str) -> ApiResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest("Invalid user id".to_string())),
    }
}

/// Relative path an avatar for `id` is stored under
///
/// The extension of the uploaded name is kept as sent, `photo.PNG` for user
/// 3 gives `avatars/3.PNG`.
pub fn avatar_path(id: i32, file_name: &str) -> String {
    format!("{}/{}{}", AVATARS_DIR, id, extension(file_name))
}

fn upload_failed(err: impl std::fmt::Display) -> ApiError {
    warn!(error = %err, "File upload error");
    ApiError::BadRequest("File upload failed".to_string())
}

/// Pulls the first `file` part that carries a file name
async fn read_file_part(mut multipart: Multipart) -> ApiResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await.map_err(upload_failed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().and_then(base_name).map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(upload_failed)?;

        return Ok(Some(UploadedFile { file_name, data }));
    }

    Ok(None)
}

/// Upload avatar
///
/// # Endpoint
///
/// ```text
/// POST /users/:id/avatar
/// Content-Type: multipart/form-data
///
/// file=@photo.png
/// ```
///
/// # Response
///
/// ```json
/// { "message": "Avatar uploaded successfully!", "avatar_url": "avatars/1.png" }
/// ```
///
/// The file is written before the database update and only published under
/// `avatars/<id><ext>` once the update went through. Uploading again replaces
/// the file and the stored path. An id without a user row updates nothing and
/// still answers 200; the file is kept.
///
/// # Errors
///
/// - `400 Bad Request`: `id` is not a positive integer, or no `file` part was sent
/// - `500 Internal Server Error`: File could not be written, or the update failed
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadAvatarResponse>> {
    let id = parse_user_id(&raw_id)?;

    let file = read_file_part(multipart.map_err(upload_failed)?)
        .await?
        .ok_or_else(|| upload_failed(format!("missing {:?} part", FILE_FIELD)))?;

    let relative = avatar_path(id, &file.file_name);
    let staged = state
        .files
        .stage(&relative, &file.data)
        .await
        .map_err(save_failed)?;

    match state.users.update_avatar_path(id, &relative).await {
        Ok(0) => warn!(id, avatar = %relative, "Avatar uploaded for an id with no user row"),
        Ok(_) => {}
        Err(err) => {
            error!(id, error = %err, "Database update error");
            staged.discard().await;
            return Err(ApiError::Persistence("Failed to update database".to_string()));
        }
    }

    let avatar_url = staged.commit().await.map_err(save_failed)?;
    info!(id, avatar = %avatar_url, bytes = file.data.len(), "Avatar uploaded");

    Ok(Json(UploadAvatarResponse {
        message: "Avatar uploaded successfully!".to_string(),
        avatar_url,
    }))
}
