/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Create, list and delete users
/// - `avatar`: Avatar upload

pub mod avatar;
pub mod health;
pub mod users;

use crate::error::ApiError;
use bytes::Bytes;
use userhub_shared::storage::FileStoreError;

/// File part of a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Base name sent by the client, directory components stripped
    pub file_name: String,

    /// File content
    pub data: Bytes,
}

/// Maps a failed write to the response every upload path uses
pub(crate) fn save_failed(err: FileStoreError) -> ApiError {
    tracing::error!(error = %err, "File save error");
    ApiError::FileStore("Failed to save file".to_string())
}
