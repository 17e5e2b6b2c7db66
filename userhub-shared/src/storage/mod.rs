/// Local file store for uploaded files
///
/// Files are addressed by a relative path such as `uploads/photo.png` or
/// `avatars/1.png`, resolved against a root directory. The relative path is
/// also the identifier stored in the database and returned to clients.
///
/// Writes happen in two steps. [`FileStore::stage`] writes the bytes to a
/// hidden temporary file next to the destination; [`StagedFile::commit`]
/// renames it into place, replacing any file of the same name. A staged file
/// that is not wanted any more is removed with [`StagedFile::discard`]. This
/// lets callers write the bytes before a database write and only publish
/// them once that write has succeeded.
///
/// # Example
///
/// ```no_run
/// use userhub_shared::storage::FileStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileStore::new("/var/lib/userhub");
///
/// let staged = store.stage("avatars/1.png", b"\x89PNG...").await?;
/// // ... database write ...
/// let path = staged.commit().await?;
/// assert_eq!(path, "avatars/1.png");
/// # Ok(())
/// # }
/// ```

use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// File store error types
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// Relative path escapes the root or is empty
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    /// Filesystem operation failed
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileStoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        FileStoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Filesystem-backed store rooted at one directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`
    ///
    /// The directory does not need to exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative identifier to an absolute location under the root
    ///
    /// # Errors
    ///
    /// Returns [`FileStoreError::InvalidName`] for empty or absolute paths and
    /// for paths containing `.` or `..` components.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, FileStoreError> {
        let path = Path::new(relative);
        let well_formed = !relative.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !well_formed {
            return Err(FileStoreError::InvalidName(relative.to_string()));
        }

        Ok(self.root.join(path))
    }

    /// Writes `data` next to `relative` without publishing it
    ///
    /// Parent directories are created as needed.
    pub async fn stage(&self, relative: &str, data: &[u8]) -> Result<StagedFile, FileStoreError> {
        let target = self.resolve(relative)?;
        let dir = match target.parent() {
            Some(dir) => dir.to_path_buf(),
            None => self.root.clone(),
        };

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| FileStoreError::io(&dir, e))?;

        let temp = dir.join(format!(".{}.part", Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&temp, data).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(FileStoreError::io(&temp, e));
        }

        debug!(path = %relative, bytes = data.len(), "Staged file");
        Ok(StagedFile {
            relative: relative.to_string(),
            temp,
            target,
        })
    }
}

/// Bytes written to disk but not yet visible under their final name
#[derive(Debug)]
#[must_use = "a staged file must be committed or discarded"]
pub struct StagedFile {
    relative: String,
    temp: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    /// Relative identifier the file will be published under
    pub fn relative_path(&self) -> &str {
        &self.relative
    }

    /// Publishes the file under its final name, replacing any previous file
    ///
    /// Returns the relative identifier.
    pub async fn commit(self) -> Result<String, FileStoreError> {
        if let Err(e) = tokio::fs::rename(&self.temp, &self.target).await {
            let _ = tokio::fs::remove_file(&self.temp).await;
            return Err(FileStoreError::io(&self.target, e));
        }

        debug!(path = %self.relative, "Committed file");
        Ok(self.relative)
    }

    /// Removes the staged bytes
    pub async fn discard(self) {
        match tokio::fs::remove_file(&self.temp).await {
            Ok(()) => debug!(path = %self.relative, "Discarded staged file"),
            Err(e) => warn!(
                path = %self.relative,
                temp = %self.temp.display(),
                error = %e,
                "Failed to discard staged file"
            ),
        }
    }
}

/// Last component of a client-supplied file name
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable
/// is left (`""`, `.` or `..`).
pub fn base_name(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    match base {
        "" | "." | ".." => None,
        base => Some(base),
    }
}

/// Extension of a file name, including the leading dot
///
/// Taken from the last `.` of the base name, case preserved. Returns an empty
/// string when there is none.
pub fn extension(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    match base.rfind('.') {
        Some(index) => &base[index..],
        None => "",
    }
}
