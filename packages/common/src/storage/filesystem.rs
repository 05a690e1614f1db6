use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::error::StorageError;
use super::traits::FileStore;
use super::upload::UploadedFile;

/// Filesystem-backed photo store.
///
/// Files are kept flat in `base_path` under the name the client uploaded
/// them with: `{base_path}/{original_name}`. Staged uploads live in
/// `staging_path` until they are persisted or discarded.
pub struct FilesystemFileStore {
    base_path: PathBuf,
    staging_path: PathBuf,
}

impl FilesystemFileStore {
    /// Create a new filesystem store, creating both directories if needed.
    pub async fn new(base_path: PathBuf, staging_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(&staging_path).await?;
        Ok(Self {
            base_path,
            staging_path,
        })
    }

    fn stored_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let flat = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains('\0');
        if !flat {
            return Err(StorageError::InvalidFilename(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }
}

#[async_trait]
impl FileStore for FilesystemFileStore {
    fn root(&self) -> &Path {
        &self.base_path
    }

    fn staging_path(&self) -> PathBuf {
        self.staging_path.join(uuid::Uuid::new_v4().to_string())
    }

    async fn persist(&self, file: &UploadedFile) -> Result<String, StorageError> {
        let target = self.stored_path(&file.original_name)?;

        match fs::metadata(&file.temp_path).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(
                    file.temp_path.display().to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        // rename fails across filesystems (e.g. staging in tmpfs).
        if let Err(e) = fs::rename(&file.temp_path, &target).await {
            debug!(error = %e, "rename failed, copying staged file instead");
            fs::copy(&file.temp_path, &target).await?;
            let _ = fs::remove_file(&file.temp_path).await;
        }

        Ok(target.to_string_lossy().into_owned())
    }

    async fn discard(&self, file: &UploadedFile) -> Result<(), StorageError> {
        match fs::remove_file(&file.temp_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
