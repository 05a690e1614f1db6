use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::StorageError;
use super::upload::UploadedFile;

/// Local storage for uploaded photo files.
///
/// Uploads are first written to a staging location, then moved into the
/// storage directory under their original filename once the whole request
/// has been accepted.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Directory that persisted files live in.
    fn root(&self) -> &Path;

    /// A fresh, unused path in the staging area.
    fn staging_path(&self) -> PathBuf;

    /// Move a staged file into the storage directory.
    ///
    /// Any existing file with the same name is overwritten. Returns the
    /// stored path as recorded in the database.
    async fn persist(&self, file: &UploadedFile) -> Result<String, StorageError>;

    /// Remove a staged file that will not be persisted.
    async fn discard(&self, file: &UploadedFile) -> Result<(), StorageError>;
}
