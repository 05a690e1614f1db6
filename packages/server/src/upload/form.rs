use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart};
use common::storage::{FileStore, StorageError, UploadedFile};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::validate::{validate_flat_filename, validate_image};
use crate::config::UploadConfig;
use crate::error::AppError;

/// Room for multipart boundaries, part headers and the text fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn upload_body_limit(config: &UploadConfig) -> DefaultBodyLimit {
    let files = usize::try_from(config.max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_mul(config.max_files);
    DefaultBodyLimit::max(files.saturating_add(MULTIPART_OVERHEAD))
}

/// A parsed upload request whose files are staged but not yet stored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub description: Option<String>,
    pub files: Vec<UploadedFile>,
}

impl UploadForm {
    /// Move every staged file into the storage directory, in upload order.
    ///
    /// Stops at the first failure. Files persisted before it stay on disk;
    /// the ones still staged are dropped.
    pub async fn persist(&self, store: &dyn FileStore) -> Result<Vec<String>, StorageError> {
        let mut paths = Vec::with_capacity(self.files.len());
        for file in &self.files {
            match store.persist(file).await {
                Ok(path) => paths.push(path),
                Err(e) => {
                    self.discard(store).await;
                    return Err(e);
                }
            }
        }
        Ok(paths)
    }

    /// Drop every staged file.
    pub async fn discard(&self, store: &dyn FileStore) {
        for file in &self.files {
            if let Err(e) = store.discard(file).await {
                warn!(file = %file.temp_path.display(), error = %e, "Failed to discard staged upload");
            }
        }
    }
}

/// Read a multipart upload, checking every file before its body is read.
///
/// Files are only staged. If any part is rejected, the files staged so far
/// are discarded and nothing reaches the storage directory.
pub async fn read_upload_form(
    mut multipart: Multipart,
    store: &dyn FileStore,
    config: &UploadConfig,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    match collect_fields(&mut multipart, store, config, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) => {
            form.discard(store).await;
            Err(e)
        }
    }
}

async fn collect_fields(
    multipart: &mut Multipart,
    store: &dyn FileStore,
    config: &UploadConfig,
    form: &mut UploadForm,
) -> Result<(), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        let Some(filename) = field.file_name().map(str::to_string) else {
            if name == "description" {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read description: {e}")))?;
                form.description = Some(text);
            }
            // Ignore unknown text fields.
            continue;
        };

        if name != config.field_name {
            return Err(AppError::Validation(format!("Unexpected field '{name}'")));
        }
        if form.files.len() >= config.max_files {
            return Err(AppError::Validation(format!(
                "Too many files: max {}",
                config.max_files
            )));
        }

        let filename = validate_flat_filename(&filename)
            .map_err(|e| AppError::Validation(e.message().into()))?
            .to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        validate_image(&filename, &mime_type)
            .map_err(|e| AppError::Validation(format!("{e} ({filename}, {mime_type})")))?;

        let file = stage_field(field, store, filename, mime_type, config.max_file_size).await?;
        debug!(file = %file.original_name, size = file.size_bytes, "Staged upload");
        form.files.push(file);
    }

    Ok(())
}

/// Stream a multipart field into the store's staging area.
async fn stage_field(
    mut field: Field<'_>,
    store: &dyn FileStore,
    original_name: String,
    mime_type: String,
    max_size: u64,
) -> Result<UploadedFile, AppError> {
    let temp_path = store.staging_path();

    let result: Result<u64, AppError> = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(StorageError::from)?;

        let mut total_size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(StorageError::SizeLimitExceeded {
                    actual: total_size,
                    limit: max_size,
                }
                .into());
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(StorageError::from)?;
        }

        temp_file.flush().await.map_err(StorageError::from)?;
        Ok(total_size)
    }
    .await;

    match result {
        Ok(size_bytes) => Ok(UploadedFile {
            original_name,
            mime_type,
            size_bytes,
            temp_path,
        }),
        Err(e) => {
            // Best effort.
            let _ = tokio::fs::remove_file(&temp_path).await;
            Err(e)
        }
    }
}
