pub mod storage;

pub use storage::{FileStore, StorageError, UploadedFile};
