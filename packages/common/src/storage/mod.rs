mod error;
mod traits;
mod upload;

pub mod filesystem;

pub use error::StorageError;
pub use traits::FileStore;
pub use upload::UploadedFile;
