use std::path::PathBuf;

/// A file received from a client and staged on disk, not yet in the
/// storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Filename as sent by the client. Used verbatim as the stored name.
    pub original_name: String,
    /// Content type declared by the client. Not sniffed.
    pub mime_type: String,
    pub size_bytes: u64,
    /// Location of the staged bytes.
    pub temp_path: PathBuf,
}
