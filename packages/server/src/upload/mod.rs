pub mod form;
pub mod validate;

pub use form::{UploadForm, read_upload_form, upload_body_limit};
pub use validate::{FilenameError, UploadRejection, validate_flat_filename, validate_image};
