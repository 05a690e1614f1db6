use serde::Serialize;

use crate::entity::photo;

/// Status envelope carrying only a message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    /// Whether the operation succeeded.
    #[schema(example = true)]
    pub status: bool,
    #[schema(example = "Record created successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: &str) -> Self {
        Self {
            status: true,
            message: message.to_string(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            status: false,
            message: message.to_string(),
        }
    }
}

/// A stored photo record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PhotoResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "cat")]
    pub description: Option<String>,
    /// Stored path, or several comma-joined paths after an update.
    #[schema(example = "public/cat.png")]
    pub photo: String,
}

impl From<photo::Model> for PhotoResponse {
    fn from(model: photo::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            photo: model.photo,
        }
    }
}

/// Envelope returned by the list endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PhotoListResponse {
    #[schema(example = true)]
    pub status: bool,
    pub data: Vec<PhotoResponse>,
}

/// Envelope returned when fetching a single record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PhotoDataResponse {
    #[schema(example = true)]
    pub status: bool,
    pub data: PhotoResponse,
}
