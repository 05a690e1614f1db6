use axum::{
    Json,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;

use crate::models::photo::MessageResponse;

pub const NOT_FOUND_MESSAGE: &str = "Record not found";

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request was refused before anything was persisted.
    #[error("{0}")]
    Validation(String),
    #[error("Record not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl AppError {
    /// Attach the operation that failed, which decides what the client sees.
    pub fn during(self, operation: Operation) -> OperationError {
        OperationError {
            operation,
            error: self,
        }
    }
}

/// The five record operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    List,
    Get,
}

impl Operation {
    /// Generic message returned for any failure other than not-found.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Create => "Record creation failed",
            Operation::Update => "Record update failed",
            Operation::Delete => "Record deletion failed",
            Operation::List => "Error fetching records",
            Operation::Get => "Error fetching record",
        }
    }
}

/// A failed operation, rendered as a `{status: false, message}` envelope.
///
/// Always HTTP 200; the `status` field is the only success indicator.
/// Error detail is logged here and never sent to the client.
#[derive(Debug)]
pub struct OperationError {
    pub operation: Operation,
    pub error: AppError,
}

impl OperationError {
    pub fn message(&self) -> &'static str {
        match self.error {
            AppError::NotFound => NOT_FOUND_MESSAGE,
            _ => self.operation.failure_message(),
        }
    }
}

impl IntoResponse for OperationError {
    fn into_response(self) -> Response {
        let operation = self.operation;
        match &self.error {
            AppError::NotFound => tracing::warn!(?operation, "Record not found"),
            AppError::Validation(reason) => {
                tracing::warn!(?operation, %reason, "Upload rejected")
            }
            AppError::Storage(e @ StorageError::SizeLimitExceeded { .. }) => {
                tracing::warn!(?operation, reason = %e, "Upload rejected")
            }
            AppError::Storage(e) => tracing::error!(?operation, error = %e, "Storage failure"),
            AppError::Database(e) => tracing::error!(?operation, error = %e, "Database failure"),
        }

        Json(MessageResponse::failure(self.message())).into_response()
    }
}
