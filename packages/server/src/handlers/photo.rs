use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use tracing::{info, instrument};

use crate::error::{AppError, Operation, OperationError};
use crate::models::photo::{MessageResponse, PhotoDataResponse, PhotoListResponse, PhotoResponse};
use crate::photos::{Outcome, PhotoService};
use crate::state::AppState;
use crate::upload::read_upload_form;

#[utoipa::path(
    post,
    path = "/add",
    tag = "Photos",
    operation_id = "createPhotos",
    summary = "Upload photos with a description",
    description = "Accepts up to five images in the `myImages` field plus a `description` field. \
        Every file must have a jpeg/jpg/png/gif extension and a matching content type, \
        otherwise nothing is stored. Creates one record per file, all sharing the description. \
        Files are stored under their original names; an existing file with the same name is replaced.",
    request_body(content_type = "multipart/form-data", description = "`myImages` files and `description` text"),
    responses(
        (status = 200, description = "`status` tells whether the records were created", body = MessageResponse),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_photos(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, OperationError> {
    create(&state, multipart)
        .await
        .map(Json)
        .map_err(|e| e.during(Operation::Create))
}

async fn create(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<MessageResponse, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let form = read_upload_form(multipart, &*state.store, &state.config.upload).await?;
    if form.files.is_empty() {
        return Err(AppError::Validation("At least one image is required".into()));
    }

    // A database failure after this point leaves the stored files in place.
    let paths = form.persist(&*state.store).await?;
    let inserted = PhotoService::new(&state.db)
        .create_many(form.description, &paths)
        .await?;

    info!(inserted, "Records created");
    Ok(MessageResponse::success("Record created successfully"))
}

#[utoipa::path(
    put,
    path = "/update/{id}",
    tag = "Photos",
    operation_id = "updatePhoto",
    summary = "Replace a record's photos and description",
    description = "Stores the uploaded `myImages` files and overwrites the record: `photo` becomes \
        the comma-joined list of the new paths and `description` the new description. \
        Previous values are discarded.",
    params(("id" = i32, Path, description = "Record ID")),
    request_body(content_type = "multipart/form-data", description = "`myImages` files and `description` text"),
    responses(
        (status = 200, description = "`status` tells whether the record was updated; \
            `message` is `Record not found` for unknown ids", body = MessageResponse),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn update_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, OperationError> {
    update(&state, &id, multipart)
        .await
        .map(Json)
        .map_err(|e| e.during(Operation::Update))
}

async fn update(
    state: &AppState,
    id: &str,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<MessageResponse, AppError> {
    let id = parse_id(id)?;
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let form = read_upload_form(multipart, &*state.store, &state.config.upload).await?;

    let service = PhotoService::new(&state.db);
    let existing = match service.find(id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            form.discard(&*state.store).await;
            return Err(AppError::NotFound);
        }
        Err(e) => {
            form.discard(&*state.store).await;
            return Err(e.into());
        }
    };

    let paths = form.persist(&*state.store).await?;
    service
        .replace(existing, form.description, paths.join(","))
        .await?;
    info!(id, files = paths.len(), "Record updated");
    Ok(MessageResponse::success("Record updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/delete/{id}",
    tag = "Photos",
    operation_id = "deletePhoto",
    summary = "Delete a record",
    description = "Permanently removes the record. The stored files are left on disk.",
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "`status` tells whether the record was deleted; \
            `message` is `Record not found` for unknown ids", body = MessageResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, OperationError> {
    delete(&state, &id)
        .await
        .map(Json)
        .map_err(|e| e.during(Operation::Delete))
}

async fn delete(state: &AppState, id: &str) -> Result<MessageResponse, AppError> {
    let id = parse_id(id)?;
    match PhotoService::new(&state.db).delete(id).await? {
        Outcome::Done(()) => {
            info!(id, "Record deleted");
            Ok(MessageResponse::success("Record deleted successfully"))
        }
        Outcome::NotFound => Err(AppError::NotFound),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Photos",
    operation_id = "listPhotos",
    summary = "List all records",
    responses(
        (status = 200, description = "Every record, oldest first", body = PhotoListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_photos(
    State(state): State<AppState>,
) -> Result<Json<PhotoListResponse>, OperationError> {
    let records = PhotoService::new(&state.db)
        .find_all()
        .await
        .map_err(|e| AppError::from(e).during(Operation::List))?;

    Ok(Json(PhotoListResponse {
        status: true,
        data: records.into_iter().map(PhotoResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Photos",
    operation_id = "getPhoto",
    summary = "Get a record by ID",
    params(("id" = i32, Path, description = "Record ID")),
    responses(
        (status = 200, description = "The record, or `{status: false, message: \"Record not found\"}`",
            body = PhotoDataResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhotoDataResponse>, OperationError> {
    get(&state, &id)
        .await
        .map(Json)
        .map_err(|e| e.during(Operation::Get))
}

async fn get(state: &AppState, id: &str) -> Result<PhotoDataResponse, AppError> {
    let id = parse_id(id)?;
    let record = PhotoService::new(&state.db)
        .find(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(PhotoDataResponse {
        status: true,
        data: record.into(),
    })
}

/// Ids are integers, so anything else can never name a record.
fn parse_id(id: &str) -> Result<i32, AppError> {
    id.trim().parse().map_err(|_| AppError::NotFound)
}
