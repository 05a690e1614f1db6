use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::UploadConfig;
use crate::handlers;
use crate::state::AppState;
use crate::upload::upload_body_limit;

pub fn api_routes(upload: &UploadConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/fileuploaded", photo_routes(upload))
}

fn photo_routes(upload: &UploadConfig) -> OpenApiRouter<AppState> {
    let records = OpenApiRouter::new()
        .routes(routes!(handlers::photo::list_photos))
        .routes(routes!(handlers::photo::get_photo))
        .routes(routes!(handlers::photo::delete_photo));

    let uploads = OpenApiRouter::new()
        .routes(routes!(handlers::photo::create_photos))
        .routes(routes!(handlers::photo::update_photo))
        .layer(upload_body_limit(upload));

    records.merge(uploads)
}
