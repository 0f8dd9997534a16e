use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::dtos::MULTIPART_OVERHEAD;
use crate::features::files::handlers::{
    collection_method_not_allowed, delete_file, get_file, item_method_not_allowed,
    reject_missing_id, upload_file,
};
use crate::features::files::services::FileService;
use crate::shared::constants::{ROUTE_FILES, ROUTE_FILE_BY_ID, ROUTE_FILE_MISSING_ID};

/// Create routes for the files feature
///
/// HEAD is routed explicitly so it is refused instead of falling through to
/// the GET handler. `/file/` is an item path without an id and is answered
/// like the collection's GET and DELETE.
pub fn routes(file_service: Arc<FileService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            ROUTE_FILES,
            // Allow the configured file size plus multipart framing
            post(upload_file)
                .layer(DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD))
                .get(reject_missing_id)
                .delete(reject_missing_id)
                .head(collection_method_not_allowed)
                .fallback(collection_method_not_allowed),
        )
        .route(
            ROUTE_FILE_MISSING_ID,
            get(reject_missing_id)
                .delete(reject_missing_id)
                .head(item_method_not_allowed)
                .fallback(item_method_not_allowed),
        )
        .route(
            ROUTE_FILE_BY_ID,
            get(get_file)
                .delete(delete_file)
                .head(item_method_not_allowed)
                .fallback(item_method_not_allowed),
        )
        .with_state(file_service)
}
