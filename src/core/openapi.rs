use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::health::handlers as health_handlers;
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health_handlers::health_check,
        // Files
        files_handlers::upload_file,
        files_handlers::get_file,
        files_handlers::delete_file,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
        )
    ),
    tags(
        (name = "health", description = "Liveness check backed by a database write"),
        (name = "files", description = "File upload, lookup and deletion"),
    ),
    info(
        title = "Webapp API",
        version = "0.1.0",
        description = "API documentation for the webapp service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/healthz"));
        assert!(doc.paths.paths.contains_key("/file"));
        assert!(doc.paths.paths.contains_key("/file/{id}"));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Files".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Files");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("desc"));
    }
}
