/// Route label for the health check
pub const ROUTE_HEALTHZ: &str = "/healthz";

/// Route label for the file collection
pub const ROUTE_FILES: &str = "/file";

/// Route label for a single file
pub const ROUTE_FILE_BY_ID: &str = "/file/{id}";

/// Item path with the id left out
pub const ROUTE_FILE_MISSING_ID: &str = "/file/";

// =============================================================================
// HEALTH CHECK HEADERS
// =============================================================================

pub const CACHE_CONTROL_NO_CACHE: &str = "no-cache, no-store, must-revalidate";

pub const PRAGMA_NO_CACHE: &str = "no-cache";

pub const CONTENT_TYPE_OPTIONS_NOSNIFF: &str = "nosniff";

// =============================================================================
// ERROR MESSAGES
// =============================================================================

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "server responds with 405 Method Not Allowed";

pub const NOT_FOUND_MESSAGE: &str = "Not found";

pub const BAD_REQUEST_MESSAGE: &str = "Bad Request";

pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file";

/// Content type recorded when the client does not send one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
