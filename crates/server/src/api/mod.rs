//! HTTP API layer.
//!
//! Maps the `/api/v1/fs` surface onto the sandboxed file service and
//! translates service errors into HTTP statuses with structured JSON
//! bodies. The routes carry no state beyond a shared [`FileService`]
//! handle.

mod error;
mod fs;

pub use error::ApiError;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use sandfs::FileService;

/// Build the API router for a file service.
///
/// Both the bare prefix (the sandbox root) and the wildcard form are
/// routed; axum percent-decodes the wildcard segment before it reaches the
/// handlers. The default body limit is lifted because file content arrives
/// through request bodies; JSON bodies are bounded separately in the
/// handlers.
pub fn router(service: Arc<FileService>) -> Router {
    let handlers = get(fs::get_node)
        .post(fs::post_node)
        .put(fs::put_node)
        .delete(fs::delete_node)
        .patch(fs::patch_node);

    Router::new()
        .route("/api/v1/fs", handlers.clone())
        .route("/api/v1/fs/{*path}", handlers)
        .layer(DefaultBodyLimit::disable())
        .with_state(service)
}
