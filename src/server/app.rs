//! Application setup and router configuration.

use std::path::Path;
use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::server::routes::{health_handler, make_pdfs_handler};
use crate::service::PdfService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PdfService>,
}

/// Build the Axum application router.
///
/// When `static_dir` is given its files are served under `/static`.
pub fn build_app(service: Arc<PdfService>, static_dir: Option<&Path>) -> Router {
    // CORS configuration - allow any origin for the bundled frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/make-pdfs", post(make_pdfs_handler));

    if let Some(dir) = static_dir {
        tracing::info!("Serving static files from {}", dir.display());
        router = router.nest_service("/static", ServeDir::new(dir).append_index_html_on_directories(true));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}
