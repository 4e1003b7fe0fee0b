//! Application router.
//!
//! Returns a composable `Router` wired to the shared `AppContext`:
//! the HTML form surface at `/` and the JSON API under `/api/`.

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::AppContext;

/// Build the application router.
pub fn app_router(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/",
            get(endpoints::classify::index).post(endpoints::classify::submit),
        )
        .route("/api/classify", post(endpoints::classify::classify_json))
        .route("/api/health", get(endpoints::health::check))
        .with_state(ctx)
}
