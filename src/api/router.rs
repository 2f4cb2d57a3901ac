//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
//! Endpoint handlers use `State<ApiContext>` (provided via `with_state`).

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the full API router.
///
/// Everything except registration, login, and the liveness probes sits
/// behind bearer token authentication.
pub fn api_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route("/auth/me", get(endpoints::auth::me))
        .route("/screening/predict", post(endpoints::screening::predict))
        .route("/screening/history", get(endpoints::screening::history))
        .route("/screening/:id", get(endpoints::screening::detail))
        .route("/admin/patients", get(endpoints::admin::patients))
        .route("/admin/statistics", get(endpoints::admin::statistics))
        .route(
            "/admin/patient/:id/screenings",
            get(endpoints::admin::patient_screenings),
        )
        .route(
            "/admin/high-risk-screenings",
            get(endpoints::admin::high_risk_screenings),
        )
        .route("/admin/dashboard-stats", get(endpoints::admin::dashboard_stats))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        // Extension must be outermost so the auth middleware can extract
        // ApiContext before any handler state exists.
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check))
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx);

    Router::new()
        .merge(protected)
        .merge(unprotected)
        .layer(CorsLayer::permissive())
}
