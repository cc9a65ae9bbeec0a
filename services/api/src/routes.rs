use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cohort_risk::analytics::AnalyticsEngine;
use cohort_risk::cohort::{analytics_router, cohort_router, CohortService, SnapshotRepository};
use serde_json::json;
use std::sync::Arc;

/// Cohort routes plus operational endpoints; analytics routes only when a dataset loaded.
pub(crate) fn with_cohort_routes<R>(
    service: Arc<CohortService<R>>,
    analytics: Option<Arc<AnalyticsEngine>>,
) -> axum::Router
where
    R: SnapshotRepository + 'static,
{
    let router = cohort_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint));

    match analytics {
        Some(engine) => router.merge(analytics_router(engine)),
        None => router,
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
