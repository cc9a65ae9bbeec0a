use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{AssignmentIngest, AttendanceIngest, WhatIfRequest};
use super::repository::SnapshotRepository;
use super::service::{CohortService, CohortServiceError, DEFAULT_EVENT_LIMIT};
use super::views::{
    AssignmentIngestion, AtRiskStudent, AttendanceIngestion, CohortStats, EventLog,
    ResetSummary, StudentDetail, StudentRoster,
};
use crate::analytics::{AnalyticsEngine, StudentAnalytics};
use crate::error::AppError;
use crate::risk::{StudentId, WhatIfResult};

/// Router builder exposing the behavioral cohort endpoints.
pub fn cohort_router<R>(service: Arc<CohortService<R>>) -> Router
where
    R: SnapshotRepository + 'static,
{
    Router::new()
        .route("/api/v1/students", get(roster_handler::<R>))
        .route("/api/v1/students/at-risk", get(at_risk_handler::<R>))
        .route("/api/v1/risk/:student_id", get(detail_handler::<R>))
        .route("/api/v1/stats", get(stats_handler::<R>))
        .route("/api/v1/simulate/what-if", post(what_if_handler::<R>))
        .route("/api/v1/ingest/attendance", post(attendance_handler::<R>))
        .route("/api/v1/ingest/assignment", post(assignment_handler::<R>))
        .route("/api/v1/reset", post(reset_handler::<R>))
        .route("/api/v1/events", get(events_handler::<R>))
        .with_state(service)
}

/// Router builder for the psychometric analytics endpoints.
pub fn analytics_router(engine: Arc<AnalyticsEngine>) -> Router {
    Router::new()
        .route("/api/v1/analytics", get(analytics_handler))
        .route("/api/v1/analytics/collapse", get(collapse_handler))
        .route("/api/v1/analytics/:student_id", get(analytics_detail_handler))
        .with_state(engine)
}

pub(crate) async fn roster_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
) -> Result<Json<StudentRoster>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(StudentRoster {
        students: service.list()?,
        stats: service.stats()?,
    }))
}

pub(crate) async fn at_risk_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
) -> Result<Json<Vec<AtRiskStudent>>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(service.at_risk()?))
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
    Path(student_id): Path<u32>,
) -> Result<Json<StudentDetail>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(service.detail(StudentId(student_id))?))
}

pub(crate) async fn stats_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
) -> Result<Json<CohortStats>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(service.stats()?))
}

pub(crate) async fn what_if_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
    Json(request): Json<WhatIfRequest>,
) -> Result<Json<WhatIfResult>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(service.simulate(&request)?))
}

pub(crate) async fn attendance_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
    Json(request): Json<AttendanceIngest>,
) -> Result<Json<AttendanceIngestion>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(service.ingest_attendance(&request)?))
}

pub(crate) async fn assignment_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
    Json(request): Json<AssignmentIngest>,
) -> Result<Json<AssignmentIngestion>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(service.ingest_assignment(&request)?))
}

pub(crate) async fn reset_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
) -> Result<Json<ResetSummary>, AppError>
where
    R: SnapshotRepository + 'static,
{
    Ok(Json(service.reset()?))
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventQuery {
    limit: Option<usize>,
}

pub(crate) async fn events_handler<R>(
    State(service): State<Arc<CohortService<R>>>,
    Query(query): Query<EventQuery>,
) -> Json<EventLog>
where
    R: SnapshotRepository + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    Json(EventLog::from(service.events(limit)))
}

pub(crate) async fn analytics_handler(State(engine): State<Arc<AnalyticsEngine>>) -> Json<Value> {
    Json(json!({
        "students": engine.students(),
        "stats": engine.stats(),
    }))
}

pub(crate) async fn collapse_handler(State(engine): State<Arc<AnalyticsEngine>>) -> Json<Value> {
    let watchlist = engine.collapse_watchlist();
    Json(json!({
        "count": watchlist.len(),
        "students": watchlist,
    }))
}

pub(crate) async fn analytics_detail_handler(
    State(engine): State<Arc<AnalyticsEngine>>,
    Path(student_id): Path<u32>,
) -> Result<Json<StudentAnalytics>, AppError> {
    let id = StudentId(student_id);
    engine
        .student(id)
        .cloned()
        .map(Json)
        .ok_or(AppError::Cohort(CohortServiceError::UnknownStudent(id)))
}
