use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{BadPayerSubmission, DisputeSubmission, ModerationRequest, ReportId};
use super::policy::ReportViolation;
use super::repository::{ReportNotifier, ReportRepository};
use super::service::{BadPayerReportService, ReportServiceError};
use crate::workflows::repository::RepositoryError;

/// Router builder exposing report intake, moderation, and lookup endpoints.
pub fn report_router<R, N>(service: Arc<BadPayerReportService<R, N>>) -> Router
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports",
            post(submit_handler::<R, N>).get(published_handler::<R, N>),
        )
        .route("/api/v1/reports/:report_id", get(status_handler::<R, N>))
        .route(
            "/api/v1/reports/:report_id/moderation",
            post(moderation_handler::<R, N>),
        )
        .route(
            "/api/v1/reports/:report_id/dispute",
            post(dispute_handler::<R, N>),
        )
        .with_state(service)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Deserialize)]
pub(crate) struct AreaQuery {
    pub(crate) area: String,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<BadPayerReportService<R, N>>>,
    axum::Json(submission): axum::Json<BadPayerSubmission>,
) -> Response
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
{
    match service.submit(submission, today()) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<BadPayerReportService<R, N>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
{
    match service.get(&ReportId(report_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn moderation_handler<R, N>(
    State(service): State<Arc<BadPayerReportService<R, N>>>,
    Path(report_id): Path<String>,
    axum::Json(request): axum::Json<ModerationRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
{
    match service.moderate(&ReportId(report_id), request, today()) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dispute_handler<R, N>(
    State(service): State<Arc<BadPayerReportService<R, N>>>,
    Path(report_id): Path<String>,
    axum::Json(dispute): axum::Json<DisputeSubmission>,
) -> Response
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
{
    match service.dispute(&ReportId(report_id), dispute, today()) {
        Ok(record) => (StatusCode::OK, axum::Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn published_handler<R, N>(
    State(service): State<Arc<BadPayerReportService<R, N>>>,
    Query(query): Query<AreaQuery>,
) -> Response
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
{
    match service.published(&query.area) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: ReportServiceError) -> Response {
    match err {
        ReportServiceError::Violation(ReportViolation::Content { message, issues }) => {
            let payload = json!({
                "error": message,
                "issues": issues,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ReportServiceError::Violation(violation) => {
            let payload = json!({ "error": violation.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ReportServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "report not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ReportServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "report already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        err @ ReportServiceError::InvalidTransition { .. } => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "report request failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
