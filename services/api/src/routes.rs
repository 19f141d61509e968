use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tradeshub::content_filter::{filter_fields, FilterIssue};
use tradeshub::workflows::reports::{
    report_router, BadPayerReportService, ReportNotifier, ReportRepository,
};
use tradeshub::workflows::reviews::{review_router, ReviewRepository, ReviewService};

/// Arbitrary named text fields to screen, e.g. `{"workDescription": "..."}`.
pub(crate) type ContentCheckRequest = BTreeMap<String, Option<String>>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContentCheckResponse {
    pub(crate) is_valid: bool,
    pub(crate) issues: Vec<FilterIssue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

pub(crate) fn with_workflow_routes<R, N, V>(
    reports: Arc<BadPayerReportService<R, N>>,
    reviews: Arc<ReviewService<V>>,
) -> axum::Router
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
    V: ReviewRepository + 'static,
{
    report_router(reports)
        .merge(review_router(reviews))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/content/check",
            axum::routing::post(content_check_endpoint),
        )
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

/// Pre-flight check used by the report form before submission.
pub(crate) async fn content_check_endpoint(
    Json(fields): Json<ContentCheckRequest>,
) -> Json<ContentCheckResponse> {
    let result = filter_fields(
        fields
            .iter()
            .map(|(field, text)| (field.as_str(), text.as_deref())),
    );
    let message = result.error_message();

    Json(ContentCheckResponse {
        is_valid: result.is_valid,
        issues: result.issues,
        message,
    })
}
