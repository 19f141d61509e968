use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde_json::json;
use tracing::error;

use super::domain::{ModeratedReview, ReviewId, ReviewModerationRequest, ReviewSubmission};
use super::repository::ReviewRepository;
use super::service::{ReviewService, ReviewServiceError};
use crate::workflows::repository::RepositoryError;

/// Router builder for review intake, moderation, and profile ratings.
pub fn review_router<R>(service: Arc<ReviewService<R>>) -> Router
where
    R: ReviewRepository + 'static,
{
    Router::new()
        .route("/api/v1/reviews", post(submit_handler::<R>))
        .route(
            "/api/v1/reviews/:review_id/moderation",
            post(moderation_handler::<R>),
        )
        .route(
            "/api/v1/profiles/:profile_id/rating",
            get(rating_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    axum::Json(submission): axum::Json<ReviewSubmission>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.submit(submission, Local::now().date_naive()) {
        Ok(record) => {
            let payload = json!({
                "reviewId": record.id,
                "status": record.status.label(),
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn moderation_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path(review_id): Path<String>,
    axum::Json(request): axum::Json<ReviewModerationRequest>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.moderate(&ReviewId(review_id), request.approve) {
        Ok((record, rating)) => {
            let body = ModeratedReview {
                review_id: record.id,
                status: record.status.label(),
                rating,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn rating_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.rating(&profile_id) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ReviewServiceError) -> Response {
    let status = match &err {
        ReviewServiceError::Violation(_) => StatusCode::BAD_REQUEST,
        ReviewServiceError::AlreadyModerated(_) => StatusCode::CONFLICT,
        ReviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReviewServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ReviewServiceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "review request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}
