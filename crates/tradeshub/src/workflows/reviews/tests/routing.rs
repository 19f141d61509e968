use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::reviews::{review_router, ReviewService};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn review_routes_submit_moderate_and_report_rating() {
    let (service, _) = build_service();
    let router = review_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/reviews",
            json!({
                "profileId": "pro-9",
                "customerId": "cust-1",
                "rating": 4,
                "comment": "Great finish on the patio",
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let review_id = created
        .get("reviewId")
        .and_then(Value::as_str)
        .expect("review id returned")
        .to_string();
    assert_eq!(created.get("status"), Some(&json!("pending")));

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/reviews/{review_id}/moderation"),
            json!({ "approve": true }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let moderated = read_json(response).await;
    assert_eq!(moderated.get("status"), Some(&json!("approved")));
    assert_eq!(moderated["rating"]["reviewCount"], json!(1));

    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/reviews/{review_id}/moderation"),
            json!({ "approve": false }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(
            Request::get("/api/v1/profiles/pro-9/rating")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let rating = read_json(response).await;
    assert_eq!(rating["averageRating"], json!(4.0));
    assert_eq!(rating["profileId"], json!("pro-9"));
}

#[tokio::test]
async fn invalid_reviews_are_bad_requests() {
    let (service, _) = build_service();
    let router = review_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/reviews",
            json!({
                "profileId": "pro-9",
                "customerId": "cust-1",
                "rating": 9,
                "comment": "Off the scale",
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn outages_map_to_internal_errors() {
    let router = review_router(Arc::new(ReviewService::new(Arc::new(OfflineReviews))));

    let response = router
        .oneshot(
            Request::get("/api/v1/profiles/pro-1/rating")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
