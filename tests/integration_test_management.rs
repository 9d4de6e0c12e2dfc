mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

const DATE: &str = "2031-05-10";

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_venue(app: &TestApp, owner_id: &str, name: &str) -> String {
    let payload = json!({
        "owner_id": owner_id,
        "name": name,
        "location": "Kochi",
        "timezone": "Asia/Kolkata",
        "open_hour": 6,
        "close_hour": 22,
        "field_configurations": [
            { "id": "cfg-7s", "name": "7-a-side", "base_price": 100 }
        ]
    });

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/venues")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn book_manual(app: &TestApp, venue_id: &str, hours: &[u64]) -> Value {
    let payload = json!({
        "date": DATE,
        "field_config_id": "cfg-7s",
        "slot_hours": hours,
        "customer_name": "Asha",
        "customer_email": "asha@example.com"
    });

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/venues/{}/bookings/manual", venue_id))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    parse_body(res).await
}

async fn post_json(app: &TestApp, uri: String, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

async fn get(app: &TestApp, uri: String) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("GET").uri(uri)
            .body(Body::empty()).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_cancel_is_idempotent() {
    let app = TestApp::new().await;
    let venue_id = create_venue(&app, "owner-1", "Elite Turf Arena").await;
    let booking = book_manual(&app, &venue_id, &[14]).await;
    let booking_id = booking["id"].as_str().unwrap();

    let res = post_json(
        &app,
        format!("/api/v1/bookings/{}/cancel", booking_id),
        json!({ "reason": "rained out" }),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let first = parse_body(res).await;
    assert_eq!(first["payment_status"], "cancelled");
    assert_eq!(first["cancel_reason"], "rained out");

    // Second cancel: same end state, no error.
    let res = post_json(
        &app,
        format!("/api/v1/bookings/{}/cancel", booking_id),
        json!({}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    let second = parse_body(res).await;
    assert_eq!(second["payment_status"], "cancelled");
    assert_eq!(second["cancel_reason"], "rained out");
}

#[tokio::test]
async fn test_cancelled_hours_are_immediately_rebookable() {
    let app = TestApp::new().await;
    let venue_id = create_venue(&app, "owner-1", "Elite Turf Arena").await;
    let booking = book_manual(&app, &venue_id, &[14, 15]).await;
    let booking_id = booking["id"].as_str().unwrap();

    post_json(
        &app,
        format!("/api/v1/bookings/{}/cancel", booking_id),
        json!({}),
    ).await;

    let rebooked = book_manual(&app, &venue_id, &[14, 15]).await;
    assert_eq!(rebooked["payment_status"], "pending");
}

#[tokio::test]
async fn test_cancel_unknown_booking_not_found() {
    let app = TestApp::new().await;

    let res = post_json(
        &app,
        "/api/v1/bookings/BKMISSING/cancel".to_string(),
        json!({}),
    ).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_confirm_payment_completes_a_pending_booking() {
    let app = TestApp::new().await;
    let venue_id = create_venue(&app, "owner-1", "Elite Turf Arena").await;
    let booking = book_manual(&app, &venue_id, &[14]).await;
    let booking_id = booking["id"].as_str().unwrap();

    let res = post_json(
        &app,
        format!("/api/v1/bookings/{}/confirm-payment", booking_id),
        json!({}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["payment_status"], "completed");

    // Confirming twice is harmless.
    let res = post_json(
        &app,
        format!("/api/v1/bookings/{}/confirm-payment", booking_id),
        json!({}),
    ).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_confirm_payment_rejected_for_cancelled_booking() {
    let app = TestApp::new().await;
    let venue_id = create_venue(&app, "owner-1", "Elite Turf Arena").await;
    let booking = book_manual(&app, &venue_id, &[14]).await;
    let booking_id = booking["id"].as_str().unwrap();

    post_json(
        &app,
        format!("/api/v1/bookings/{}/cancel", booking_id),
        json!({}),
    ).await;

    let res = post_json(
        &app,
        format!("/api/v1/bookings/{}/confirm-payment", booking_id),
        json!({}),
    ).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_owner_listing_covers_all_their_venues() {
    let app = TestApp::new().await;
    let first_venue = create_venue(&app, "owner-1", "Elite Turf Arena").await;
    let second_venue = create_venue(&app, "owner-1", "Victory Arena").await;
    let other_owners = create_venue(&app, "owner-2", "Legends Ground").await;

    book_manual(&app, &first_venue, &[14]).await;
    book_manual(&app, &second_venue, &[16]).await;
    book_manual(&app, &other_owners, &[18]).await;

    let res = get(&app, "/api/v1/owners/owner-1/bookings".to_string()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    let res = get(
        &app,
        format!("/api/v1/owners/owner-1/bookings?venue_id={}", first_venue),
    ).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_owner_listing_filters_by_status_and_date() {
    let app = TestApp::new().await;
    let venue_id = create_venue(&app, "owner-1", "Elite Turf Arena").await;

    let kept = book_manual(&app, &venue_id, &[14]).await;
    let cancelled = book_manual(&app, &venue_id, &[16]).await;

    post_json(
        &app,
        format!("/api/v1/bookings/{}/cancel", cancelled["id"].as_str().unwrap()),
        json!({}),
    ).await;

    let res = get(&app, "/api/v1/owners/owner-1/bookings?status=pending".to_string()).await;
    let bookings = parse_body(res).await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
    assert_eq!(bookings[0]["id"], kept["id"]);

    let res = get(&app, "/api/v1/owners/owner-1/bookings?status=cancelled".to_string()).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);

    let res = get(
        &app,
        format!("/api/v1/owners/owner-1/bookings?date={}", DATE),
    ).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    let res = get(&app, "/api/v1/owners/owner-1/bookings?date=2031-05-11".to_string()).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_owner_stats_count_revenue_from_completed_only() {
    let app = TestApp::new().await;
    let venue_id = create_venue(&app, "owner-1", "Elite Turf Arena").await;

    // One paid (2 hours x 100), one still pending, one cancelled.
    let paid = book_manual(&app, &venue_id, &[14, 15]).await;
    book_manual(&app, &venue_id, &[17]).await;
    let cancelled = book_manual(&app, &venue_id, &[19]).await;

    post_json(
        &app,
        format!("/api/v1/bookings/{}/confirm-payment", paid["id"].as_str().unwrap()),
        json!({}),
    ).await;
    post_json(
        &app,
        format!("/api/v1/bookings/{}/cancel", cancelled["id"].as_str().unwrap()),
        json!({}),
    ).await;

    let res = get(&app, "/api/v1/owners/owner-1/bookings/stats".to_string()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let stats = parse_body(res).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["cancelled"], 1);
    assert_eq!(stats["revenue"], 200);
}
