mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use common::TestApp;
use serde_json::{json, Value};
use sporzo_backend::domain::models::booking::{
    BookingRecord, NewBookingParams, PaymentMethod, PaymentStatus,
};
use sporzo_backend::domain::models::venue::{
    FieldConfiguration, NewVenueParams, TieredPricing, Venue,
};
use sporzo_backend::domain::ports::{ChargeOutcome, ChargeRequest, PaymentProvider};
use sporzo_backend::domain::services::checkout::{CheckoutFlow, CustomerDetails};
use sporzo_backend::domain::services::selection::SlotSelectionSession;
use sporzo_backend::error::AppError;
use async_trait::async_trait;
use tower::ServiceExt;

const DATE: &str = "2031-05-10";

fn date() -> NaiveDate {
    NaiveDate::parse_from_str(DATE, "%Y-%m-%d").unwrap()
}

fn record(venue_id: &str, hours: Vec<u32>) -> BookingRecord {
    BookingRecord::new(NewBookingParams {
        booking_id: None,
        venue_id: venue_id.to_string(),
        field_config_id: "cfg-7s".to_string(),
        date: date(),
        slot_hours: hours,
        amount: 100,
        payment_method: PaymentMethod::Manual,
        payment_status: PaymentStatus::Pending,
        provider_ref: None,
        customer_name: "Asha".to_string(),
        customer_email: "asha@example.com".to_string(),
        customer_phone: None,
    })
}

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed_venue(app: &TestApp) -> Venue {
    let venue = Venue::new(NewVenueParams {
        owner_id: "owner-1".to_string(),
        name: "Elite Turf Arena".to_string(),
        location: "Kochi".to_string(),
        description: None,
        timezone: "Asia/Kolkata".to_string(),
        open_hour: 6,
        close_hour: 22,
        is_open_24h: false,
        field_configurations: vec![FieldConfiguration {
            id: "cfg-7s".to_string(),
            name: "7-a-side".to_string(),
            base_price: 100,
            pricing: TieredPricing::default(),
        }],
    })
    .unwrap();

    app.state.venue_repo.create(&venue).await.unwrap()
}

#[tokio::test]
async fn test_all_or_nothing_commit() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app).await;
    let ledger = app.state.ledger.clone();

    ledger.commit(&record(&venue.id, vec![11])).await.unwrap();

    // 11 is taken, so the whole {10, 11, 12} request must fail...
    let err = ledger.commit(&record(&venue.id, vec![10, 11, 12])).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // ...leaving 10 and 12 unclaimed by the failed attempt.
    assert!(!ledger.is_booked(&venue.id, date(), 10).await.unwrap());
    assert!(!ledger.is_booked(&venue.id, date(), 12).await.unwrap());

    ledger.commit(&record(&venue.id, vec![10, 12])).await.unwrap();
    assert!(ledger.is_booked(&venue.id, date(), 10).await.unwrap());
    assert!(ledger.is_booked(&venue.id, date(), 12).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_commits_exactly_one_winner() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app).await;
    let ledger = app.state.ledger.clone();

    let first = record(&venue.id, vec![18]);
    let second = record(&venue.id, vec![18]);

    let (a, b) = tokio::join!(ledger.commit(&first), ledger.commit(&second));

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of two racing commits may win");

    let loser = if a.is_err() { a } else { b };
    assert!(matches!(loser.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_concurrent_checkout_requests_over_http() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app).await;

    let payload = json!({
        "date": DATE,
        "field_config_id": "cfg-7s",
        "slot_hours": [18],
        "customer_name": "Asha",
        "customer_email": "asha@example.com"
    });

    let request = |body: String| {
        app.router.clone().oneshot(
            Request::builder().method("POST")
                .uri(format!("/api/v1/venues/{}/bookings/manual", venue.id))
                .header("Content-Type", "application/json")
                .body(Body::from(body)).unwrap()
        )
    };

    let (a, b) = tokio::join!(request(payload.to_string()), request(payload.to_string()));
    let statuses = [a.unwrap().status(), b.unwrap().status()];

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 1);
}

struct AlwaysApproves;

#[async_trait]
impl PaymentProvider for AlwaysApproves {
    async fn charge(&self, _request: &ChargeRequest) -> Result<ChargeOutcome, AppError> {
        Ok(ChargeOutcome::Success {
            provider_ref: "pay_race".to_string(),
        })
    }
}

#[tokio::test]
async fn test_charge_captured_then_commit_conflict_escalates() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app).await;
    let ledger = app.state.ledger.clone();

    // The hour is free while the customer selects it...
    let mut session = SlotSelectionSession::open(venue.clone(), date(), "cfg-7s").unwrap();
    session
        .toggle(ledger.as_ref(), 18, chrono::Utc::now())
        .await
        .unwrap();

    let mut flow = CheckoutFlow::begin(
        &session,
        None,
        CustomerDetails {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
        },
    )
    .unwrap();

    // ...but a rival books it before the payment settles.
    ledger.commit(&record(&venue.id, vec![18])).await.unwrap();

    let err = flow.pay_online(ledger.as_ref(), &AlwaysApproves).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Reconciliation { ref provider_ref, .. } if provider_ref == "pay_race"
    ));
}

#[tokio::test]
async fn test_conflict_response_names_the_hour() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app).await;
    let ledger = app.state.ledger.clone();

    ledger.commit(&record(&venue.id, vec![18])).await.unwrap();

    let payload = json!({
        "date": DATE,
        "field_config_id": "cfg-7s",
        "slot_hours": [18],
        "customer_name": "Maya",
        "customer_email": "maya@example.com"
    });

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/venues/{}/bookings/manual", venue.id))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("18:00"));
}
