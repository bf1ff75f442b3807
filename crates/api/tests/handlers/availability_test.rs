use axum::http::StatusCode;
use chrono::NaiveTime;
use clinicslot_core::models::slot::AvailabilityResponse;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{monday_at, TestContext};

fn availability_path(ctx: &TestContext) -> String {
    format!("/api/providers/{}/availability", ctx.provider_id)
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn test_availability_lists_grid_of_single_day() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;

    let response = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-08")
        .add_query_param("end_date", "2024-01-08")
        .await;

    response.assert_status_ok();
    let body = response.json::<AvailabilityResponse>();
    let starts: Vec<NaiveTime> = body.slots.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![hm(9, 0), hm(9, 5), hm(9, 10)]);
    assert!(body.slots.iter().all(|s| s.schedule_id == schedule.id));
    assert!(body.slots.iter().all(|s| s.provider_id == ctx.provider_id));
}

#[tokio::test]
async fn test_availability_uses_hhmm_wire_format() {
    let ctx = TestContext::new();
    ctx.create_monday_schedule().await;

    let response = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-08")
        .add_query_param("end_date", "2024-01-08")
        .await;

    let body = response.json::<Value>();
    assert_eq!(body["slots"][0]["date"], json!("2024-01-08"));
    assert_eq!(body["slots"][0]["start_time"], json!("09:00"));
    assert_eq!(body["slots"][0]["end_time"], json!("09:05"));
}

#[tokio::test]
async fn test_availability_excludes_booked_instant() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;

    ctx.server
        .post("/api/bookings")
        .json(&json!({ "schedule_id": schedule.id, "instant": monday_at(9, 5) }))
        .await
        .assert_status(StatusCode::CREATED);

    let body = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-08")
        .add_query_param("end_date", "2024-01-08")
        .await
        .json::<AvailabilityResponse>();

    let starts: Vec<NaiveTime> = body.slots.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![hm(9, 0), hm(9, 10)]);
}

#[tokio::test]
async fn test_availability_empty_for_days_outside_mask() {
    let ctx = TestContext::new();
    ctx.create_monday_schedule().await;

    // Tuesday through Sunday
    let body = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-09")
        .add_query_param("end_date", "2024-01-14")
        .await
        .json::<AvailabilityResponse>();

    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn test_availability_unknown_provider_is_empty() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-08")
        .add_query_param("end_date", "2024-01-14")
        .await;

    response.assert_status_ok();
    assert!(response.json::<AvailabilityResponse>().slots.is_empty());
}

#[tokio::test]
async fn test_availability_reversed_range_is_bad_request() {
    let ctx = TestContext::new();
    ctx.create_monday_schedule().await;

    let response = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-10")
        .add_query_param("end_date", "2024-01-08")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("Invalid date range"));
}

#[tokio::test]
async fn test_availability_missing_dates_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-08")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_availability_range_is_capped() {
    let ctx = TestContext::new();
    ctx.create_schedule(json!({
        "name": "Every minute",
        "window_start": "00:00",
        "window_end": "23:59",
        "slot_duration_minutes": 1,
        "active_days": [0, 1, 2, 3, 4, 5, 6]
    }))
    .await;

    let response = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "0001-01-01")
        .add_query_param("end_date", "9999-12-31")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("at most 366"), "{}", error);
}

#[tokio::test]
async fn test_availability_full_year_is_allowed() {
    let ctx = TestContext::new();
    ctx.create_monday_schedule().await;

    // 2024 is a leap year: 366 days, 53 Mondays
    let body = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-01")
        .add_query_param("end_date", "2024-12-31")
        .await
        .json::<AvailabilityResponse>();

    assert_eq!(body.slots.len(), 53 * 3);
}

#[tokio::test]
async fn test_availability_skips_deactivated_schedule() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;

    ctx.server
        .put(&format!("/api/schedules/{}/active", schedule.id))
        .json(&json!({ "is_active": false }))
        .await
        .assert_status_ok();

    let body = ctx
        .server
        .get(&availability_path(&ctx))
        .add_query_param("start_date", "2024-01-08")
        .add_query_param("end_date", "2024-01-08")
        .await
        .json::<AvailabilityResponse>();

    assert!(body.slots.is_empty());
}
