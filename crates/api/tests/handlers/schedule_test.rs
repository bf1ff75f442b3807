use axum::http::StatusCode;
use clinicslot_core::models::schedule::{RecurringSchedule, ScheduleListResponse};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_create_schedule_applies_defaults() {
    let ctx = TestContext::new();

    let schedule = ctx
        .create_schedule(json!({
            "name": "Evening OPD",
            "window_start": "17:00",
            "window_end": "19:00",
            "active_days": [1, 3, 5]
        }))
        .await;

    assert_eq!(schedule.provider_id, ctx.provider_id);
    assert_eq!(schedule.slot_duration_minutes, 5);
    assert_eq!(schedule.capacity, 20);
    assert!(schedule.is_active);
    assert_eq!(schedule.active_days.days(), vec![1, 3, 5]);
}

#[rstest]
#[case::window_inverted(json!({ "name": "x", "window_start": "10:00", "window_end": "09:00", "active_days": [1] }))]
#[case::empty_window(json!({ "name": "x", "window_start": "09:00", "window_end": "09:00", "active_days": [1] }))]
#[case::zero_duration(json!({ "name": "x", "window_start": "09:00", "window_end": "10:00", "slot_duration_minutes": 0, "active_days": [1] }))]
#[case::long_duration(json!({ "name": "x", "window_start": "09:00", "window_end": "10:00", "slot_duration_minutes": 61, "active_days": [1] }))]
#[case::zero_capacity(json!({ "name": "x", "window_start": "09:00", "window_end": "10:00", "capacity": 0, "active_days": [1] }))]
#[case::empty_name(json!({ "name": "", "window_start": "09:00", "window_end": "10:00", "active_days": [1] }))]
#[tokio::test]
async fn test_create_schedule_rejects_invalid_definition(#[case] body: Value) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post(&format!("/api/providers/{}/schedules", ctx.provider_id))
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[rstest]
#[case::past_saturday(json!([1, 7]))]
#[case::past_u8(json!([1, 300]))]
#[case::negative(json!([-1]))]
#[tokio::test]
async fn test_create_schedule_rejects_unknown_weekday(#[case] days: Value) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post(&format!("/api/providers/{}/schedules", ctx.provider_id))
        .json(&json!({
            "name": "x",
            "window_start": "09:00",
            "window_end": "10:00",
            "active_days": days
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(error.contains("out of range"), "{}", error);
}

#[tokio::test]
async fn test_malformed_schedule_body_reports_json_error() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post(&format!("/api/providers/{}/schedules", ctx.provider_id))
        .json(&json!({ "name": "x", "window_start": "9 o'clock" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_list_schedules_in_creation_order() {
    let ctx = TestContext::new();
    let first = ctx.create_monday_schedule().await;
    let second = ctx
        .create_schedule(json!({
            "name": "Afternoon OPD",
            "window_start": "14:00",
            "window_end": "16:00",
            "active_days": [2]
        }))
        .await;

    let body = ctx
        .server
        .get(&format!("/api/providers/{}/schedules", ctx.provider_id))
        .await
        .json::<ScheduleListResponse>();

    let ids: Vec<Uuid> = body.schedules.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let empty = ctx
        .server
        .get(&format!("/api/providers/{}/schedules", Uuid::new_v4()))
        .await
        .json::<ScheduleListResponse>();
    assert!(empty.schedules.is_empty());
}

#[tokio::test]
async fn test_get_schedule_round_trip() {
    let ctx = TestContext::new();
    let created = ctx.create_monday_schedule().await;

    let response = ctx.server.get(&format!("/api/schedules/{}", created.id)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<RecurringSchedule>(), created);
}

#[tokio::test]
async fn test_get_unknown_schedule_not_found() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get(&format!("/api/schedules/{}", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_schedule_active() {
    let ctx = TestContext::new();
    let created = ctx.create_monday_schedule().await;
    let path = format!("/api/schedules/{}/active", created.id);

    let off = ctx
        .server
        .put(&path)
        .json(&json!({ "is_active": false }))
        .await
        .json::<RecurringSchedule>();
    assert!(!off.is_active);

    let on = ctx
        .server
        .put(&path)
        .json(&json!({ "is_active": true }))
        .await
        .json::<RecurringSchedule>();
    assert!(on.is_active);
}

#[tokio::test]
async fn test_toggle_unknown_schedule_not_found() {
    let ctx = TestContext::new();

    ctx.server
        .put(&format!("/api/schedules/{}/active", Uuid::new_v4()))
        .json(&json!({ "is_active": false }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_today_listing_only_returns_own_provider() {
    let ctx = TestContext::new();
    ctx.create_schedule(json!({
        "name": "Every day",
        "window_start": "09:00",
        "window_end": "10:00",
        "active_days": [0, 1, 2, 3, 4, 5, 6]
    }))
    .await;

    let body = ctx
        .server
        .get(&format!("/api/providers/{}/schedules/today", ctx.provider_id))
        .await
        .json::<ScheduleListResponse>();
    assert_eq!(body.schedules.len(), 1);

    let stranger = ctx
        .server
        .get(&format!("/api/providers/{}/schedules/today", Uuid::new_v4()))
        .await
        .json::<ScheduleListResponse>();
    assert!(stranger.schedules.is_empty());
}
