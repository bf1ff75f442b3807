use axum::http::StatusCode;
use chrono::{Duration, Local, NaiveTime};
use clinicslot_core::models::booking::{Booking, BookingListResponse, BookingStatus};
use clinicslot_core::models::slot::AvailabilityResponse;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{monday_at, TestContext};

async fn book(ctx: &TestContext, body: Value) -> axum_test::TestResponse {
    ctx.server.post("/api/bookings").json(&body).await
}

async fn free_slot_count(ctx: &TestContext) -> usize {
    ctx.server
        .get(&format!("/api/providers/{}/availability", ctx.provider_id))
        .add_query_param("start_date", "2024-01-08")
        .add_query_param("end_date", "2024-01-08")
        .await
        .json::<AvailabilityResponse>()
        .slots
        .len()
}

#[tokio::test]
async fn test_create_booking() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;
    let patient_id = Uuid::new_v4();

    let response = book(
        &ctx,
        json!({
            "schedule_id": schedule.id,
            "instant": monday_at(9, 10),
            "patient_id": patient_id,
            "notes": "follow-up"
        }),
    )
    .await;

    response.assert_status(StatusCode::CREATED);
    let booking = response.json::<Booking>();
    assert_eq!(booking.schedule_id, schedule.id);
    assert_eq!(booking.instant, monday_at(9, 10));
    assert_eq!(booking.status, BookingStatus::Booked);
    assert_eq!(booking.patient_id, Some(patient_id));
    assert_eq!(booking.notes.as_deref(), Some("follow-up"));
}

#[tokio::test]
async fn test_double_booking_conflicts() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;
    let body = json!({ "schedule_id": schedule.id, "instant": monday_at(9, 0) });

    book(&ctx, body.clone()).await.assert_status(StatusCode::CREATED);
    let second = book(&ctx, body).await;

    second.assert_status(StatusCode::CONFLICT);
    assert!(second.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("Slot already taken"));
    assert_eq!(free_slot_count(&ctx).await, 2);
}

#[rstest]
#[case::between_grid_points(9, 3)]
#[case::before_window(8, 55)]
#[case::last_partial_step(9, 15)]
#[tokio::test]
async fn test_off_grid_booking_rejected(#[case] hour: u32, #[case] minute: u32) {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;

    let response = book(
        &ctx,
        json!({ "schedule_id": schedule.id, "instant": monday_at(hour, minute) }),
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(free_slot_count(&ctx).await, 3);
}

#[tokio::test]
async fn test_booking_on_inactive_day_rejected() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;

    // 2024-01-09 is a Tuesday
    book(
        &ctx,
        json!({ "schedule_id": schedule.id, "instant": "2024-01-09T09:00:00" }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_booking_unknown_schedule_not_found() {
    let ctx = TestContext::new();

    book(
        &ctx,
        json!({ "schedule_id": Uuid::new_v4(), "instant": monday_at(9, 0) }),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_with_long_notes_rejected() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;

    book(
        &ctx,
        json!({
            "schedule_id": schedule.id,
            "instant": monday_at(9, 0),
            "notes": "x".repeat(501)
        }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cancel_frees_slot_for_rebooking() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;
    let body = json!({ "schedule_id": schedule.id, "instant": monday_at(9, 5) });

    let booking = book(&ctx, body.clone()).await.json::<Booking>();
    assert_eq!(free_slot_count(&ctx).await, 2);

    let cancelled = ctx
        .server
        .post(&format!("/api/bookings/{}/cancel", booking.id))
        .await;
    cancelled.assert_status_ok();
    assert_eq!(cancelled.json::<Booking>().status, BookingStatus::Cancelled);
    assert_eq!(free_slot_count(&ctx).await, 3);

    book(&ctx, body).await.assert_status(StatusCode::CREATED);
    assert_eq!(free_slot_count(&ctx).await, 2);
}

#[tokio::test]
async fn test_check_in_keeps_slot_taken() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;
    let booking = book(
        &ctx,
        json!({ "schedule_id": schedule.id, "instant": monday_at(9, 0) }),
    )
    .await
    .json::<Booking>();

    let checked_in = ctx
        .server
        .post(&format!("/api/bookings/{}/check-in", booking.id))
        .await;

    checked_in.assert_status_ok();
    assert_eq!(checked_in.json::<Booking>().status, BookingStatus::CheckedIn);
    assert_eq!(free_slot_count(&ctx).await, 2);

    // A checked-in booking can no longer be cancelled
    ctx.server
        .post(&format!("/api/bookings/{}/cancel", booking.id))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_booking() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;
    let created = book(
        &ctx,
        json!({ "schedule_id": schedule.id, "instant": monday_at(9, 0) }),
    )
    .await
    .json::<Booking>();

    let fetched = ctx
        .server
        .get(&format!("/api/bookings/{}", created.id))
        .await
        .json::<Booking>();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_unknown_booking_not_found() {
    let ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.server
        .get(&format!("/api/bookings/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.server
        .post(&format!("/api/bookings/{}/cancel", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_after_check_in() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;
    let booking = book(
        &ctx,
        json!({ "schedule_id": schedule.id, "instant": monday_at(9, 5) }),
    )
    .await
    .json::<Booking>();
    let complete_path = format!("/api/bookings/{}/complete", booking.id);

    // must be checked in first
    ctx.server
        .post(&complete_path)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.server
        .post(&format!("/api/bookings/{}/check-in", booking.id))
        .await
        .assert_status_ok();
    let completed = ctx.server.post(&complete_path).await;

    completed.assert_status_ok();
    assert_eq!(completed.json::<Booking>().status, BookingStatus::Completed);
    assert_eq!(free_slot_count(&ctx).await, 2);
}

#[tokio::test]
async fn test_provider_day_listing() {
    let ctx = TestContext::new();
    let schedule = ctx.create_monday_schedule().await;
    let kept = book(
        &ctx,
        json!({ "schedule_id": schedule.id, "instant": monday_at(9, 10) }),
    )
    .await
    .json::<Booking>();
    let dropped = book(
        &ctx,
        json!({ "schedule_id": schedule.id, "instant": monday_at(9, 0) }),
    )
    .await
    .json::<Booking>();
    ctx.server
        .post(&format!("/api/bookings/{}/cancel", dropped.id))
        .await
        .assert_status_ok();

    let path = format!("/api/providers/{}/bookings", ctx.provider_id);
    let body = ctx
        .server
        .get(&path)
        .add_query_param("date", "2024-01-08")
        .await
        .json::<BookingListResponse>();

    let seen: Vec<_> = body.bookings.iter().map(|b| (b.id, b.status)).collect();
    assert_eq!(
        seen,
        vec![(dropped.id, BookingStatus::Cancelled), (kept.id, BookingStatus::Booked)]
    );

    let next_day = ctx
        .server
        .get(&path)
        .add_query_param("date", "2024-01-09")
        .await
        .json::<BookingListResponse>();
    assert!(next_day.bookings.is_empty());

    ctx.server
        .get(&path)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patient_upcoming_bookings() {
    let ctx = TestContext::new();
    let schedule = ctx
        .create_schedule(json!({
            "name": "Every day",
            "window_start": "09:00",
            "window_end": "10:00",
            "slot_duration_minutes": 15,
            "active_days": [0, 1, 2, 3, 4, 5, 6]
        }))
        .await;
    let patient_id = Uuid::new_v4();
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let next_week = (Local::now().date_naive() + Duration::days(7)).and_time(nine);
    let two_weeks = (Local::now().date_naive() + Duration::days(14)).and_time(nine);

    for instant in [two_weeks, monday_at(9, 0), next_week] {
        book(
            &ctx,
            json!({ "schedule_id": schedule.id, "instant": instant, "patient_id": patient_id }),
        )
        .await
        .assert_status(StatusCode::CREATED);
    }
    let cancelled = book(
        &ctx,
        json!({
            "schedule_id": schedule.id,
            "instant": next_week + Duration::minutes(15),
            "patient_id": patient_id
        }),
    )
    .await
    .json::<Booking>();
    ctx.server
        .post(&format!("/api/bookings/{}/cancel", cancelled.id))
        .await
        .assert_status_ok();

    let body = ctx
        .server
        .get(&format!("/api/patients/{}/bookings/upcoming", patient_id))
        .await
        .json::<BookingListResponse>();

    let instants: Vec<_> = body.bookings.iter().map(|b| b.instant).collect();
    assert_eq!(instants, vec![next_week, two_weeks]);
}
