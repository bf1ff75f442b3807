use crate::models::DbBooking;
use chrono::{NaiveDateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, schedule_id, instant, status, patient_id, notes, created_at";

/// Inserts a booking unless a live one already holds `(schedule_id, instant)`.
///
/// Returns `None` on conflict. Exclusivity comes from the partial unique
/// index `uq_bookings_schedule_instant`, so concurrent callers racing for the
/// same pair get exactly one row back between them.
pub async fn reserve_booking(
    pool: &Pool<Postgres>,
    schedule_id: Uuid,
    instant: NaiveDateTime,
    patient_id: Option<Uuid>,
    notes: Option<&str>,
) -> Result<Option<DbBooking>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, schedule_id, instant, status, patient_id, notes, created_at)
        VALUES ($1, $2, $3, 'booked', $4, $5, $6)
        ON CONFLICT (schedule_id, instant) WHERE status <> 'cancelled' DO NOTHING
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    ))
    .bind(id)
    .bind(schedule_id)
    .bind(instant)
    .bind(patient_id)
    .bind(notes)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {} FROM bookings WHERE id = $1",
        BOOKING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Live (not cancelled) bookings of the given schedules in `[from, until)`.
pub async fn get_live_bookings_in_range(
    pool: &Pool<Postgres>,
    schedule_ids: &[Uuid],
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {}
        FROM bookings
        WHERE schedule_id = ANY($1)
          AND instant >= $2
          AND instant < $3
          AND status <> 'cancelled'
        ORDER BY instant ASC
        "#,
        BOOKING_COLUMNS
    ))
    .bind(schedule_ids)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    tracing::debug!(
        "Found {} live bookings for {} schedules between {} and {}",
        bookings.len(), schedule_ids.len(), from, until
    );
    Ok(bookings)
}

/// All bookings, any status, on schedules owned by `provider_id` in
/// `[from, until)`.
pub async fn get_provider_bookings_in_range(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT b.id, b.schedule_id, b.instant, b.status, b.patient_id, b.notes, b.created_at
        FROM bookings b
        JOIN schedules s ON s.id = b.schedule_id
        WHERE s.provider_id = $1
          AND b.instant >= $2
          AND b.instant < $3
        ORDER BY b.instant ASC, b.created_at ASC
        "#,
    )
    .bind(provider_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    tracing::debug!(
        "Found {} bookings for provider {} between {} and {}",
        bookings.len(), provider_id, from, until
    );
    Ok(bookings)
}

pub async fn get_patient_bookings_after(
    pool: &Pool<Postgres>,
    patient_id: Uuid,
    after: NaiveDateTime,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {}
        FROM bookings
        WHERE patient_id = $1
          AND instant > $2
          AND status <> 'cancelled'
        ORDER BY instant ASC
        "#,
        BOOKING_COLUMNS
    ))
    .bind(patient_id)
    .bind(after)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Moves a booking from `expected` to `status`. Returns `None` when the
/// booking is missing or no longer in `expected`.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: &str,
    status: &str,
) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $3
        WHERE id = $1 AND status = $2
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    ))
    .bind(id)
    .bind(expected)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}
