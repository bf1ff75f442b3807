use crate::models::DbSchedule;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SCHEDULE_COLUMNS: &str = "id, provider_id, name, window_start, window_end, \
    slot_duration_minutes, active_days, is_active, capacity, created_at";

#[allow(clippy::too_many_arguments)]
pub async fn create_schedule(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    name: &str,
    window_start: NaiveTime,
    window_end: NaiveTime,
    slot_duration_minutes: i32,
    active_days: i16,
    capacity: i32,
) -> Result<DbSchedule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating schedule: id={}, provider_id={}, window={}-{}, every {} min, days={:#09b}",
        id, provider_id, window_start, window_end, slot_duration_minutes, active_days
    );

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        INSERT INTO schedules (id, provider_id, name, window_start, window_end,
            slot_duration_minutes, active_days, is_active, capacity, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $9)
        RETURNING {}
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(id)
    .bind(provider_id)
    .bind(name)
    .bind(window_start)
    .bind(window_end)
    .bind(slot_duration_minutes)
    .bind(active_days)
    .bind(capacity)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(schedule)
}

pub async fn get_schedule_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSchedule>> {
    tracing::debug!("Getting schedule by id: {}", id);

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        "SELECT {} FROM schedules WHERE id = $1",
        SCHEDULE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}

pub async fn get_schedules_by_provider_id(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    active_only: bool,
) -> Result<Vec<DbSchedule>> {
    let schedules = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        SELECT {}
        FROM schedules
        WHERE provider_id = $1 AND (is_active OR NOT $2)
        ORDER BY created_at ASC, id ASC
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(provider_id)
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    tracing::debug!(
        "Found {} schedules for provider {} (active_only={})",
        schedules.len(), provider_id, active_only
    );
    Ok(schedules)
}

pub async fn get_schedules_by_weekday(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    day_number: u8,
) -> Result<Vec<DbSchedule>> {
    let schedules = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        SELECT {}
        FROM schedules
        WHERE provider_id = $1 AND (active_days & $2) <> 0
        ORDER BY created_at ASC, id ASC
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(provider_id)
    .bind(1i16 << day_number)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}

pub async fn set_schedule_active(
    pool: &Pool<Postgres>,
    id: Uuid,
    is_active: bool,
) -> Result<Option<DbSchedule>> {
    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        UPDATE schedules
        SET is_active = $2
        WHERE id = $1
        RETURNING {}
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(id)
    .bind(is_active)
    .fetch_optional(pool)
    .await?;

    Ok(schedule)
}
