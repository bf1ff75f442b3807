use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const STATEMENTS: &[&str] = &[
    // Recurring provider schedules
    r#"
    CREATE TABLE IF NOT EXISTS schedules (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        provider_id UUID NOT NULL,
        name VARCHAR(100) NOT NULL,
        window_start TIME NOT NULL,
        window_end TIME NOT NULL,
        slot_duration_minutes INTEGER NOT NULL DEFAULT 5,
        active_days SMALLINT NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        capacity INTEGER NOT NULL DEFAULT 20,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_window CHECK (window_end > window_start),
        CONSTRAINT valid_slot_duration CHECK (slot_duration_minutes BETWEEN 1 AND 60),
        CONSTRAINT valid_active_days CHECK (active_days BETWEEN 0 AND 127),
        CONSTRAINT valid_capacity CHECK (capacity BETWEEN 1 AND 100)
    );
    "#,
    // Bookings against schedule grid instants
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        schedule_id UUID NOT NULL REFERENCES schedules(id),
        instant TIMESTAMP WITHOUT TIME ZONE NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'booked',
        patient_id UUID NULL,
        notes VARCHAR(500) NULL,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_status CHECK (status IN ('booked', 'checked_in', 'completed', 'cancelled'))
    );
    "#,
    // Tables created before `completed` existed carry the narrower check
    "ALTER TABLE bookings DROP CONSTRAINT IF EXISTS valid_status;",
    r#"
    ALTER TABLE bookings ADD CONSTRAINT valid_status
        CHECK (status IN ('booked', 'checked_in', 'completed', 'cancelled'));
    "#,
    // At most one live booking per schedule instant; cancelled rows release it
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS uq_bookings_schedule_instant
        ON bookings(schedule_id, instant)
        WHERE status <> 'cancelled';
    "#,
    "CREATE INDEX IF NOT EXISTS idx_schedules_provider_id ON schedules(provider_id);",
    "CREATE INDEX IF NOT EXISTS idx_bookings_schedule_id ON bookings(schedule_id);",
    "CREATE INDEX IF NOT EXISTS idx_bookings_instant ON bookings(instant);",
    "CREATE INDEX IF NOT EXISTS idx_bookings_patient_id ON bookings(patient_id);",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
