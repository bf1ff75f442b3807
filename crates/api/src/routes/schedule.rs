use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/providers/:provider_id/schedules",
            get(handlers::schedule::list_schedules).post(handlers::schedule::create_schedule),
        )
        .route(
            "/api/providers/:provider_id/schedules/today",
            get(handlers::schedule::list_today_schedules),
        )
        .route("/api/schedules/:id", get(handlers::schedule::get_schedule))
        .route(
            "/api/schedules/:id/active",
            put(handlers::schedule::set_schedule_active),
        )
}
