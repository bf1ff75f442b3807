use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::create_booking))
        .route("/api/bookings/:id", get(handlers::booking::get_booking))
        .route(
            "/api/bookings/:id/check-in",
            post(handlers::booking::check_in_booking),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::booking::cancel_booking),
        )
        .route(
            "/api/bookings/:id/complete",
            post(handlers::booking::complete_booking),
        )
        .route(
            "/api/providers/:provider_id/bookings",
            get(handlers::booking::list_provider_bookings),
        )
        .route(
            "/api/patients/:patient_id/bookings/upcoming",
            get(handlers::booking::list_upcoming_patient_bookings),
        )
}
