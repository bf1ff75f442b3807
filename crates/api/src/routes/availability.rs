use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/providers/:provider_id/availability",
        get(handlers::availability::get_availability),
    )
}
