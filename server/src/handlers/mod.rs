use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod events;

pub use events::{
    create_event, delete_event, filter_events, get_all_events, get_event_by_id, update_event,
};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "events-api",
    };

    success(payload, "Health check successful")
}
