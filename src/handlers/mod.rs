use axum::extract::State;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::calendar::elapsed_since;
use crate::calendar::Elapsed;
use crate::models::User;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::data;

pub mod events;
pub mod messages;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientConfigPayload {
    timezone: String,
    poll_interval_ms: u128,
    users: [User; 2],
}

#[derive(Serialize)]
struct TimerPayload {
    since: String,
    #[serde(flatten)]
    elapsed: Elapsed,
}

pub async fn health_check() -> Response {
    data(HealthPayload {
        status: "ok",
        service: "couple-calendar",
    })
}

/// GET /api/client-config: what the web client needs to drive its timers.
pub async fn client_config(State(state): State<AppState>) -> Response {
    data(ClientConfigPayload {
        timezone: state.timezone.name().to_string(),
        poll_interval_ms: state.poll_interval.as_millis(),
        users: User::ALL,
    })
}

/// GET /api/timer
pub async fn relationship_timer(State(state): State<AppState>) -> Response {
    let now = state.clock.now().with_timezone(&state.timezone).naive_local();
    data(TimerPayload {
        since: state.relationship_start.format("%Y-%m-%dT%H:%M:%S").to_string(),
        elapsed: elapsed_since(state.relationship_start, now),
    })
}

pub async fn not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("No route for '{}'", uri.path())).into_response()
}
