use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct TimerQuery {
    minutes: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(state: AppState) -> Router {
    let web_root = format!("{}/web", env!("CARGO_MANIFEST_DIR"));

    Router::new()
        .route("/api/status", get(handle_get_status))
        .route("/api/power/toggle", post(handle_power_toggle))
        .route("/api/temperature/up", post(handle_temperature_up))
        .route("/api/temperature/down", post(handle_temperature_down))
        .route("/api/timer", post(handle_set_timer))
        .fallback_service(ServeDir::new(web_root))
        .with_state(state)
}

async fn handle_get_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.snapshot().await)
}

async fn handle_power_toggle(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.toggle_power().await)
}

async fn handle_temperature_up(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.increase_temp().await)
}

async fn handle_temperature_down(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.decrease_temp().await)
}

/// Arming goes through the engine even for garbage input — the rejection is
/// a timer-label message, not an HTTP error. Only a request with no
/// `minutes` parameter at all is malformed.
async fn handle_set_timer(
    State(state): State<AppState>,
    Query(query): Query<TimerQuery>,
) -> axum::response::Response {
    let Some(minutes) = query.minutes else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'minutes' parameter");
    };

    Json(state.arm_timer(&minutes).await).into_response()
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
