use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusData {
    pub time: DateTime<Utc>,
    pub version: String,
    pub hostname: String,
    pub uptime_secs: u64,
}

/// Liveness endpoint; requires no token.
pub async fn status<S: UserStore>(
    State(state): State<AppState<S>>,
) -> Result<ApiSuccess<StatusData>, ApiError> {
    let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string());

    Ok(ApiSuccess::new(
        StatusCode::OK,
        StatusData {
            time: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            hostname,
            uptime_secs: state.started_at.elapsed().as_secs(),
        },
    ))
}
