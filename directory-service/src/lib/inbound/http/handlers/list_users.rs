use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsersData {
    pub users: Vec<UserData>,
}

pub async fn list_users<S: UserStore>(
    State(state): State<AppState<S>>,
) -> Result<ApiSuccess<UsersData>, ApiError> {
    let users = state.auth_service.list_users().await?;

    let users = users.iter().map(UserData::from).collect();
    Ok(ApiSuccess::new(StatusCode::OK, UsersData { users }))
}
