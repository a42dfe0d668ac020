use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Login;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialsBody {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub token: String,
}

pub async fn issue_access_token<S: UserStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<CredentialsBody>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let login = parse_credentials(&body)?;

    let token = state
        .auth_service
        .issue_access_token(&login, &body.password)
        .await?;

    tracing::info!(login = %login, "access token generated");
    Ok(ApiSuccess::new(StatusCode::OK, TokenData { token }))
}

pub(super) fn parse_credentials(body: &CredentialsBody) -> Result<Login, ApiError> {
    if body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "input validation error: missing or empty 'password'".to_string(),
        ));
    }
    Login::new(body.login.clone())
        .map_err(|e| ApiError::BadRequest(format!("input validation error: {e}")))
}
