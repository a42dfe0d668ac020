use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::issue_access_token::parse_credentials;
use super::issue_access_token::CredentialsBody;
use super::issue_access_token::TokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

/// Issue an elevated token. Requires valid credentials *and* the admin role;
/// a caller with a wrong password gets 401 before the role is ever
/// considered.
pub async fn issue_admin_token<S: UserStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<CredentialsBody>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let login = parse_credentials(&body)?;

    let token = state
        .auth_service
        .issue_admin_token(&login, &body.password)
        .await?;

    tracing::info!(login = %login, "admin token generated");
    Ok(ApiSuccess::new(StatusCode::OK, TokenData { token }))
}
