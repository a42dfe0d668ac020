use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Login;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Role;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserBody {
    pub login: String,
    pub password: String,
    pub email: String,
    pub role: String,
}

pub async fn create_user<S: UserStore>(
    State(state): State<AppState<S>>,
    Json(body): Json<CreateUserBody>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let new_user = parse_body(body)?;

    let user = state.auth_service.register_user(new_user).await?;

    tracing::info!(login = %user.login, email = %user.email, role = %user.role, "user inserted");
    Ok(ApiSuccess::new(StatusCode::OK, UserData::from(&user)))
}

fn parse_body(body: CreateUserBody) -> Result<NewUser, ApiError> {
    let bad_request = |e: &dyn std::fmt::Display| {
        ApiError::BadRequest(format!("input validation error: {e}"))
    };

    if body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "input validation error: missing or empty 'password'".to_string(),
        ));
    }

    Ok(NewUser {
        login: Login::new(body.login).map_err(|e| bad_request(&e))?,
        email: EmailAddress::new(body.email).map_err(|e| bad_request(&e))?,
        role: Role::new(body.role).map_err(|e| bad_request(&e))?,
        password: body.password,
    })
}
