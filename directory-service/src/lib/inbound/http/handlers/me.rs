use auth::Identity;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

/// Return the directory record of the authenticated caller.
///
/// The record is served from the in-memory directory snapshot, not the
/// store. A user created moments ago may be absent until the next
/// background refresh; callers get 404 until then.
pub async fn me<S: UserStore>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<Identity>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let login = identity.login().to_string();

    match state.directory.get_by_login(&login).await {
        Some(user) => Ok(ApiSuccess::new(StatusCode::OK, UserData::from(&user))),
        None => {
            tracing::warn!(login = %login, "authenticated user missing from directory snapshot");
            Err(ApiError::NotFound(format!("user {login} not found")))
        }
    }
}
