use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedData {
    pub id: String,
}

pub async fn delete_user<S: UserStore>(
    State(state): State<AppState<S>>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<DeletedData>, ApiError> {
    let id = UserId::from_string(&user_id)
        .map_err(|e| ApiError::BadRequest(format!("input validation error: {e}")))?;

    state.auth_service.delete_user(&id).await?;

    tracing::info!(user_id = %id, "user deleted");
    Ok(ApiSuccess::new(
        StatusCode::OK,
        DeletedData { id: id.to_string() },
    ))
}
