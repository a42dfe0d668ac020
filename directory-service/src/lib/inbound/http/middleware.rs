use auth::Identity;
use auth::TokenKind;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use tracing::Instrument;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::ports::UserStore;

/// Gate for routes that require an ordinary access token.
pub async fn require_access<S: UserStore>(
    State(state): State<AppState<S>>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    authenticate(&state, req, next, TokenKind::Access).await
}

/// Gate for routes that require an admin token.
///
/// Only the presented token's audience is checked here; the admin-role rule
/// was already enforced when the token was issued.
pub async fn require_admin<S: UserStore>(
    State(state): State<AppState<S>>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    authenticate(&state, req, next, TokenKind::Admin).await
}

async fn authenticate<S: UserStore>(
    state: &AppState<S>,
    mut req: Request,
    next: Next,
    kind: TokenKind,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let token = extract_bearer_token(header).ok_or_else(|| {
        unauthorized("Authorization header is empty or doesn't start with 'Bearer '")
    })?;

    let identity = match kind {
        TokenKind::Access => state.token_manager.parse_access_token(token).map(Identity::Access),
        TokenKind::Admin => state.token_manager.parse_admin_token(token).map(Identity::Admin),
    }
    .map_err(|err| {
        // The specific kind goes to the logs only; the response stays
        // generic so callers can't probe why a token was rejected.
        tracing::warn!(kind = %kind, error = %err, "token rejected");
        unauthorized("invalid or expired token")
    })?;

    tracing::debug!(who = %identity, "request authenticated");

    // Everything the handler logs while serving this request carries the
    // caller's name.
    let span = tracing::info_span!("authenticated", who = %identity);
    req.extensions_mut().insert(identity);

    Ok(next.run(req).instrument(span).await)
}

/// Extract the token from an `Authorization` header value.
///
/// Accepts exactly `Bearer` followed by whitespace and a single
/// non-whitespace token, with optional surrounding whitespace
/// (`^\s*Bearer\s+(\S+)\s*$`). Anything else is rejected.
fn extract_bearer_token(header: &str) -> Option<&str> {
    let rest = header.trim_start().strip_prefix("Bearer")?;
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return None;
    }
    Some(token)
}

fn unauthorized(message: &str) -> Response {
    ApiError::Unauthorized(message.to_string()).into_response()
}
