use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use auth::TokenManager;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::issue_access_token::issue_access_token;
use super::handlers::issue_admin_token::issue_admin_token;
use super::handlers::list_users::list_users;
use super::handlers::me::me;
use super::handlers::status::status;
use super::middleware::require_access;
use super::middleware::require_admin;
use crate::cache::UserDirectory;
use crate::domain::user::service::AuthService;
use crate::user::ports::UserStore;

pub struct AppState<S: UserStore> {
    pub auth_service: Arc<AuthService<S>>,
    pub token_manager: Arc<TokenManager>,
    pub directory: Arc<UserDirectory<S>>,
    pub started_at: Instant,
}

// Manual impl: `S` itself need not be Clone, only the Arcs are cloned.
impl<S: UserStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            token_manager: Arc::clone(&self.token_manager),
            directory: Arc::clone(&self.directory),
            started_at: self.started_at,
        }
    }
}

pub fn create_router<S: UserStore>(
    auth_service: Arc<AuthService<S>>,
    token_manager: Arc<TokenManager>,
    directory: Arc<UserDirectory<S>>,
) -> Router {
    let state = AppState {
        auth_service,
        token_manager,
        directory,
        started_at: Instant::now(),
    };

    let public_routes = Router::new()
        .route("/status", get(status::<S>))
        .route("/token/access", post(issue_access_token::<S>))
        .route("/token/admin", post(issue_admin_token::<S>));

    let admin_routes = Router::new()
        .route("/admin/users/new", post(create_user::<S>))
        .route("/admin/users/all", get(list_users::<S>))
        .route("/admin/users/:user_id", delete(delete_user::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin::<S>,
        ));

    let user_routes = Router::new()
        .route("/users/me", get(me::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access::<S>,
        ));

    // Headers are deliberately left out of the span: the Authorization
    // header carries credentials.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(user_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
