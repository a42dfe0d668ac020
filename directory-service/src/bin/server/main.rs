use std::sync::Arc;
use std::time::Duration;

use auth::TokenManager;
use auth::TokenManagerConfig;
use directory_service::cache::UserDirectory;
use directory_service::config::Config;
use directory_service::domain::user::models::EmailAddress;
use directory_service::domain::user::models::Login;
use directory_service::domain::user::models::NewUser;
use directory_service::domain::user::models::Role;
use directory_service::domain::user::service::AuthService;
use directory_service::inbound::http::router::create_router;
use directory_service::outbound::repositories::PostgresUserStore;
use directory_service::user::errors::AuthError;
use directory_service::user::errors::StoreError;
use directory_service::user::ports::UserStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "directory_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "directory-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_url = %config.database.redacted_url(),
        http_port = config.server.http_port,
        issuer = %config.auth.issuer,
        cache_refresh_secs = config.cache.refresh_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    let token_manager = Arc::new(TokenManager::new(
        &config.auth.secret,
        TokenManagerConfig {
            issuer: config.auth.issuer.clone(),
            access_token_ttl: chrono::Duration::seconds(config.auth.access_token_ttl_secs),
            admin_token_ttl: chrono::Duration::seconds(config.auth.admin_token_ttl_secs),
        },
    )?);

    let store = Arc::new(PostgresUserStore::new(pg_pool).await?);

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&store),
        Arc::clone(&token_manager),
    ));

    seed_admin(&auth_service).await?;

    let directory = UserDirectory::load(
        Arc::clone(&store),
        Duration::from_secs(config.cache.refresh_secs),
    )
    .await?;

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        Arc::clone(&auth_service),
        Arc::clone(&token_manager),
        Arc::clone(&directory),
    );

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    directory.stop();
    tracing::info!("Service stopped");

    Ok(())
}

/// Create the bootstrap `admin` user if the table has none. The default
/// password must be rotated after first login.
async fn seed_admin<S: UserStore>(auth_service: &AuthService<S>) -> Result<(), anyhow::Error> {
    let new_user = NewUser {
        login: Login::new("admin".to_string())?,
        email: EmailAddress::new("admin@directory.local".to_string())?,
        role: Role::new(Role::ADMIN.to_string())?,
        password: "admin".to_string(),
    };

    match auth_service.register_user(new_user).await {
        Ok(user) => {
            tracing::info!(login = %user.login, "bootstrap admin user created");
            Ok(())
        }
        // Already seeded, possibly by a concurrent replica.
        Err(AuthError::Store(StoreError::AlreadyExists(_))) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
