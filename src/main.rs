//! Pet Care Backend
//!
//! A REST backend for a pet adoption center: pet registry, adoption
//! applications, appointment booking and user management, backed by
//! SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use models::UserRole;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pet Care Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET is not set. Using the development fallback secret!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Bootstrap the admin account if configured and not already present
    seed_admin(&repo, &config).await?;

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the bootstrap admin account when PETCARE_ADMIN_EMAIL and
/// PETCARE_ADMIN_PASSWORD are set and no user holds that email yet.
async fn seed_admin(repo: &Repository, config: &Config) -> Result<(), errors::AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    if repo.get_user_by_email(email).await?.is_some() {
        tracing::info!("Admin account {} already exists", email);
        return Ok(());
    }

    let password_hash = auth::hash_password(password)?;
    let username = email.split('@').next().unwrap_or("admin");
    let admin = repo
        .create_user(username, email, &password_hash, Some("Administrator"), UserRole::Admin)
        .await?;
    tracing::info!("Created admin account {} ({})", admin.email, admin.id);
    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Auth and user management
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .route("/auth/me", get(api::me))
        .route("/auth/logout", post(api::logout))
        .route("/auth/users", get(api::list_users))
        .route("/auth/users/{id}", put(api::update_user))
        .route("/auth/users/{id}", delete(api::delete_user))
        // Pet registry
        .route("/pets", get(api::list_pets))
        .route("/pets", post(api::create_pet))
        .route("/pets/{id}", get(api::get_pet))
        .route("/pets/{id}", put(api::update_pet))
        .route("/pets/{id}", delete(api::delete_pet))
        // Adoption workflow
        .route("/adoption/applications", post(api::submit_application))
        .route("/adoption/applications", get(api::list_applications))
        .route("/adoption/applications/{id}", put(api::update_application_status))
        .route("/adoption/applications/{id}", delete(api::delete_application))
        .route("/adoption/stats", get(api::adoption_stats))
        .route("/adoption/available-pets", get(api::available_pets))
        // Appointment workflow
        .route("/appointments", post(api::create_appointment))
        .route("/appointments", get(api::list_appointments))
        .route("/appointments/stats/summary", get(api::appointment_stats))
        .route("/appointments/{id}", get(api::get_appointment))
        .route("/appointments/{id}", put(api::update_appointment))
        .route("/appointments/{id}", delete(api::delete_appointment))
        .route("/appointments/{id}/status", put(api::update_appointment_status));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
