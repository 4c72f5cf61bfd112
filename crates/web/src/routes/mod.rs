//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                  - Contact list (shows auth state)
//! GET  /health            - Liveness check
//! GET  /health/ready      - Readiness check (verifies database)
//!
//! # Auth
//! GET  /signup            - Signup page
//! POST /signup            - Create account, redirect to /login
//! GET  /login             - Login page
//! POST /login             - Verify credentials, establish session
//! GET  /logout            - Destroy session, redirect to /
//!
//! # Contacts
//! GET  /create            - New contact form
//! POST /create            - Geocode + create, redirect to /
//! GET  /{id}              - Contact detail or 404
//! GET  /{id}/edit         - Edit form (requires auth)
//! POST /{id}/edit         - Geocode + full update (requires auth)
//! GET  /{id}/delete       - Delete confirmation (requires auth)
//! POST /{id}/delete       - Delete, redirect to / (requires auth)
//!
//! # API
//! GET  /api/contacts      - JSON listing of all contacts
//! ```

pub mod api;
pub mod auth;
pub mod contacts;
pub mod home;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::get,
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the contact routes router.
///
/// Parameterized routes come last; axum prefers static matches, so
/// `/create` never collides with `/{id}`.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create",
            get(contacts::create_page).post(contacts::create),
        )
        .route("/{id}", get(contacts::detail))
        .route(
            "/{id}/edit",
            get(contacts::edit_page).post(contacts::edit),
        )
        .route(
            "/{id}/delete",
            get(contacts::delete_page).post(contacts::delete),
        )
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/contacts", get(api::contacts))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .merge(auth_routes())
        .merge(contact_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
