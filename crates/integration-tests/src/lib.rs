//! Integration test harness for Rolodex.
//!
//! Spawns the real application on an ephemeral port, backed by an in-memory
//! SQLite database and a stub geocoding server, so tests exercise the full
//! HTTP stack without any external dependencies.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rolodex-integration-tests
//! ```

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};

use axum::{Json, Router, extract::Query, routing::get};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions_sqlx_store::SqliteStore;

use rolodex_web::config::{GeocoderConfig, RolodexConfig};
use rolodex_web::state::AppState;
use rolodex_web::{app, db, middleware};

/// Address marker the stub geocoder treats as unresolvable.
pub const UNKNOWN_ADDRESS: &str = "1 Nowhere Lane";

/// Display name the stub geocoder returns, with markup to verify stripping.
pub const STUB_DISPLAY_NAME: &str = "233 S Wacker Dr, <Chicago>, Cook County, Illinois";

/// The stub display name after angle brackets are stripped.
pub const STUB_STORED_ADDRESS: &str = "233 S Wacker Dr, Chicago, Cook County, Illinois";

/// A running application instance under test.
pub struct TestApp {
    pub base_url: String,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Build a URL for a path on the app under test.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Spawn the application with an in-memory database and stub geocoder.
pub async fn spawn_app() -> TestApp {
    let geocoder_url = spawn_stub_geocoder().await;

    // A single connection keeps the in-memory database alive for the whole
    // test; requests serialize on it.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create pool");

    db::MIGRATOR.run(&pool).await.expect("Failed to migrate");

    let session_store = SqliteStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .expect("Failed to migrate session store");

    let config = RolodexConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        geocoder: GeocoderConfig {
            base_url: geocoder_url,
            user_agent: "rolodex-tests/0.1".to_string(),
        },
        bootstrap: None,
        sentry_dsn: None,
    };

    let session_layer = middleware::create_session_layer(session_store, &config);
    let state = AppState::new(config, pool.clone()).expect("Failed to build state");
    let router = app(state, session_layer);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        pool,
    }
}

/// HTTP client that keeps cookies and surfaces redirects instead of
/// following them, so tests can assert on 303 responses.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign up an account through the real form endpoint.
pub async fn signup(app: &TestApp, http: &reqwest::Client, username: &str, password: &str) {
    let resp = http
        .post(app.url("/signup"))
        .form(&[
            ("first_name", "Test"),
            ("last_name", "User"),
            ("username", username),
            ("password", password),
        ])
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
}

/// Log in and keep the session cookie on the client.
pub async fn login(app: &TestApp, http: &reqwest::Client, username: &str, password: &str) {
    let resp = http
        .post(app.url("/login"))
        .form(&[("username", username), ("password", password)])
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
}

/// Create a contact through the real form endpoint.
pub async fn create_contact(app: &TestApp, http: &reqwest::Client, first_name: &str) {
    let resp = http
        .post(app.url("/create"))
        .form(&[
            ("prefix", "Ms."),
            ("first_name", first_name),
            ("last_name", "Example"),
            ("phone", "555-0100"),
            ("email", "contact@example.com"),
            ("address", "233 S Wacker Dr, Chicago"),
            ("contact_by_email", "on"),
        ])
        .send()
        .await
        .expect("Failed to create contact");
    assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
}

/// Stand up a Nominatim-shaped stub on an ephemeral port.
///
/// Queries containing [`UNKNOWN_ADDRESS`]'s street name resolve to an empty
/// list; everything else resolves to one fixed Chicago match whose display
/// name carries angle brackets.
async fn spawn_stub_geocoder() -> String {
    async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let q = params.get("q").map(String::as_str).unwrap_or_default();
        if q.contains("Nowhere") {
            return Json(json!([]));
        }
        Json(json!([{
            "lat": "41.8781136",
            "lon": "-87.6297982",
            "display_name": STUB_DISPLAY_NAME,
        }]))
    }

    let router = Router::new().route("/search", get(search));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub geocoder");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub geocoder error");
    });

    format!("http://{addr}")
}
