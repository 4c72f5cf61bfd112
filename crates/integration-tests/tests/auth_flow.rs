//! Integration tests for signup, login, logout, and route gating.

use reqwest::StatusCode;
use rolodex_integration_tests::{client, login, signup, spawn_app};

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()
        .get("location")
        .expect("Missing Location header")
        .to_str()
        .expect("Invalid Location header")
}

// ============================================================================
// Signup Tests
// ============================================================================

#[tokio::test]
async fn signup_redirects_to_login() {
    let app = spawn_app().await;
    let http = client();

    let resp = http
        .post(app.url("/signup"))
        .form(&[
            ("first_name", "Alice"),
            ("last_name", "Liddell"),
            ("username", "alice"),
            ("password", "correct-horse"),
        ])
        .send()
        .await
        .expect("Failed to sign up");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn signup_rejects_duplicate_username() {
    let app = spawn_app().await;
    let http = client();
    signup(&app, &http, "alice", "correct-horse").await;

    let resp = http
        .post(app.url("/signup"))
        .form(&[
            ("first_name", "Other"),
            ("last_name", "Alice"),
            ("username", "alice"),
            ("password", "different-pw"),
        ])
        .send()
        .await
        .expect("Failed to post signup");

    // Re-rendered form, not a redirect
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("Username is already taken"));
    // Typed names survive the round trip
    assert!(body.contains("Other"));
}

#[tokio::test]
async fn signup_rejects_short_password() {
    let app = spawn_app().await;
    let http = client();

    let resp = http
        .post(app.url("/signup"))
        .form(&[
            ("first_name", "Bob"),
            ("last_name", ""),
            ("username", "bob"),
            ("password", "short"),
        ])
        .send()
        .await
        .expect("Failed to post signup");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read body");
    assert!(body.contains("at least 8 characters"));
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn login_establishes_session() {
    let app = spawn_app().await;
    let http = client();
    signup(&app, &http, "alice", "correct-horse").await;

    let resp = http
        .post(app.url("/login"))
        .form(&[("username", "alice"), ("password", "correct-horse")])
        .send()
        .await
        .expect("Failed to log in");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let body = http
        .get(app.url("/"))
        .send()
        .await
        .expect("Failed to get index")
        .text()
        .await
        .expect("Failed to read body");
    assert!(body.contains("Signed in as alice"));
}

#[tokio::test]
async fn login_failure_is_generic() {
    let app = spawn_app().await;
    let http = client();
    signup(&app, &http, "alice", "correct-horse").await;

    // Wrong password
    let resp = http
        .post(app.url("/login"))
        .form(&[("username", "alice"), ("password", "wrong-password")])
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(resp.status(), StatusCode::OK);
    let wrong_pw = resp.text().await.expect("Failed to read body");
    assert!(wrong_pw.contains("Invalid username or password"));

    // Unknown username gets the same message, so responses can't be used to
    // enumerate accounts
    let resp = http
        .post(app.url("/login"))
        .form(&[("username", "nobody"), ("password", "wrong-password")])
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(resp.status(), StatusCode::OK);
    let unknown_user = resp.text().await.expect("Failed to read body");
    assert!(unknown_user.contains("Invalid username or password"));
}

#[tokio::test]
async fn failed_login_leaves_visitor_anonymous() {
    let app = spawn_app().await;
    let http = client();
    signup(&app, &http, "alice", "correct-horse").await;

    let _ = http
        .post(app.url("/login"))
        .form(&[("username", "alice"), ("password", "wrong-password")])
        .send()
        .await
        .expect("Failed to post login");

    let resp = http
        .get(app.url("/1/edit"))
        .send()
        .await
        .expect("Failed to get edit page");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn logout_clears_session() {
    let app = spawn_app().await;
    let http = client();
    signup(&app, &http, "alice", "correct-horse").await;
    login(&app, &http, "alice", "correct-horse").await;

    let resp = http
        .get(app.url("/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let body = http
        .get(app.url("/"))
        .send()
        .await
        .expect("Failed to get index")
        .text()
        .await
        .expect("Failed to read body");
    assert!(!body.contains("Signed in as"));
}

// ============================================================================
// Route Gating Tests
// ============================================================================

#[tokio::test]
async fn edit_and_delete_require_login() {
    let app = spawn_app().await;
    let http = client();

    for path in ["/1/edit", "/1/delete"] {
        let resp = http
            .get(app.url(path))
            .send()
            .await
            .expect("Failed to get gated page");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "GET {path}");
        assert_eq!(location(&resp), "/login", "GET {path}");
    }
}

#[tokio::test]
async fn create_and_detail_are_open() {
    let app = spawn_app().await;
    let http = client();
    rolodex_integration_tests::create_contact(&app, &http, "Visible").await;

    let resp = http
        .get(app.url("/create"))
        .send()
        .await
        .expect("Failed to get create page");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = http
        .get(app.url("/1"))
        .send()
        .await
        .expect("Failed to get detail page");
    assert_eq!(resp.status(), StatusCode::OK);
}
