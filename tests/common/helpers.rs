//! Shared test helper functions
//!
//! Common flows used across the suites: unique identities, the hardcoded
//! admin login and the customer register-then-login dance.

use secrecy::ExposeSecret;

use crate::common::TestApp;

/// Generates a unique test email so parallel runs never collide.
pub fn generate_test_email() -> String {
    format!("test_{}@example.com", nanoid::nanoid!(12))
}

/// Logs in against the hardcoded admin endpoint and returns the token.
///
/// Works without a database: the admin account only exists in config.
pub async fn admin_token(app: &TestApp) -> String {
    let response = app
        .client
        .post(&app.url("/api/auth/admin-login"))
        .json(&serde_json::json!({
            "email": app.config.admin_email,
            "password": app.config.admin_password.expose_secret(),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Registers a fresh customer account and logs it in, returning the token.
///
/// Requires a reachable database.
pub async fn register_and_login(app: &TestApp) -> String {
    let email = generate_test_email();

    let response = app
        .client
        .post(&app.url("/api/usuarios/registro"))
        .json(&serde_json::json!({
            "nombre": "Cliente de Prueba",
            "email": email,
            "password": "SecurePass123!"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let login_response = app
        .client
        .post(&app.url("/api/usuarios/login"))
        .json(&serde_json::json!({
            "email": email,
            "password": "SecurePass123!"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(login_response.status(), 200);

    let body: serde_json::Value = login_response.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}
