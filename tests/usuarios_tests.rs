//! Customer accounts: registration, login, profile and email verification.
//!
//! These tests run against a real MySQL instance (`cargo test -- --ignored`).

mod common;

use common::{TestApp, admin_token, generate_test_email, register_and_login};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires database"]
async fn test_registro_creates_account_and_returns_token() {
    let app = TestApp::new_with_db().await;
    let email = generate_test_email();

    let response = app
        .client
        .post(&app.url("/api/usuarios/registro"))
        .json(&serde_json::json!({
            "nombre": "Ana Prueba",
            "email": email,
            "password": "SecurePass123!",
            "telefono": "3001234567"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["token"].is_string());
    assert_eq!(body["usuario"]["nombre"], "Ana Prueba");
    assert_eq!(body["usuario"]["email"], email);
    assert_eq!(body["usuario"]["rol"], "cliente");
    assert_eq!(body["usuario"]["verificado"], false);
    assert!(body["usuario"].get("password_hash").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_registro_duplicate_email_is_409() {
    let app = TestApp::new_with_db().await;
    let email = generate_test_email();

    let cuerpo = serde_json::json!({
        "nombre": "Primera",
        "email": email,
        "password": "SecurePass123!"
    });

    let primera = app
        .client
        .post(&app.url("/api/usuarios/registro"))
        .json(&cuerpo)
        .send()
        .await
        .unwrap();
    assert_eq!(primera.status(), 201);

    let segunda = app
        .client
        .post(&app.url("/api/usuarios/registro"))
        .json(&cuerpo)
        .send()
        .await
        .unwrap();
    assert_eq!(segunda.status(), 409);

    let body: serde_json::Value = segunda.json().await.unwrap();
    assert_eq!(body["mensaje"], "El email ya está registrado");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_registro_rejects_invalid_email() {
    let app = TestApp::new_with_db().await;

    let response = app
        .client
        .post(&app.url("/api/usuarios/registro"))
        .json(&serde_json::json!({
            "nombre": "Ana",
            "email": "sin-arroba",
            "password": "SecurePass123!"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_registro_rejects_short_password() {
    let app = TestApp::new_with_db().await;

    let response = app
        .client
        .post(&app.url("/api/usuarios/registro"))
        .json(&serde_json::json!({
            "nombre": "Ana",
            "email": generate_test_email(),
            "password": "corta"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::new_with_db().await;
    let email = generate_test_email();

    app.client
        .post(&app.url("/api/usuarios/registro"))
        .json(&serde_json::json!({
            "nombre": "Ana",
            "email": email,
            "password": "SecurePass123!"
        }))
        .send()
        .await
        .unwrap();

    let response = app
        .client
        .post(&app.url("/api/usuarios/login"))
        .json(&serde_json::json!({
            "email": email,
            "password": "otra-clave-123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mensaje"], "Credenciales incorrectas");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_missing_fields_are_400() {
    let app = TestApp::new_with_db().await;

    let response = app
        .client
        .post(&app.url("/api/usuarios/login"))
        .json(&serde_json::json!({ "email": generate_test_email() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mensaje"], "Email y contraseña son requeridos");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_perfil_requires_token_and_returns_own_account() {
    let app = TestApp::new_with_db().await;

    let sin_token = app
        .client
        .get(&app.url("/api/usuarios/perfil"))
        .send()
        .await
        .unwrap();
    assert_eq!(sin_token.status(), 401);

    let token = register_and_login(&app).await;
    let response = app
        .client
        .get(&app.url("/api/usuarios/perfil"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["usuario"]["rol"], "cliente");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_actualizar_perfil_changes_nombre() {
    let app = TestApp::new_with_db().await;
    let token = register_and_login(&app).await;

    let response = app
        .client
        .put(&app.url("/api/usuarios/perfil"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "nombre": "Nombre Nuevo" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["usuario"]["nombre"], "Nombre Nuevo");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_listar_usuarios_is_admin_only() {
    let app = TestApp::new_with_db().await;

    let token_cliente = register_and_login(&app).await;
    let prohibido = app
        .client
        .get(&app.url("/api/usuarios"))
        .bearer_auth(&token_cliente)
        .send()
        .await
        .unwrap();
    assert_eq!(prohibido.status(), 403);

    let token_admin = admin_token(&app).await;
    let response = app
        .client
        .get(&app.url("/api/usuarios"))
        .bearer_auth(&token_admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["usuarios"].is_array());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_verificacion_flow_marks_account_verified() {
    let app = TestApp::new_with_db().await;
    let email = generate_test_email();

    app.client
        .post(&app.url("/api/usuarios/registro"))
        .json(&serde_json::json!({
            "nombre": "Por Verificar",
            "email": email,
            "password": "SecurePass123!"
        }))
        .send()
        .await
        .unwrap();

    let solicitud = app
        .client
        .post(&app.url("/api/verificacion/solicitar"))
        .json(&serde_json::json!({ "email": email }))
        .send()
        .await
        .unwrap();
    assert_eq!(solicitud.status(), 200);

    // The code never leaves the server log, so fetch it from the table.
    let row = sqlx::query(
        "SELECT codigo FROM verificaciones WHERE email = ? AND usado = FALSE ORDER BY id DESC LIMIT 1",
    )
    .bind(&email)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    let codigo: String = row.get("codigo");
    assert_eq!(codigo.len(), 6);

    let equivocado = app
        .client
        .post(&app.url("/api/verificacion/confirmar"))
        .json(&serde_json::json!({ "email": email, "codigo": "000000" }))
        .send()
        .await
        .unwrap();
    // One-in-a-million collision with the real code aside.
    if codigo != "000000" {
        assert_eq!(equivocado.status(), 400);
    }

    let confirmacion = app
        .client
        .post(&app.url("/api/verificacion/confirmar"))
        .json(&serde_json::json!({ "email": email, "codigo": codigo }))
        .send()
        .await
        .unwrap();
    assert_eq!(confirmacion.status(), 200);

    let login: serde_json::Value = app
        .client
        .post(&app.url("/api/usuarios/login"))
        .json(&serde_json::json!({ "email": email, "password": "SecurePass123!" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(login["usuario"]["verificado"], true);

    // A second request for an already verified account is rejected.
    let repetida = app
        .client
        .post(&app.url("/api/verificacion/solicitar"))
        .json(&serde_json::json!({ "email": email }))
        .send()
        .await
        .unwrap();
    assert_eq!(repetida.status(), 409);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_verificacion_solicitar_unknown_email_is_404() {
    let app = TestApp::new_with_db().await;

    let response = app
        .client
        .post(&app.url("/api/verificacion/solicitar"))
        .json(&serde_json::json!({ "email": generate_test_email() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}
