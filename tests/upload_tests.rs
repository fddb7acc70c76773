//! Upload endpoint and static `/uploads` mount, end to end on disk.

mod common;

use common::{TestApp, admin_token};
use salon_backend::services::jwt;
use secrecy::ExposeSecret;

fn archivo_png(nombre: &str, datos: &[u8]) -> reqwest::multipart::Form {
    let parte = reqwest::multipart::Part::bytes(datos.to_vec())
        .file_name(nombre.to_string())
        .mime_str("image/png")
        .unwrap();
    reqwest::multipart::Form::new().part("archivo", parte)
}

#[tokio::test]
async fn test_upload_requires_a_token() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(&app.url("/api/upload"))
        .multipart(archivo_png("foto.png", b"bytes"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["mensaje"], "Token no proporcionado");
}

#[tokio::test]
async fn test_upload_rejects_customer_tokens() {
    let app = TestApp::new().await;

    let token = jwt::sign_token(
        7,
        "cliente@example.com",
        "cliente",
        app.config.jwt_secret.expose_secret(),
    )
    .unwrap();

    let response = app
        .client
        .post(&app.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(archivo_png("foto.png", b"bytes"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_upload_serves_and_deletes_files() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;
    let contenido = b"contenido de la imagen de prueba";

    let response = app
        .client
        .post(&app.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(archivo_png("retrato.png", contenido))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let archivo = body["archivo"].as_str().unwrap().to_string();
    assert!(archivo.ends_with(".png"));
    assert_eq!(body["url"], format!("/uploads/{}", archivo));

    // The stored name is generated, never the client's.
    assert!(!archivo.contains("retrato"));

    let descarga = app
        .client
        .get(&app.url(&format!("/uploads/{}", archivo)))
        .send()
        .await
        .unwrap();

    assert_eq!(descarga.status(), 200);
    let headers = descarga.headers().clone();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["cache-control"], "public, max-age=3600");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["content-type"], "image/png");
    assert_eq!(descarga.bytes().await.unwrap().as_ref(), contenido);

    let borrado = app
        .client
        .delete(&app.url(&format!("/api/upload/{}", archivo)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(borrado.status(), 200);

    let tras_borrado = app
        .client
        .get(&app.url(&format!("/uploads/{}", archivo)))
        .send()
        .await
        .unwrap();
    assert_eq!(tras_borrado.status(), 404);
}

#[tokio::test]
async fn test_upload_lowercases_the_extension() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let response = app
        .client
        .post(&app.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(archivo_png("FOTO.PNG", b"bytes"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["archivo"].as_str().unwrap().ends_with(".png"));
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extensions() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let parte = reqwest::multipart::Part::bytes(b"#!/bin/sh".to_vec())
        .file_name("script.exe")
        .mime_str("application/octet-stream")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("archivo", parte);

    let response = app
        .client
        .post(&app.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(
        body["mensaje"]
            .as_str()
            .unwrap()
            .contains("Tipo de archivo no permitido")
    );
}

#[tokio::test]
async fn test_upload_rejects_empty_files() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let response = app
        .client
        .post(&app.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(archivo_png("vacio.png", b""))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mensaje"], "El archivo está vacío");
}

#[tokio::test]
async fn test_upload_without_file_field_is_400() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let form = reqwest::multipart::Form::new().text("comentario", "sin archivo");

    let response = app
        .client
        .post(&app.url("/api/upload"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mensaje"], "No se recibió ningún archivo");
}

#[tokio::test]
async fn test_delete_missing_upload_is_404() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let response = app
        .client
        .delete(&app.url("/api/upload/no-existe.png"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_rejects_path_traversal_names() {
    let app = TestApp::new().await;
    let token = admin_token(&app).await;

    let response = app
        .client
        .delete(&app.url("/api/upload/..%2f..%2fCargo.toml"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["mensaje"], "Nombre de archivo inválido");
}

#[tokio::test]
async fn test_static_mount_does_not_list_directories() {
    let app = TestApp::new().await;

    let response = app.client.get(&app.url("/uploads")).send().await.unwrap();
    assert_eq!(response.status(), 404);

    let response = app.client.get(&app.url("/uploads/")).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_static_mount_rejects_traversal() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(&app.url("/uploads/..%2fCargo.toml"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unknown_upload_is_404() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(&app.url("/uploads/00000000-0000-0000-0000-000000000000.png"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
}
