use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, post},
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_admin;
use crate::services::bitacora;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(subir))
        .route("/{archivo}", delete(eliminar))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

/// Receives the first file field of a multipart form and stores it under a
/// generated name. The response carries the public `/uploads` URL.
async fn subir(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Formulario inválido: {}", e)))?
    {
        let Some(nombre_original) = field.file_name().map(str::to_string) else {
            continue;
        };

        let datos = field
            .bytes()
            .await
            .map_err(|_| Error::PayloadTooLarge)?;

        if datos.is_empty() {
            return Err(Error::Validation("El archivo está vacío".to_string()));
        }

        let archivo = state.storage.save(&nombre_original, datos).await?;

        bitacora::registrar(
            &state.pool,
            "info",
            "upload",
            &format!("Archivo subido: {}", archivo),
        );

        return Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "mensaje": "Archivo subido correctamente",
                "archivo": archivo,
                "url": format!("/uploads/{}", archivo),
            })),
        ));
    }

    Err(Error::Validation("No se recibió ningún archivo".to_string()))
}

async fn eliminar(
    State(state): State<AppState>,
    Path(archivo): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.storage.remove(&archivo).await?;

    bitacora::registrar(
        &state.pool,
        "info",
        "upload",
        &format!("Archivo eliminado: {}", archivo),
    );

    Ok(Json(json!({
        "success": true,
        "mensaje": "Archivo eliminado correctamente",
    })))
}
