use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_admin;
use crate::models::categoria::{ActualizarCategoria, NuevaCategoria};
use crate::queries;
use crate::state::AppState;
use crate::validation::validate_required_string;

pub fn router(state: &AppState) -> Router<AppState> {
    let publico = Router::new()
        .route("/", get(listar))
        .route("/{id}", get(obtener));

    let admin = Router::new()
        .route("/", post(crear))
        .route("/{id}", put(actualizar).delete(eliminar))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    publico.merge(admin)
}

async fn listar(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let categorias = queries::categorias::listar(&mut conn).await?;

    Ok(Json(json!({ "success": true, "categorias": categorias })))
}

async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    let categoria = queries::categorias::find_by_id(&mut conn, id)
        .await?
        .filter(|c| c.activo)
        .ok_or_else(|| Error::NotFound("Categoría no encontrada".to_string()))?;

    Ok(Json(json!({ "success": true, "categoria": categoria })))
}

async fn crear(
    State(state): State<AppState>,
    Json(body): Json<NuevaCategoria>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validate_required_string(&body.nombre, "El nombre")?;

    let mut conn = state.pool.acquire().await?;

    if queries::categorias::nombre_exists(&mut conn, &body.nombre).await? {
        return Err(Error::Conflict("La categoría ya existe".to_string()));
    }

    let id = queries::categorias::insert(&mut conn, &body).await?;
    let categoria = queries::categorias::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Categoría {} desapareció tras el insert", id)))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Categoría creada correctamente",
            "categoria": categoria,
        })),
    ))
}

async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(cambios): Json<ActualizarCategoria>,
) -> Result<Json<serde_json::Value>> {
    if let Some(nombre) = cambios.nombre.as_deref() {
        validate_required_string(nombre, "El nombre")?;
    }

    let mut conn = state.pool.acquire().await?;

    if !queries::categorias::update(&mut conn, id, &cambios).await? {
        return Err(Error::NotFound("Categoría no encontrada".to_string()));
    }

    let categoria = queries::categorias::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Categoría no encontrada".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Categoría actualizada correctamente",
        "categoria": categoria,
    })))
}

/// Categories with active products cannot be removed; the rest are
/// deactivated so sale history keeps its references.
async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    if queries::categorias::contar_productos(&mut conn, id).await? > 0 {
        return Err(Error::Conflict(
            "La categoría tiene productos asociados".to_string(),
        ));
    }

    if !queries::categorias::desactivar(&mut conn, id).await? {
        return Err(Error::NotFound("Categoría no encontrada".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "mensaje": "Categoría eliminada correctamente",
    })))
}
