use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_admin;
use crate::models::cliente::{ActualizarCliente, FiltroClientes, NuevoCliente};
use crate::queries;
use crate::state::AppState;
use crate::validation::{validate_email, validate_required_string};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(listar).post(crear))
        .route("/{id}", get(obtener).put(actualizar).delete(eliminar))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

async fn listar(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroClientes>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let clientes = queries::clientes::listar(&mut conn, &filtro).await?;

    Ok(Json(json!({ "success": true, "clientes": clientes })))
}

async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    let cliente = queries::clientes::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Cliente no encontrado".to_string()))?;

    Ok(Json(json!({ "success": true, "cliente": cliente })))
}

async fn crear(
    State(state): State<AppState>,
    Json(body): Json<NuevoCliente>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validate_required_string(&body.nombre, "El nombre")?;
    if let Some(email) = body.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }

    let mut conn = state.pool.acquire().await?;

    let id = queries::clientes::insert(&mut conn, &body).await?;
    let cliente = queries::clientes::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Cliente {} desapareció tras el insert", id)))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Cliente creado correctamente",
            "cliente": cliente,
        })),
    ))
}

async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(cambios): Json<ActualizarCliente>,
) -> Result<Json<serde_json::Value>> {
    if let Some(nombre) = cambios.nombre.as_deref() {
        validate_required_string(nombre, "El nombre")?;
    }
    if let Some(email) = cambios.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validate_email(email)?;
    }

    let mut conn = state.pool.acquire().await?;

    if !queries::clientes::update(&mut conn, id, &cambios).await? {
        return Err(Error::NotFound("Cliente no encontrado".to_string()));
    }

    let cliente = queries::clientes::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Cliente no encontrado".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Cliente actualizado correctamente",
        "cliente": cliente,
    })))
}

/// Clients with appointment history stay; deletion would orphan the citas.
async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    if queries::clientes::find_by_id(&mut conn, id).await?.is_none() {
        return Err(Error::NotFound("Cliente no encontrado".to_string()));
    }

    if queries::clientes::contar_citas(&mut conn, id).await? > 0 {
        return Err(Error::Conflict(
            "El cliente tiene citas registradas".to_string(),
        ));
    }

    queries::clientes::delete(&mut conn, id).await?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Cliente eliminado correctamente",
    })))
}
