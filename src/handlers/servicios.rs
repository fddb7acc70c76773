use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_admin;
use crate::models::servicio::{ActualizarServicio, NuevoServicio};
use crate::queries;
use crate::state::AppState;
use crate::validation::{validate_precio, validate_required_string};

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

/// Router for `/api/servicios/reportes`, mounted before the parent.
pub fn reportes_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/mas-agendados", get(mas_agendados))
        .route("/ingresos", get(ingresos))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

async fn listar(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let servicios = queries::servicios::listar(&mut conn).await?;

    Ok(Json(json!({ "success": true, "servicios": servicios })))
}

async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    let servicio = queries::servicios::find_by_id(&mut conn, id)
        .await?
        .filter(|s| s.activo)
        .ok_or_else(|| Error::NotFound("Servicio no encontrado".to_string()))?;

    Ok(Json(json!({ "success": true, "servicio": servicio })))
}

async fn crear(
    State(state): State<AppState>,
    Json(body): Json<NuevoServicio>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validate_required_string(&body.nombre, "El nombre")?;
    validate_precio(body.precio)?;
    if body.duracion_minutos <= 0 {
        return Err(Error::Validation(
            "La duración debe ser mayor que cero".to_string(),
        ));
    }

    let mut conn = state.pool.acquire().await?;

    let id = queries::servicios::insert(&mut conn, &body).await?;
    let servicio = queries::servicios::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Servicio {} desapareció tras el insert", id)))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Servicio creado correctamente",
            "servicio": servicio,
        })),
    ))
}

async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(cambios): Json<ActualizarServicio>,
) -> Result<Json<serde_json::Value>> {
    if let Some(nombre) = cambios.nombre.as_deref() {
        validate_required_string(nombre, "El nombre")?;
    }
    if let Some(precio) = cambios.precio {
        validate_precio(precio)?;
    }
    if let Some(duracion) = cambios.duracion_minutos {
        if duracion <= 0 {
            return Err(Error::Validation(
                "La duración debe ser mayor que cero".to_string(),
            ));
        }
    }

    let mut conn = state.pool.acquire().await?;

    if !queries::servicios::update(&mut conn, id, &cambios).await? {
        return Err(Error::NotFound("Servicio no encontrado".to_string()));
    }

    let servicio = queries::servicios::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Servicio no encontrado".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Servicio actualizado correctamente",
        "servicio": servicio,
    })))
}

async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    if !queries::servicios::desactivar(&mut conn, id).await? {
        return Err(Error::NotFound("Servicio no encontrado".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "mensaje": "Servicio eliminado correctamente",
    })))
}

#[derive(Debug, Deserialize)]
struct LimiteReporte {
    limite: Option<i64>,
}

async fn mas_agendados(
    State(state): State<AppState>,
    Query(query): Query<LimiteReporte>,
) -> Result<Json<serde_json::Value>> {
    let limite = query.limite.unwrap_or(10).clamp(1, 100);
    let mut conn = state.pool.acquire().await?;
    let servicios = queries::servicios::mas_agendados(&mut conn, limite).await?;

    Ok(Json(json!({ "success": true, "servicios": servicios })))
}

async fn ingresos(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let ingresos = queries::servicios::ingresos(&mut conn).await?;

    Ok(Json(json!({ "success": true, "ingresos": ingresos })))
}
