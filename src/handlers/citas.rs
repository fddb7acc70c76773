use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use chrono::Duration;
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::{require_admin, require_auth};
use crate::models::cita::{CambiarEstadoCita, EstadoCita, FiltroCitas, NuevaCita};
use crate::queries;
use crate::services::{bitacora, jwt::Claims};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let autenticado = Router::new()
        .route("/", post(agendar))
        .route("/mias", get(mis_citas))
        .route("/{id}", delete(cancelar))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/", get(listar))
        .route("/{id}/estado", put(cambiar_estado))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    autenticado.merge(admin)
}

/// Books an appointment. The slot is the service duration starting at
/// `fecha_hora`; a clash with a pending or confirmed appointment of the
/// same service is rejected.
async fn agendar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<NuevaCita>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let mut conn = state.pool.acquire().await?;

    let servicio = queries::servicios::find_by_id(&mut conn, body.servicio_id)
        .await?
        .filter(|s| s.activo)
        .ok_or_else(|| Error::NotFound("Servicio no encontrado".to_string()))?;

    if let Some(cliente_id) = body.cliente_id {
        if queries::clientes::find_by_id(&mut conn, cliente_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound("Cliente no encontrado".to_string()));
        }
    }

    let inicio = body.fecha_hora;
    let fin = inicio + Duration::minutes(i64::from(servicio.duracion_minutos));

    if queries::citas::existe_solapamiento(&mut conn, servicio.id, inicio, fin).await? {
        return Err(Error::Conflict("El horario no está disponible".to_string()));
    }

    let id = queries::citas::insert(&mut conn, Some(claims.id), &body).await?;
    let cita = queries::citas::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Cita {} desapareció tras el insert", id)))?;

    drop(conn);
    bitacora::registrar(
        &state.pool,
        "info",
        "citas",
        &format!("Cita #{} agendada para {}", cita.id, cita.fecha_hora),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Cita agendada correctamente",
            "cita": cita,
        })),
    ))
}

async fn mis_citas(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let citas = queries::citas::listar_de_usuario(&mut conn, claims.id).await?;

    Ok(Json(json!({ "success": true, "citas": citas })))
}

/// The owner (or an admin) cancels; cancelling frees the slot.
async fn cancelar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    let cita = queries::citas::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Cita no encontrada".to_string()))?;

    if !claims.is_admin() && cita.usuario_id != Some(claims.id) {
        return Err(Error::Forbidden("No puedes cancelar esta cita".to_string()));
    }

    if cita.estado == EstadoCita::Cancelada {
        return Err(Error::Conflict("La cita ya está cancelada".to_string()));
    }

    queries::citas::cambiar_estado(&mut conn, id, EstadoCita::Cancelada).await?;

    drop(conn);
    bitacora::registrar(
        &state.pool,
        "info",
        "citas",
        &format!("Cita #{} cancelada", id),
    );

    Ok(Json(json!({
        "success": true,
        "mensaje": "Cita cancelada",
    })))
}

async fn listar(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroCitas>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let citas = queries::citas::listar(&mut conn, &filtro).await?;

    Ok(Json(json!({ "success": true, "citas": citas })))
}

async fn cambiar_estado(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<CambiarEstadoCita>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    if queries::citas::find_by_id(&mut conn, id).await?.is_none() {
        return Err(Error::NotFound("Cita no encontrada".to_string()));
    }

    queries::citas::cambiar_estado(&mut conn, id, body.estado).await?;

    let cita = queries::citas::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Cita no encontrada".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Estado de la cita actualizado",
        "cita": cita,
    })))
}
