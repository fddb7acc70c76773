use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_admin;
use crate::models::venta::{NuevaVenta, VentaConDetalles};
use crate::queries;
use crate::services::{bitacora, jwt::Claims, ventas};
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(crear).get(listar))
        .route("/{id}", get(obtener))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

async fn crear(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<NuevaVenta>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    if let Some(cliente_id) = body.cliente_id {
        let mut conn = state.pool.acquire().await?;
        if queries::clientes::find_by_id(&mut conn, cliente_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound("Cliente no encontrado".to_string()));
        }
    }

    let venta = ventas::crear_venta(&state.pool, Some(claims.id), body.cliente_id, &body.items)
        .await?;

    let detalle = serde_json::to_string(&venta.detalles).ok();
    bitacora::registrar_con_detalle(
        &state.pool,
        "info",
        "ventas",
        &format!("Venta #{} registrada por {:.2}", venta.venta.id, venta.venta.total),
        detalle.as_deref(),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Venta registrada correctamente",
            "venta": venta,
        })),
    ))
}

async fn listar(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let ventas = queries::ventas::listar(&mut conn).await?;

    Ok(Json(json!({ "success": true, "ventas": ventas })))
}

async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    let venta = queries::ventas::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Venta no encontrada".to_string()))?;
    let detalles = queries::ventas::detalles_de_venta(&mut conn, id).await?;

    Ok(Json(json!({
        "success": true,
        "venta": VentaConDetalles { venta, detalles },
    })))
}
