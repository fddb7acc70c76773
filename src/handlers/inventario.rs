use axum::{
    Json, Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_admin;
use crate::models::inventario::{AjusteInventario, FiltroMovimientos, TipoMovimiento};
use crate::queries;
use crate::services::bitacora;
use crate::state::AppState;
use crate::validation::validate_cantidad;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/movimientos", get(movimientos))
        .route("/ajuste", post(ajustar))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

async fn movimientos(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroMovimientos>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let movimientos = queries::inventario::listar_movimientos(&mut conn, &filtro).await?;

    Ok(Json(json!({ "success": true, "movimientos": movimientos })))
}

/// Applies a manual stock movement and records it, in one transaction.
async fn ajustar(
    State(state): State<AppState>,
    Json(body): Json<AjusteInventario>,
) -> Result<Json<serde_json::Value>> {
    match body.tipo {
        TipoMovimiento::Entrada | TipoMovimiento::Salida => validate_cantidad(body.cantidad)?,
        TipoMovimiento::Ajuste => {
            if body.cantidad < 0 {
                return Err(Error::Validation(
                    "El stock no puede ser negativo".to_string(),
                ));
            }
        }
    }

    let mut tx = state.pool.begin().await?;

    let producto = queries::productos::find_by_id_for_update(tx.as_mut(), body.producto_id)
        .await?
        .ok_or_else(|| Error::NotFound("Producto no encontrado".to_string()))?;

    let nuevo_stock = match body.tipo {
        TipoMovimiento::Entrada => producto.stock.checked_add(body.cantidad).ok_or_else(|| {
            Error::Validation("El stock resultante excede el máximo permitido".to_string())
        })?,
        TipoMovimiento::Salida => {
            if producto.stock < body.cantidad {
                return Err(Error::Validation(format!(
                    "Stock insuficiente para {}",
                    producto.nombre
                )));
            }
            producto.stock - body.cantidad
        }
        TipoMovimiento::Ajuste => body.cantidad,
    };

    queries::productos::set_stock(tx.as_mut(), producto.id, nuevo_stock).await?;
    queries::inventario::insert_movimiento(
        tx.as_mut(),
        producto.id,
        body.tipo,
        body.cantidad,
        body.motivo.as_deref(),
    )
    .await?;

    let producto = queries::productos::find_by_id(tx.as_mut(), producto.id)
        .await?
        .ok_or_else(|| Error::NotFound("Producto no encontrado".to_string()))?;

    tx.commit().await?;

    bitacora::registrar(
        &state.pool,
        "info",
        "inventario",
        &format!(
            "Movimiento {} de {} unidades para {}",
            body.tipo, body.cantidad, producto.nombre
        ),
    );

    Ok(Json(json!({
        "success": true,
        "mensaje": "Inventario actualizado",
        "producto": producto,
    })))
}
