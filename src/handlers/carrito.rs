use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_auth;
use crate::models::carrito::{ActualizarCantidad, AgregarCarrito, ResumenCarrito};
use crate::queries;
use crate::services::{bitacora, jwt::Claims, ventas};
use crate::state::AppState;
use crate::validation::validate_cantidad;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(ver))
        .route("/agregar", post(agregar))
        .route(
            "/item/{producto_id}",
            put(actualizar_item).delete(eliminar_item),
        )
        .route("/vaciar", delete(vaciar))
        .route("/confirmar", post(confirmar))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
}

async fn ver(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let items = queries::carrito::items_de_usuario(&mut conn, claims.id).await?;
    let resumen = ResumenCarrito::new(items);

    Ok(Json(json!({
        "success": true,
        "items": resumen.items,
        "total": resumen.total,
    })))
}

async fn agregar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<AgregarCarrito>,
) -> Result<Json<serde_json::Value>> {
    validate_cantidad(body.cantidad)?;

    let mut conn = state.pool.acquire().await?;

    let producto = queries::productos::find_by_id(&mut conn, body.producto_id)
        .await?
        .filter(|p| p.activo)
        .ok_or_else(|| Error::NotFound("Producto no encontrado".to_string()))?;

    if producto.stock < body.cantidad {
        return Err(Error::Validation(format!(
            "Stock insuficiente para {}",
            producto.nombre
        )));
    }

    queries::carrito::upsert_item(&mut conn, claims.id, body.producto_id, body.cantidad).await?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Producto agregado al carrito",
    })))
}

async fn actualizar_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(producto_id): Path<u64>,
    Json(body): Json<ActualizarCantidad>,
) -> Result<Json<serde_json::Value>> {
    validate_cantidad(body.cantidad)?;

    let mut conn = state.pool.acquire().await?;

    let item = queries::carrito::find_item(&mut conn, claims.id, producto_id)
        .await?
        .ok_or_else(|| Error::NotFound("Artículo no encontrado en el carrito".to_string()))?;

    if item.stock < body.cantidad {
        return Err(Error::Validation(format!(
            "Stock insuficiente para {}",
            item.nombre
        )));
    }

    queries::carrito::actualizar_cantidad(&mut conn, claims.id, producto_id, body.cantidad).await?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Cantidad actualizada",
    })))
}

async fn eliminar_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(producto_id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    if !queries::carrito::eliminar_item(&mut conn, claims.id, producto_id).await? {
        return Err(Error::NotFound(
            "Artículo no encontrado en el carrito".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "mensaje": "Artículo eliminado del carrito",
    })))
}

async fn vaciar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    queries::carrito::vaciar(&mut conn, claims.id).await?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Carrito vaciado",
    })))
}

#[derive(Debug, Default, Deserialize)]
struct ConfirmarCarrito {
    cliente_id: Option<u64>,
}

/// Checkout: the cart becomes a paid sale in one transaction.
async fn confirmar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Option<Json<ConfirmarCarrito>>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let Json(body) = body.unwrap_or_default();

    let venta = ventas::confirmar_carrito(&state.pool, claims.id, body.cliente_id).await?;

    bitacora::registrar(
        &state.pool,
        "info",
        "carrito",
        &format!("Carrito confirmado como venta #{}", venta.venta.id),
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
