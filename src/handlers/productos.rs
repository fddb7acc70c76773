use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::require_admin;
use crate::models::inventario::TipoMovimiento;
use crate::models::producto::{ActualizarProducto, FiltroProductos, NuevoProducto};
use crate::queries;
use crate::services::bitacora;
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

/// Router for `/api/productos/reportes`, mounted before the parent.
pub fn reportes_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/mas-vendidos", get(mas_vendidos))
        .route("/stock-bajo", get(stock_bajo))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

async fn listar(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroProductos>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let productos = queries::productos::listar(&mut conn, &filtro).await?;

    Ok(Json(json!({ "success": true, "productos": productos })))
}

#[derive(Debug, serde::Deserialize)]
struct ParamsMasVendidos {
    limite: Option<i64>,
}

async fn mas_vendidos(
    State(state): State<AppState>,
    Query(query): Query<ParamsMasVendidos>,
) -> Result<Json<serde_json::Value>> {
    let limite = query.limite.unwrap_or(10).clamp(1, 100);
    let mut conn = state.pool.acquire().await?;
    let productos = queries::productos::mas_vendidos(&mut conn, limite).await?;

    Ok(Json(json!({ "success": true, "productos": productos })))
}

#[derive(Debug, serde::Deserialize)]
struct ParamsStockBajo {
    umbral: Option<i32>,
}

async fn stock_bajo(
    State(state): State<AppState>,
    Query(query): Query<ParamsStockBajo>,
) -> Result<Json<serde_json::Value>> {
    let umbral = query.umbral.unwrap_or(5).max(0);
    let mut conn = state.pool.acquire().await?;
    let productos = queries::productos::stock_bajo(&mut conn, umbral).await?;

    Ok(Json(json!({ "success": true, "productos": productos })))
}

async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    let producto = queries::productos::find_by_id(&mut conn, id)
        .await?
        .filter(|p| p.activo)
        .ok_or_else(|| Error::NotFound("Producto no encontrado".to_string()))?;

    Ok(Json(json!({ "success": true, "producto": producto })))
}

async fn crear(
    State(state): State<AppState>,
    Json(body): Json<NuevoProducto>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validate_required_string(&body.nombre, "El nombre")?;
    validate_precio(body.precio)?;
    if body.stock < 0 {
        return Err(Error::Validation(
            "El stock no puede ser negativo".to_string(),
        ));
    }

    let mut tx = state.pool.begin().await?;

    if let Some(categoria_id) = body.categoria_id {
        if queries::categorias::find_by_id(tx.as_mut(), categoria_id)
            .await?
            .filter(|c| c.activo)
            .is_none()
        {
            return Err(Error::Validation("La categoría no existe".to_string()));
        }
    }

    let id = queries::productos::insert(tx.as_mut(), &body).await?;

    // Initial stock enters the ledger as a movement too.
    if body.stock > 0 {
        queries::inventario::insert_movimiento(
            tx.as_mut(),
            id,
            TipoMovimiento::Entrada,
            body.stock,
            Some("Stock inicial"),
        )
        .await?;
    }

    let producto = queries::productos::find_by_id(tx.as_mut(), id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Producto {} desapareció tras el insert", id)))?;

    tx.commit().await?;

    bitacora::registrar(
        &state.pool,
        "info",
        "productos",
        &format!("Producto creado: {}", producto.nombre),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Producto creado correctamente",
            "producto": producto,
        })),
    ))
}

async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(cambios): Json<ActualizarProducto>,
) -> Result<Json<serde_json::Value>> {
    if let Some(nombre) = cambios.nombre.as_deref() {
        validate_required_string(nombre, "El nombre")?;
    }
    if let Some(precio) = cambios.precio {
        validate_precio(precio)?;
    }
    if let Some(stock) = cambios.stock {
        if stock < 0 {
            return Err(Error::Validation(
                "El stock no puede ser negativo".to_string(),
            ));
        }
    }

    let mut conn = state.pool.acquire().await?;

    if let Some(categoria_id) = cambios.categoria_id {
        if queries::categorias::find_by_id(&mut conn, categoria_id)
            .await?
            .filter(|c| c.activo)
            .is_none()
        {
            return Err(Error::Validation("La categoría no existe".to_string()));
        }
    }

    if !queries::productos::update(&mut conn, id, &cambios).await? {
        return Err(Error::NotFound("Producto no encontrado".to_string()));
    }

    let producto = queries::productos::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("Producto no encontrado".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Producto actualizado correctamente",
        "producto": producto,
    })))
}

async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    if !queries::productos::desactivar(&mut conn, id).await? {
        return Err(Error::NotFound("Producto no encontrado".to_string()));
    }

    drop(conn);
    bitacora::registrar(
        &state.pool,
        "info",
        "productos",
        &format!("Producto {} desactivado", id),
    );

    Ok(Json(json!({
        "success": true,
        "mensaje": "Producto eliminado correctamente",
    })))
}
