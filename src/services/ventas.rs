//! Sale creation, shared by the sales endpoint and cart checkout.
//!
//! Every sale runs inside a single transaction: product rows are locked,
//! stock is checked and decremented, and an inventory movement is recorded
//! per line. Any failure rolls the whole sale back.

use crate::database::{DbConn, DbPool};
use crate::error::{Error, Result};
use crate::models::inventario::TipoMovimiento;
use crate::models::venta::{ItemVenta, VentaConDetalles};
use crate::queries;
use crate::validation::validate_cantidad;

pub async fn crear_venta(
    pool: &DbPool,
    usuario_id: Option<u64>,
    cliente_id: Option<u64>,
    items: &[ItemVenta],
) -> Result<VentaConDetalles> {
    if items.is_empty() {
        return Err(Error::Validation(
            "La venta debe incluir al menos un producto".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;
    let venta = registrar_venta(tx.as_mut(), usuario_id, cliente_id, items).await?;
    tx.commit().await?;

    Ok(venta)
}

/// Converts the user's cart into a paid sale and empties it, atomically.
pub async fn confirmar_carrito(
    pool: &DbPool,
    usuario_id: u64,
    cliente_id: Option<u64>,
) -> Result<VentaConDetalles> {
    let mut tx = pool.begin().await?;

    let items_carrito = queries::carrito::items_de_usuario(tx.as_mut(), usuario_id).await?;
    if items_carrito.is_empty() {
        return Err(Error::Validation("El carrito está vacío".to_string()));
    }

    let items: Vec<ItemVenta> = items_carrito
        .iter()
        .map(|item| ItemVenta {
            producto_id: item.producto_id,
            cantidad: item.cantidad,
        })
        .collect();

    let venta = registrar_venta(tx.as_mut(), Some(usuario_id), cliente_id, &items).await?;
    queries::carrito::vaciar(tx.as_mut(), usuario_id).await?;

    tx.commit().await?;

    Ok(venta)
}

/// Runs the sale against an open transaction.
///
/// Prices come from the current product rows, never from the request, and
/// each row is locked before its stock is checked.
async fn registrar_venta(
    conn: &mut DbConn,
    usuario_id: Option<u64>,
    cliente_id: Option<u64>,
    items: &[ItemVenta],
) -> Result<VentaConDetalles> {
    for item in items {
        validate_cantidad(item.cantidad)?;
    }

    let mut lineas = Vec::with_capacity(items.len());
    let mut total = 0.0;

    for item in items {
        let producto = queries::productos::find_by_id_for_update(&mut *conn, item.producto_id)
            .await?
            .ok_or_else(|| Error::NotFound("Producto no encontrado".to_string()))?;

        if producto.stock < item.cantidad {
            return Err(Error::Validation(format!(
                "Stock insuficiente para {}",
                producto.nombre
            )));
        }

        let subtotal = producto.precio * f64::from(item.cantidad);
        total += subtotal;
        lineas.push((producto, item.cantidad));
    }

    let venta_id = queries::ventas::insert_venta(&mut *conn, usuario_id, cliente_id, total).await?;

    for (producto, cantidad) in &lineas {
        queries::ventas::insert_detalle(&mut *conn, venta_id, producto.id, *cantidad, producto.precio)
            .await?;

        // The guard re-checks stock at write time; rows read under FOR UPDATE
        // can still collide when the same product appears twice in the items.
        if !queries::productos::descontar_stock(&mut *conn, producto.id, *cantidad).await? {
            return Err(Error::Validation(format!(
                "Stock insuficiente para {}",
                producto.nombre
            )));
        }

        queries::inventario::insert_movimiento(
            &mut *conn,
            producto.id,
            TipoMovimiento::Salida,
            *cantidad,
            Some(&format!("Venta #{}", venta_id)),
        )
        .await?;
    }

    let venta = queries::ventas::find_by_id(&mut *conn, venta_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Venta {} desapareció tras el insert", venta_id)))?;
    let detalles = queries::ventas::detalles_de_venta(&mut *conn, venta_id).await?;

    Ok(VentaConDetalles { venta, detalles })
}
