use crate::database::DbConn;
use crate::error::Result;
use crate::models::venta::{DetalleVenta, Venta};

pub async fn insert_venta(
    conn: &mut DbConn,
    usuario_id: Option<u64>,
    cliente_id: Option<u64>,
    total: f64,
) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO ventas (usuario_id, cliente_id, total, estado) VALUES (?, ?, ?, 'pagada')",
    )
    .bind(usuario_id)
    .bind(cliente_id)
    .bind(total)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn insert_detalle(
    conn: &mut DbConn,
    venta_id: u64,
    producto_id: u64,
    cantidad: i32,
    precio_unitario: f64,
) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO detalle_ventas (venta_id, producto_id, cantidad, precio_unitario)
         VALUES (?, ?, ?, ?)",
    )
    .bind(venta_id)
    .bind(producto_id)
    .bind(cantidad)
    .bind(precio_unitario)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn listar(conn: &mut DbConn) -> Result<Vec<Venta>> {
    let ventas = sqlx::query_as::<_, Venta>(
        "SELECT id, usuario_id, cliente_id, total, estado, created_at
         FROM ventas
         ORDER BY created_at DESC",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(ventas)
}

pub async fn find_by_id(conn: &mut DbConn, id: u64) -> Result<Option<Venta>> {
    let venta = sqlx::query_as::<_, Venta>(
        "SELECT id, usuario_id, cliente_id, total, estado, created_at
         FROM ventas
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(venta)
}

pub async fn detalles_de_venta(conn: &mut DbConn, venta_id: u64) -> Result<Vec<DetalleVenta>> {
    let detalles = sqlx::query_as::<_, DetalleVenta>(
        "SELECT d.id, d.venta_id, d.producto_id, p.nombre AS producto_nombre,
                d.cantidad, d.precio_unitario,
                d.cantidad * d.precio_unitario AS subtotal
         FROM detalle_ventas d
         INNER JOIN productos p ON p.id = d.producto_id
         WHERE d.venta_id = ?
         ORDER BY d.id ASC",
    )
    .bind(venta_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(detalles)
}
