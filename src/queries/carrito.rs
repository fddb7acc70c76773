use crate::database::DbConn;
use crate::error::Result;
use crate::models::carrito::ItemCarrito;

pub async fn items_de_usuario(conn: &mut DbConn, usuario_id: u64) -> Result<Vec<ItemCarrito>> {
    let items = sqlx::query_as::<_, ItemCarrito>(
        "SELECT c.id, c.usuario_id, c.producto_id, p.nombre, p.precio, p.imagen_url,
                c.cantidad, p.stock, c.created_at
         FROM carrito c
         INNER JOIN productos p ON p.id = c.producto_id
         WHERE c.usuario_id = ?
         ORDER BY c.created_at ASC",
    )
    .bind(usuario_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

/// Cart rows are unique per (usuario, producto), so the product id is the
/// item key the API exposes.
pub async fn find_item(
    conn: &mut DbConn,
    usuario_id: u64,
    producto_id: u64,
) -> Result<Option<ItemCarrito>> {
    let item = sqlx::query_as::<_, ItemCarrito>(
        "SELECT c.id, c.usuario_id, c.producto_id, p.nombre, p.precio, p.imagen_url,
                c.cantidad, p.stock, c.created_at
         FROM carrito c
         INNER JOIN productos p ON p.id = c.producto_id
         WHERE c.usuario_id = ? AND c.producto_id = ?",
    )
    .bind(usuario_id)
    .bind(producto_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(item)
}

/// Adds units to the cart, accumulating onto an existing row for the same product.
pub async fn upsert_item(
    conn: &mut DbConn,
    usuario_id: u64,
    producto_id: u64,
    cantidad: i32,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO carrito (usuario_id, producto_id, cantidad)
         VALUES (?, ?, ?)
         ON DUPLICATE KEY UPDATE cantidad = cantidad + VALUES(cantidad)",
    )
    .bind(usuario_id)
    .bind(producto_id)
    .bind(cantidad)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn actualizar_cantidad(
    conn: &mut DbConn,
    usuario_id: u64,
    producto_id: u64,
    cantidad: i32,
) -> Result<bool> {
    let result =
        sqlx::query("UPDATE carrito SET cantidad = ? WHERE usuario_id = ? AND producto_id = ?")
            .bind(cantidad)
            .bind(usuario_id)
            .bind(producto_id)
            .execute(&mut *conn)
            .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn eliminar_item(conn: &mut DbConn, usuario_id: u64, producto_id: u64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM carrito WHERE usuario_id = ? AND producto_id = ?")
        .bind(usuario_id)
        .bind(producto_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn vaciar(conn: &mut DbConn, usuario_id: u64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM carrito WHERE usuario_id = ?")
        .bind(usuario_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
