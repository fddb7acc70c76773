use crate::database::DbConn;
use crate::error::Result;
use crate::models::producto::{
    ActualizarProducto, FiltroProductos, NuevoProducto, Producto, ProductoMasVendido,
};

const LIMITE_PREDETERMINADO: i64 = 50;
const LIMITE_MAXIMO: i64 = 200;

pub async fn listar(conn: &mut DbConn, filtro: &FiltroProductos) -> Result<Vec<Producto>> {
    let mut builder = sqlx::QueryBuilder::<sqlx::MySql>::new(
        "SELECT id, nombre, descripcion, precio, stock, categoria_id, imagen_url, activo,
                created_at, updated_at
         FROM productos
         WHERE activo = TRUE",
    );

    if let Some(categoria_id) = filtro.categoria {
        builder.push(" AND categoria_id = ").push_bind(categoria_id);
    }

    if let Some(buscar) = filtro.buscar.as_deref().filter(|s| !s.trim().is_empty()) {
        let patron = format!("%{}%", buscar.trim());
        builder
            .push(" AND (nombre LIKE ")
            .push_bind(patron.clone())
            .push(" OR descripcion LIKE ")
            .push_bind(patron)
            .push(")");
    }

    let limite = filtro
        .limite
        .unwrap_or(LIMITE_PREDETERMINADO)
        .clamp(1, LIMITE_MAXIMO);
    let offset = filtro.offset.unwrap_or(0).max(0);

    builder
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limite)
        .push(" OFFSET ")
        .push_bind(offset);

    let productos = builder
        .build_query_as::<Producto>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(productos)
}

pub async fn find_by_id(conn: &mut DbConn, id: u64) -> Result<Option<Producto>> {
    let producto = sqlx::query_as::<_, Producto>(
        "SELECT id, nombre, descripcion, precio, stock, categoria_id, imagen_url, activo,
                created_at, updated_at
         FROM productos
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(producto)
}

/// Locks the product row for the duration of the enclosing transaction.
pub async fn find_by_id_for_update(conn: &mut DbConn, id: u64) -> Result<Option<Producto>> {
    let producto = sqlx::query_as::<_, Producto>(
        "SELECT id, nombre, descripcion, precio, stock, categoria_id, imagen_url, activo,
                created_at, updated_at
         FROM productos
         WHERE id = ? AND activo = TRUE
         FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(producto)
}

pub async fn insert(conn: &mut DbConn, producto: &NuevoProducto) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO productos (nombre, descripcion, precio, stock, categoria_id, imagen_url)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(producto.nombre.trim())
    .bind(producto.descripcion.as_deref())
    .bind(producto.precio)
    .bind(producto.stock)
    .bind(producto.categoria_id)
    .bind(producto.imagen_url.as_deref())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn update(
    conn: &mut DbConn,
    id: u64,
    cambios: &ActualizarProducto,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE productos
         SET nombre = COALESCE(?, nombre),
             descripcion = COALESCE(?, descripcion),
             precio = COALESCE(?, precio),
             stock = COALESCE(?, stock),
             categoria_id = COALESCE(?, categoria_id),
             imagen_url = COALESCE(?, imagen_url),
             activo = COALESCE(?, activo)
         WHERE id = ?",
    )
    .bind(cambios.nombre.as_deref().map(str::trim))
    .bind(cambios.descripcion.as_deref())
    .bind(cambios.precio)
    .bind(cambios.stock)
    .bind(cambios.categoria_id)
    .bind(cambios.imagen_url.as_deref())
    .bind(cambios.activo)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Products stay in past sale lines, so deletion only deactivates them.
pub async fn desactivar(conn: &mut DbConn, id: u64) -> Result<bool> {
    let result = sqlx::query("UPDATE productos SET activo = FALSE WHERE id = ? AND activo = TRUE")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_stock(conn: &mut DbConn, id: u64, stock: i32) -> Result<bool> {
    let result = sqlx::query("UPDATE productos SET stock = ? WHERE id = ?")
        .bind(stock)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Decrements stock only when enough units remain, guarding against oversell.
pub async fn descontar_stock(conn: &mut DbConn, id: u64, cantidad: i32) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE productos SET stock = stock - ? WHERE id = ? AND stock >= ?",
    )
    .bind(cantidad)
    .bind(id)
    .bind(cantidad)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn mas_vendidos(conn: &mut DbConn, limite: i64) -> Result<Vec<ProductoMasVendido>> {
    let filas = sqlx::query_as::<_, ProductoMasVendido>(
        "SELECT p.id AS producto_id,
                p.nombre,
                CAST(SUM(d.cantidad) AS SIGNED) AS unidades_vendidas,
                SUM(d.cantidad * d.precio_unitario) AS ingresos
         FROM detalle_ventas d
         INNER JOIN ventas v ON v.id = d.venta_id AND v.estado = 'pagada'
         INNER JOIN productos p ON p.id = d.producto_id
         GROUP BY p.id, p.nombre
         ORDER BY unidades_vendidas DESC
         LIMIT ?",
    )
    .bind(limite)
    .fetch_all(&mut *conn)
    .await?;

    Ok(filas)
}

pub async fn stock_bajo(conn: &mut DbConn, umbral: i32) -> Result<Vec<Producto>> {
    let productos = sqlx::query_as::<_, Producto>(
        "SELECT id, nombre, descripcion, precio, stock, categoria_id, imagen_url, activo,
                created_at, updated_at
         FROM productos
         WHERE activo = TRUE AND stock <= ?
         ORDER BY stock ASC",
    )
    .bind(umbral)
    .fetch_all(&mut *conn)
    .await?;

    Ok(productos)
}
