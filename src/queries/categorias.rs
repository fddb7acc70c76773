use crate::database::DbConn;
use crate::error::Result;
use crate::models::categoria::{ActualizarCategoria, Categoria, NuevaCategoria};

pub async fn listar(conn: &mut DbConn) -> Result<Vec<Categoria>> {
    let categorias = sqlx::query_as::<_, Categoria>(
        "SELECT id, nombre, descripcion, activo, created_at
         FROM categorias
         WHERE activo = TRUE
         ORDER BY nombre ASC",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(categorias)
}

pub async fn find_by_id(conn: &mut DbConn, id: u64) -> Result<Option<Categoria>> {
    let categoria = sqlx::query_as::<_, Categoria>(
        "SELECT id, nombre, descripcion, activo, created_at FROM categorias WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(categoria)
}

pub async fn nombre_exists(conn: &mut DbConn, nombre: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categorias WHERE nombre = ?")
        .bind(nombre.trim())
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

pub async fn insert(conn: &mut DbConn, categoria: &NuevaCategoria) -> Result<u64> {
    let result = sqlx::query("INSERT INTO categorias (nombre, descripcion) VALUES (?, ?)")
        .bind(categoria.nombre.trim())
        .bind(categoria.descripcion.as_deref())
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_id())
}

pub async fn update(
    conn: &mut DbConn,
    id: u64,
    cambios: &ActualizarCategoria,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE categorias
         SET nombre = COALESCE(?, nombre),
             descripcion = COALESCE(?, descripcion),
             activo = COALESCE(?, activo)
         WHERE id = ?",
    )
    .bind(cambios.nombre.as_deref().map(str::trim))
    .bind(cambios.descripcion.as_deref())
    .bind(cambios.activo)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Categories referenced by products stay in history, so deletion only
/// deactivates them.
pub async fn desactivar(conn: &mut DbConn, id: u64) -> Result<bool> {
    let result = sqlx::query("UPDATE categorias SET activo = FALSE WHERE id = ? AND activo = TRUE")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn contar_productos(conn: &mut DbConn, categoria_id: u64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM productos WHERE categoria_id = ? AND activo = TRUE",
    )
    .bind(categoria_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}
