use crate::database::DbConn;
use crate::error::Result;
use crate::models::servicio::{
    ActualizarServicio, IngresoServicio, NuevoServicio, Servicio, ServicioMasAgendado,
};

pub async fn listar(conn: &mut DbConn) -> Result<Vec<Servicio>> {
    let servicios = sqlx::query_as::<_, Servicio>(
        "SELECT id, nombre, descripcion, precio, duracion_minutos, activo, created_at
         FROM servicios
         WHERE activo = TRUE
         ORDER BY nombre ASC",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(servicios)
}

pub async fn find_by_id(conn: &mut DbConn, id: u64) -> Result<Option<Servicio>> {
    let servicio = sqlx::query_as::<_, Servicio>(
        "SELECT id, nombre, descripcion, precio, duracion_minutos, activo, created_at
         FROM servicios
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(servicio)
}

pub async fn insert(conn: &mut DbConn, servicio: &NuevoServicio) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO servicios (nombre, descripcion, precio, duracion_minutos)
         VALUES (?, ?, ?, ?)",
    )
    .bind(servicio.nombre.trim())
    .bind(servicio.descripcion.as_deref())
    .bind(servicio.precio)
    .bind(servicio.duracion_minutos)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn update(
    conn: &mut DbConn,
    id: u64,
    cambios: &ActualizarServicio,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE servicios
         SET nombre = COALESCE(?, nombre),
             descripcion = COALESCE(?, descripcion),
             precio = COALESCE(?, precio),
             duracion_minutos = COALESCE(?, duracion_minutos),
             activo = COALESCE(?, activo)
         WHERE id = ?",
    )
    .bind(cambios.nombre.as_deref().map(str::trim))
    .bind(cambios.descripcion.as_deref())
    .bind(cambios.precio)
    .bind(cambios.duracion_minutos)
    .bind(cambios.activo)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Services referenced by appointments are deactivated instead of removed.
pub async fn desactivar(conn: &mut DbConn, id: u64) -> Result<bool> {
    let result = sqlx::query("UPDATE servicios SET activo = FALSE WHERE id = ? AND activo = TRUE")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn mas_agendados(conn: &mut DbConn, limite: i64) -> Result<Vec<ServicioMasAgendado>> {
    let filas = sqlx::query_as::<_, ServicioMasAgendado>(
        "SELECT s.id AS servicio_id, s.nombre, COUNT(c.id) AS total_citas
         FROM citas c
         INNER JOIN servicios s ON s.id = c.servicio_id
         WHERE c.estado <> 'cancelada'
         GROUP BY s.id, s.nombre
         ORDER BY total_citas DESC
         LIMIT ?",
    )
    .bind(limite)
    .fetch_all(&mut *conn)
    .await?;

    Ok(filas)
}

pub async fn ingresos(conn: &mut DbConn) -> Result<Vec<IngresoServicio>> {
    let filas = sqlx::query_as::<_, IngresoServicio>(
        "SELECT s.id AS servicio_id, s.nombre,
                COUNT(c.id) AS citas_completadas,
                COALESCE(SUM(s.precio), 0) AS ingresos
         FROM citas c
         INNER JOIN servicios s ON s.id = c.servicio_id
         WHERE c.estado = 'completada'
         GROUP BY s.id, s.nombre
         ORDER BY ingresos DESC",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(filas)
}
