use chrono::NaiveDateTime;

use crate::database::DbConn;
use crate::error::Result;
use crate::models::cita::{CitaDetallada, EstadoCita, FiltroCitas, NuevaCita};

const COLUMNAS: &str = "c.id, c.usuario_id, c.cliente_id, cl.nombre AS cliente_nombre,
                c.servicio_id, s.nombre AS servicio_nombre, s.duracion_minutos,
                c.fecha_hora, c.estado, c.notas, c.created_at";

pub async fn listar(conn: &mut DbConn, filtro: &FiltroCitas) -> Result<Vec<CitaDetallada>> {
    let mut builder = sqlx::QueryBuilder::<sqlx::MySql>::new(format!(
        "SELECT {COLUMNAS}
         FROM citas c
         LEFT JOIN clientes cl ON cl.id = c.cliente_id
         INNER JOIN servicios s ON s.id = c.servicio_id
         WHERE 1 = 1"
    ));

    if let Some(fecha) = filtro.fecha {
        builder.push(" AND DATE(c.fecha_hora) = ").push_bind(fecha);
    }

    if let Some(estado) = filtro.estado {
        builder.push(" AND c.estado = ").push_bind(estado);
    }

    builder.push(" ORDER BY c.fecha_hora ASC");

    let citas = builder
        .build_query_as::<CitaDetallada>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(citas)
}

pub async fn listar_de_usuario(conn: &mut DbConn, usuario_id: u64) -> Result<Vec<CitaDetallada>> {
    let citas = sqlx::query_as::<_, CitaDetallada>(&format!(
        "SELECT {COLUMNAS}
         FROM citas c
         LEFT JOIN clientes cl ON cl.id = c.cliente_id
         INNER JOIN servicios s ON s.id = c.servicio_id
         WHERE c.usuario_id = ?
         ORDER BY c.fecha_hora ASC"
    ))
    .bind(usuario_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(citas)
}

pub async fn find_by_id(conn: &mut DbConn, id: u64) -> Result<Option<CitaDetallada>> {
    let cita = sqlx::query_as::<_, CitaDetallada>(&format!(
        "SELECT {COLUMNAS}
         FROM citas c
         LEFT JOIN clientes cl ON cl.id = c.cliente_id
         INNER JOIN servicios s ON s.id = c.servicio_id
         WHERE c.id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(cita)
}

/// Detects overlap with pending or confirmed appointments of the same
/// service, using the service duration for both intervals.
pub async fn existe_solapamiento(
    conn: &mut DbConn,
    servicio_id: u64,
    inicio: NaiveDateTime,
    fin: NaiveDateTime,
) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM citas c
         INNER JOIN servicios s ON s.id = c.servicio_id
         WHERE c.servicio_id = ?
           AND c.estado IN ('pendiente', 'confirmada')
           AND c.fecha_hora < ?
           AND DATE_ADD(c.fecha_hora, INTERVAL s.duracion_minutos MINUTE) > ?",
    )
    .bind(servicio_id)
    .bind(fin)
    .bind(inicio)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count > 0)
}

pub async fn insert(conn: &mut DbConn, usuario_id: Option<u64>, cita: &NuevaCita) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO citas (usuario_id, cliente_id, servicio_id, fecha_hora, notas)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(usuario_id)
    .bind(cita.cliente_id)
    .bind(cita.servicio_id)
    .bind(cita.fecha_hora)
    .bind(cita.notas.as_deref())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn cambiar_estado(conn: &mut DbConn, id: u64, estado: EstadoCita) -> Result<bool> {
    let result = sqlx::query("UPDATE citas SET estado = ? WHERE id = ?")
        .bind(estado)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
