use crate::database::DbConn;
use crate::error::Result;
use crate::models::log::{FiltroLogs, RegistroLog};

const LIMITE_PREDETERMINADO: i64 = 100;
const LIMITE_MAXIMO: i64 = 1000;

pub async fn listar(conn: &mut DbConn, filtro: &FiltroLogs) -> Result<Vec<RegistroLog>> {
    let mut builder = sqlx::QueryBuilder::<sqlx::MySql>::new(
        "SELECT id, nivel, origen, mensaje, detalle, created_at
         FROM logs
         WHERE 1 = 1",
    );

    if let Some(nivel) = filtro.nivel.as_deref().filter(|n| !n.trim().is_empty()) {
        builder
            .push(" AND nivel = ")
            .push_bind(nivel.trim().to_lowercase());
    }

    let limite = filtro
        .limite
        .unwrap_or(LIMITE_PREDETERMINADO)
        .clamp(1, LIMITE_MAXIMO);

    builder
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(limite);

    let registros = builder
        .build_query_as::<RegistroLog>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(registros)
}

pub async fn insert(
    conn: &mut DbConn,
    nivel: &str,
    origen: &str,
    mensaje: &str,
    detalle: Option<&str>,
) -> Result<u64> {
    let result =
        sqlx::query("INSERT INTO logs (nivel, origen, mensaje, detalle) VALUES (?, ?, ?, ?)")
            .bind(nivel)
            .bind(origen)
            .bind(mensaje)
            .bind(detalle)
            .execute(&mut *conn)
            .await?;

    Ok(result.last_insert_id())
}
