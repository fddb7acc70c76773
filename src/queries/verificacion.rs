use chrono::NaiveDateTime;

use crate::database::DbConn;
use crate::error::Result;
use crate::models::verificacion::Verificacion;

pub async fn insert_codigo(
    conn: &mut DbConn,
    email: &str,
    codigo: &str,
    expira_en: NaiveDateTime,
) -> Result<u64> {
    let result =
        sqlx::query("INSERT INTO verificaciones (email, codigo, expira_en) VALUES (?, ?, ?)")
            .bind(email)
            .bind(codigo)
            .bind(expira_en)
            .execute(&mut *conn)
            .await?;

    Ok(result.last_insert_id())
}

/// Marks every pending code for the address as consumed so only the latest
/// one works.
pub async fn invalidar_pendientes(conn: &mut DbConn, email: &str) -> Result<u64> {
    let result =
        sqlx::query("UPDATE verificaciones SET usado = TRUE WHERE email = ? AND usado = FALSE")
            .bind(email)
            .execute(&mut *conn)
            .await?;

    Ok(result.rows_affected())
}

/// Timestamps are compared against the caller's clock, not the database's,
/// so expiry behaves the same regardless of the server session timezone.
pub async fn find_vigente(
    conn: &mut DbConn,
    email: &str,
    codigo: &str,
    ahora: NaiveDateTime,
) -> Result<Option<Verificacion>> {
    let verificacion = sqlx::query_as::<_, Verificacion>(
        "SELECT id, email, codigo, expira_en, usado, created_at
         FROM verificaciones
         WHERE email = ? AND codigo = ? AND usado = FALSE AND expira_en > ?
         ORDER BY created_at DESC
         LIMIT 1",
    )
    .bind(email)
    .bind(codigo)
    .bind(ahora)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(verificacion)
}

pub async fn marcar_usado(conn: &mut DbConn, id: u64) -> Result<bool> {
    let result = sqlx::query("UPDATE verificaciones SET usado = TRUE WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
