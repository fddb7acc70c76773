use crate::database::DbConn;
use crate::error::Result;
use crate::models::usuario::{ActualizarPerfil, RegistroUsuario, Usuario};

pub async fn insert(
    conn: &mut DbConn,
    registro: &RegistroUsuario,
    password_hash: &str,
) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO usuarios (nombre, email, password_hash, telefono) VALUES (?, ?, ?, ?)",
    )
    .bind(registro.nombre.trim())
    .bind(registro.email.trim().to_lowercase())
    .bind(password_hash)
    .bind(registro.telefono.as_deref())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn find_by_email(conn: &mut DbConn, email: &str) -> Result<Option<Usuario>> {
    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT id, nombre, email, password_hash, telefono, rol, verificado, activo,
                created_at, updated_at
         FROM usuarios
         WHERE email = ?",
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(usuario)
}

pub async fn find_by_id(conn: &mut DbConn, id: u64) -> Result<Option<Usuario>> {
    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT id, nombre, email, password_hash, telefono, rol, verificado, activo,
                created_at, updated_at
         FROM usuarios
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(usuario)
}

pub async fn listar(conn: &mut DbConn) -> Result<Vec<Usuario>> {
    let usuarios = sqlx::query_as::<_, Usuario>(
        "SELECT id, nombre, email, password_hash, telefono, rol, verificado, activo,
                created_at, updated_at
         FROM usuarios
         ORDER BY created_at DESC",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(usuarios)
}

pub async fn email_exists(conn: &mut DbConn, email: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE email = ?")
        .bind(email.trim().to_lowercase())
        .fetch_one(&mut *conn)
        .await?;

    Ok(count > 0)
}

pub async fn update_perfil(
    conn: &mut DbConn,
    id: u64,
    cambios: &ActualizarPerfil,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE usuarios
         SET nombre = COALESCE(?, nombre),
             telefono = COALESCE(?, telefono)
         WHERE id = ?",
    )
    .bind(cambios.nombre.as_deref().map(str::trim))
    .bind(cambios.telefono.as_deref())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn marcar_verificado(conn: &mut DbConn, id: u64) -> Result<bool> {
    let result = sqlx::query("UPDATE usuarios SET verificado = TRUE WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}
