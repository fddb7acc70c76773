use crate::database::DbConn;
use crate::error::Result;
use crate::models::cliente::{ActualizarCliente, Cliente, FiltroClientes, NuevoCliente};

pub async fn listar(conn: &mut DbConn, filtro: &FiltroClientes) -> Result<Vec<Cliente>> {
    let mut builder = sqlx::QueryBuilder::<sqlx::MySql>::new(
        "SELECT id, nombre, telefono, email, notas, created_at
         FROM clientes
         WHERE 1 = 1",
    );

    if let Some(buscar) = filtro.buscar.as_deref().filter(|s| !s.trim().is_empty()) {
        let patron = format!("%{}%", buscar.trim());
        builder
            .push(" AND (nombre LIKE ")
            .push_bind(patron.clone())
            .push(" OR telefono LIKE ")
            .push_bind(patron.clone())
            .push(" OR email LIKE ")
            .push_bind(patron)
            .push(")");
    }

    builder.push(" ORDER BY nombre ASC");

    let clientes = builder
        .build_query_as::<Cliente>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(clientes)
}

pub async fn find_by_id(conn: &mut DbConn, id: u64) -> Result<Option<Cliente>> {
    let cliente = sqlx::query_as::<_, Cliente>(
        "SELECT id, nombre, telefono, email, notas, created_at FROM clientes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(cliente)
}

pub async fn insert(conn: &mut DbConn, cliente: &NuevoCliente) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO clientes (nombre, telefono, email, notas) VALUES (?, ?, ?, ?)",
    )
    .bind(cliente.nombre.trim())
    .bind(cliente.telefono.as_deref())
    .bind(cliente.email.as_deref().map(|e| e.trim().to_lowercase()))
    .bind(cliente.notas.as_deref())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn update(conn: &mut DbConn, id: u64, cambios: &ActualizarCliente) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE clientes
         SET nombre = COALESCE(?, nombre),
             telefono = COALESCE(?, telefono),
             email = COALESCE(?, email),
             notas = COALESCE(?, notas)
         WHERE id = ?",
    )
    .bind(cambios.nombre.as_deref().map(str::trim))
    .bind(cambios.telefono.as_deref())
    .bind(cambios.email.as_deref().map(|e| e.trim().to_lowercase()))
    .bind(cambios.notas.as_deref())
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(conn: &mut DbConn, id: u64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM clientes WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn contar_citas(conn: &mut DbConn, cliente_id: u64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM citas WHERE cliente_id = ?")
        .bind(cliente_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}
