use crate::database::DbConn;
use crate::error::Result;
use crate::models::inventario::{FiltroMovimientos, MovimientoInventario, TipoMovimiento};

const LIMITE_PREDETERMINADO: i64 = 100;
const LIMITE_MAXIMO: i64 = 500;

pub async fn listar_movimientos(
    conn: &mut DbConn,
    filtro: &FiltroMovimientos,
) -> Result<Vec<MovimientoInventario>> {
    let mut builder = sqlx::QueryBuilder::<sqlx::MySql>::new(
        "SELECT m.id, m.producto_id, p.nombre AS producto_nombre, m.tipo, m.cantidad,
                m.motivo, m.created_at
         FROM inventario_movimientos m
         INNER JOIN productos p ON p.id = m.producto_id
         WHERE 1 = 1",
    );

    if let Some(producto_id) = filtro.producto_id {
        builder.push(" AND m.producto_id = ").push_bind(producto_id);
    }

    if let Some(tipo) = filtro.tipo {
        builder.push(" AND m.tipo = ").push_bind(tipo);
    }

    let limite = filtro
        .limite
        .unwrap_or(LIMITE_PREDETERMINADO)
        .clamp(1, LIMITE_MAXIMO);

    builder
        .push(" ORDER BY m.created_at DESC LIMIT ")
        .push_bind(limite);

    let movimientos = builder
        .build_query_as::<MovimientoInventario>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(movimientos)
}

pub async fn insert_movimiento(
    conn: &mut DbConn,
    producto_id: u64,
    tipo: TipoMovimiento,
    cantidad: i32,
    motivo: Option<&str>,
) -> Result<u64> {
    let result = sqlx::query(
        "INSERT INTO inventario_movimientos (producto_id, tipo, cantidad, motivo)
         VALUES (?, ?, ?, ?)",
    )
    .bind(producto_id)
    .bind(tipo)
    .bind(cantidad)
    .bind(motivo)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_id())
}
