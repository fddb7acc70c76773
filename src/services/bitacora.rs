//! Best-effort activity log.
//!
//! Mutating flows record a row in `logs`. A failure here must never fail
//! nor delay the request that triggered it, so the insert runs on its own
//! task and errors are downgraded to warnings.

use crate::database::DbPool;
use crate::queries;

pub fn registrar(pool: &DbPool, nivel: &str, origen: &str, mensaje: &str) {
    registrar_con_detalle(pool, nivel, origen, mensaje, None);
}

pub fn registrar_con_detalle(
    pool: &DbPool,
    nivel: &str,
    origen: &str,
    mensaje: &str,
    detalle: Option<&str>,
) {
    let pool = pool.clone();
    let nivel = nivel.to_string();
    let origen = origen.to_string();
    let mensaje = mensaje.to_string();
    let detalle = detalle.map(str::to_string);

    tokio::spawn(async move {
        let resultado = async {
            let mut conn = pool.acquire().await?;
            queries::logs::insert(&mut conn, &nivel, &origen, &mensaje, detalle.as_deref()).await
        }
        .await;

        if let Err(e) = resultado {
            tracing::warn!(error = %e, origen, "No se pudo registrar la actividad");
        }
    });
}
