use secrecy::ExposeSecret;
use sqlx::mysql::MySqlPoolOptions;

use crate::config::Config;
use crate::error::Result;

/// Database connection pool type
pub type DbPool = sqlx::MySqlPool;

/// Database connection type - supports both pool connections and transactions
/// Use `&mut conn` for pool connections, `tx.as_mut()` for transactions
pub type DbConn = sqlx::MySqlConnection;

/// Connection ceiling shared by every worker.
const MAX_CONNECTIONS: u32 = 10;

/// Creates the shared MySQL pool without touching the network.
///
/// Connections are established lazily on first acquire, so an unreachable
/// database never prevents the HTTP listener from starting. Reachability is
/// reported by [`startup_probe`] instead.
pub fn create_pool(config: &Config) -> Result<DbPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy(config.database_url().expose_secret())?;
    Ok(pool)
}

/// One diagnostic connection at startup, fail-open.
///
/// On success logs confirmation, applies pending migrations and releases the
/// probe connection back to the pool. On failure logs the error and returns:
/// the server keeps serving, and handlers that need the pool fail per-request.
pub async fn startup_probe(pool: &DbPool) {
    match pool.acquire().await {
        Ok(conn) => {
            tracing::info!("✅ Conectado a MySQL correctamente");
            drop(conn);
            if let Err(e) = sqlx::migrate!().run(pool).await {
                tracing::error!(error = %e, "No se pudieron aplicar las migraciones");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "❌ Error conectando a MySQL");
        }
    }
}
