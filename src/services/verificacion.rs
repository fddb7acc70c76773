use chrono::{Duration, NaiveDateTime, Utc};
use rand::Rng;

/// Verification codes stay valid for fifteen minutes.
pub const CODIGO_TTL_MINUTOS: i64 = 15;

/// Generates a six digit numeric verification code.
pub fn generar_codigo() -> String {
    let codigo: u32 = rand::rng().random_range(100_000..=999_999);
    codigo.to_string()
}

/// Expiry instant for a code issued now, as a naive UTC timestamp for the
/// DATETIME column.
pub fn expiracion() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::minutes(CODIGO_TTL_MINUTOS)
}
