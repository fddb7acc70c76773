use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TipoMovimiento {
    Entrada,
    Salida,
    Ajuste,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MovimientoInventario {
    pub id: u64,
    pub producto_id: u64,
    pub producto_nombre: String,
    pub tipo: TipoMovimiento,
    pub cantidad: i32,
    pub motivo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `entrada` and `salida` move stock by `cantidad`; `ajuste` sets the
/// absolute value.
#[derive(Debug, Clone, Deserialize)]
pub struct AjusteInventario {
    pub producto_id: u64,
    pub tipo: TipoMovimiento,
    pub cantidad: i32,
    pub motivo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroMovimientos {
    pub producto_id: Option<u64>,
    pub tipo: Option<TipoMovimiento>,
    pub limite: Option<i64>,
}
