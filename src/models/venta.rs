use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EstadoVenta {
    Pendiente,
    Pagada,
    Cancelada,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Venta {
    pub id: u64,
    pub usuario_id: Option<u64>,
    pub cliente_id: Option<u64>,
    pub total: f64,
    pub estado: EstadoVenta,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DetalleVenta {
    pub id: u64,
    pub venta_id: u64,
    pub producto_id: u64,
    pub producto_nombre: String,
    pub cantidad: i32,
    pub precio_unitario: f64,
    pub subtotal: f64,
}

/// Sale with its line items, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VentaConDetalles {
    #[serde(flatten)]
    pub venta: Venta,
    pub detalles: Vec<DetalleVenta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaVenta {
    pub cliente_id: Option<u64>,
    pub items: Vec<ItemVenta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemVenta {
    pub producto_id: u64,
    pub cantidad: i32,
}
