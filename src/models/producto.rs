use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Producto {
    pub id: u64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub stock: i32,
    pub categoria_id: Option<u64>,
    pub imagen_url: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoProducto {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    #[serde(default)]
    pub stock: i32,
    pub categoria_id: Option<u64>,
    pub imagen_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarProducto {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub stock: Option<i32>,
    pub categoria_id: Option<u64>,
    pub imagen_url: Option<String>,
    pub activo: Option<bool>,
}

/// Query-string filters for the public product listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroProductos {
    pub categoria: Option<u64>,
    pub buscar: Option<String>,
    pub limite: Option<i64>,
    pub offset: Option<i64>,
}

/// Row of the best-sellers report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductoMasVendido {
    pub producto_id: u64,
    pub nombre: String,
    pub unidades_vendidas: i64,
    pub ingresos: f64,
}
