use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Categoria {
    pub id: u64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaCategoria {
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarCategoria {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub activo: Option<bool>,
}
