use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cliente {
    pub id: u64,
    pub nombre: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoCliente {
    pub nombre: String,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarCliente {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroClientes {
    pub buscar: Option<String>,
}
