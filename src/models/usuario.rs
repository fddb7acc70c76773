use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Usuario {
    pub id: u64,
    pub nombre: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub telefono: Option<String>,
    pub rol: String,
    pub verificado: bool,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistroUsuario {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub telefono: Option<String>,
}

/// Fields arrive as options so a missing field maps to the 400 contract
/// instead of a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUsuario {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarPerfil {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
}
