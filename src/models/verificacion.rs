use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Verificacion {
    pub id: u64,
    pub email: String,
    #[serde(skip_serializing)]
    pub codigo: String,
    pub expira_en: NaiveDateTime,
    pub usado: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolicitarVerificacion {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmarVerificacion {
    pub email: Option<String>,
    pub codigo: Option<String>,
}
