use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RegistroLog {
    pub id: u64,
    pub nivel: String,
    pub origen: String,
    pub mensaje: String,
    pub detalle: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroLogs {
    pub nivel: Option<String>,
    pub limite: Option<i64>,
}
