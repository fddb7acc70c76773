use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Servicio {
    pub id: u64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub duracion_minutos: i32,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoServicio {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    #[serde(default = "duracion_predeterminada")]
    pub duracion_minutos: i32,
}

fn duracion_predeterminada() -> i32 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActualizarServicio {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub duracion_minutos: Option<i32>,
    pub activo: Option<bool>,
}

/// Row of the most-booked-services report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServicioMasAgendado {
    pub servicio_id: u64,
    pub nombre: String,
    pub total_citas: i64,
}

/// Row of the service-revenue report (completed appointments only).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct IngresoServicio {
    pub servicio_id: u64,
    pub nombre: String,
    pub citas_completadas: i64,
    pub ingresos: f64,
}
