use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EstadoCita {
    Pendiente,
    Confirmada,
    Completada,
    Cancelada,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cita {
    pub id: u64,
    pub usuario_id: Option<u64>,
    pub cliente_id: Option<u64>,
    pub servicio_id: u64,
    pub fecha_hora: NaiveDateTime,
    pub estado: EstadoCita,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Appointment joined with client and service data for listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CitaDetallada {
    pub id: u64,
    pub usuario_id: Option<u64>,
    pub cliente_id: Option<u64>,
    pub cliente_nombre: Option<String>,
    pub servicio_id: u64,
    pub servicio_nombre: String,
    pub duracion_minutos: i32,
    pub fecha_hora: NaiveDateTime,
    pub estado: EstadoCita,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaCita {
    pub cliente_id: Option<u64>,
    pub servicio_id: u64,
    pub fecha_hora: NaiveDateTime,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CambiarEstadoCita {
    pub estado: EstadoCita,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroCitas {
    pub fecha: Option<chrono::NaiveDate>,
    pub estado: Option<EstadoCita>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estado_cita_serializes_lowercase() {
        let json = serde_json::to_string(&EstadoCita::Confirmada).unwrap();
        assert_eq!(json, "\"confirmada\"");
    }

    #[test]
    fn estado_cita_parses_from_str() {
        let estado: EstadoCita = "cancelada".parse().unwrap();
        assert_eq!(estado, EstadoCita::Cancelada);
    }

    #[test]
    fn estado_cita_rejects_unknown() {
        assert!("archivada".parse::<EstadoCita>().is_err());
    }

    #[test]
    fn fecha_hora_parses_without_timezone() {
        let body: NuevaCita = serde_json::from_str(
            r#"{"servicio_id": 2, "fecha_hora": "2025-03-10T14:30:00"}"#,
        )
        .unwrap();
        assert_eq!(body.servicio_id, 2);
        assert!(body.cliente_id.is_none());
    }
}
