use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::error::{Error, Result};
use crate::services::jwt;
use crate::state::AppState;

/// Fields arrive as options so a missing field maps to the 400 contract
/// instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct AdminLogin {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/auth/admin-login`
///
/// Compares the submitted pair against the configured admin literals. The
/// comparison is exact and case sensitive; there is no admin row in the
/// database.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<AdminLogin>,
) -> Result<Json<serde_json::Value>> {
    let (email, password) = match (
        body.email.as_deref().filter(|e| !e.is_empty()),
        body.password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            return Err(Error::Validation(
                "Email y contraseña son requeridos".to_string(),
            ));
        }
    };

    if email != state.config.admin_email
        || password != state.config.admin_password.expose_secret()
    {
        return Err(Error::Authentication("Credenciales incorrectas".to_string()));
    }

    let token = jwt::sign_token(1, email, "admin", state.config.jwt_secret.expose_secret())?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Login exitoso",
        "token": token,
        "usuario": {
            "id": 1,
            "email": email,
            "nombre": "Administrador",
            "rol": "admin",
        },
    })))
}
