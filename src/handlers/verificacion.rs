use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::verificacion::{ConfirmarVerificacion, SolicitarVerificacion};
use crate::queries;
use crate::services::{bitacora, verificacion};
use crate::state::AppState;
use crate::validation::validate_email;

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/solicitar", post(solicitar))
        .route("/confirmar", post(confirmar))
}

/// Issues a fresh six digit code for the address. There is no mailer in
/// this deployment; the code surfaces through the server log.
async fn solicitar(
    State(state): State<AppState>,
    Json(body): Json<SolicitarVerificacion>,
) -> Result<Json<serde_json::Value>> {
    let email = body
        .email
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| Error::Validation("El email es requerido".to_string()))?;
    validate_email(email)?;
    let email = email.trim().to_lowercase();

    let mut conn = state.pool.acquire().await?;

    let usuario = queries::usuarios::find_by_email(&mut conn, &email)
        .await?
        .ok_or_else(|| Error::NotFound("Usuario no encontrado".to_string()))?;

    if usuario.verificado {
        return Err(Error::Conflict("El email ya está verificado".to_string()));
    }

    let codigo = verificacion::generar_codigo();
    queries::verificacion::invalidar_pendientes(&mut conn, &email).await?;
    queries::verificacion::insert_codigo(&mut conn, &email, &codigo, verificacion::expiracion())
        .await?;

    tracing::info!(email = %email, codigo = %codigo, "Código de verificación generado");

    Ok(Json(json!({
        "success": true,
        "mensaje": "Código de verificación generado",
    })))
}

async fn confirmar(
    State(state): State<AppState>,
    Json(body): Json<ConfirmarVerificacion>,
) -> Result<Json<serde_json::Value>> {
    let (email, codigo) = match (
        body.email.as_deref().filter(|e| !e.trim().is_empty()),
        body.codigo.as_deref().filter(|c| !c.trim().is_empty()),
    ) {
        (Some(email), Some(codigo)) => (email.trim().to_lowercase(), codigo.trim().to_string()),
        _ => {
            return Err(Error::Validation(
                "Email y código son requeridos".to_string(),
            ));
        }
    };

    let mut conn = state.pool.acquire().await?;

    let vigente =
        queries::verificacion::find_vigente(&mut conn, &email, &codigo, Utc::now().naive_utc())
            .await?
            .ok_or_else(|| Error::Validation("Código inválido o expirado".to_string()))?;

    let usuario = queries::usuarios::find_by_email(&mut conn, &email)
        .await?
        .ok_or_else(|| Error::NotFound("Usuario no encontrado".to_string()))?;

    queries::verificacion::marcar_usado(&mut conn, vigente.id).await?;
    queries::usuarios::marcar_verificado(&mut conn, usuario.id).await?;

    drop(conn);
    bitacora::registrar(
        &state.pool,
        "info",
        "verificacion",
        &format!("Email verificado: {}", email),
    );

    Ok(Json(json!({
        "success": true,
        "mensaje": "Email verificado correctamente",
    })))
}
