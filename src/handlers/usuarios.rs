use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use secrecy::ExposeSecret;
use serde_json::json;

use crate::error::{Error, Result};
use crate::middleware::auth::{require_admin, require_auth};
use crate::models::usuario::{ActualizarPerfil, LoginUsuario, RegistroUsuario};
use crate::queries;
use crate::services::{bitacora, jwt, password};
use crate::state::AppState;
use crate::validation::{validate_email, validate_password, validate_required_string};

pub fn router(state: &AppState) -> Router<AppState> {
    let publico = Router::new()
        .route("/registro", post(registro))
        .route("/login", post(login));

    let autenticado = Router::new()
        .route("/perfil", get(perfil).put(actualizar_perfil))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/", get(listar))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    publico.merge(autenticado).merge(admin)
}

async fn registro(
    State(state): State<AppState>,
    Json(body): Json<RegistroUsuario>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let nombre = validate_required_string(&body.nombre, "El nombre")?;
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    let mut conn = state.pool.acquire().await?;

    if queries::usuarios::email_exists(&mut conn, &body.email).await? {
        return Err(Error::Conflict("El email ya está registrado".to_string()));
    }

    let hash = password::hash_password(&body.password)?;
    let registro = RegistroUsuario {
        nombre,
        ..body.clone()
    };
    let id = queries::usuarios::insert(&mut conn, &registro, &hash).await?;

    let usuario = queries::usuarios::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Usuario {} desapareció tras el insert", id)))?;

    let token = jwt::sign_token(
        usuario.id,
        &usuario.email,
        &usuario.rol,
        state.config.jwt_secret.expose_secret(),
    )?;

    drop(conn);
    bitacora::registrar(
        &state.pool,
        "info",
        "usuarios",
        &format!("Usuario registrado: {}", usuario.email),
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "mensaje": "Usuario registrado correctamente",
            "token": token,
            "usuario": usuario,
        })),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginUsuario>,
) -> Result<Json<serde_json::Value>> {
    let (email, password_plano) = match (
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

    let mut conn = state.pool.acquire().await?;

    let usuario = queries::usuarios::find_by_email(&mut conn, email)
        .await?
        .filter(|u| u.activo)
        .ok_or_else(|| Error::Authentication("Credenciales incorrectas".to_string()))?;

    if !password::verify_password(password_plano, &usuario.password_hash)? {
        return Err(Error::Authentication("Credenciales incorrectas".to_string()));
    }

    let token = jwt::sign_token(
        usuario.id,
        &usuario.email,
        &usuario.rol,
        state.config.jwt_secret.expose_secret(),
    )?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Login exitoso",
        "token": token,
        "usuario": usuario,
    })))
}

async fn perfil(
    State(state): State<AppState>,
    Extension(claims): Extension<jwt::Claims>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;

    let usuario = queries::usuarios::find_by_id(&mut conn, claims.id)
        .await?
        .ok_or_else(|| Error::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(json!({ "success": true, "usuario": usuario })))
}

async fn actualizar_perfil(
    State(state): State<AppState>,
    Extension(claims): Extension<jwt::Claims>,
    Json(cambios): Json<ActualizarPerfil>,
) -> Result<Json<serde_json::Value>> {
    if let Some(nombre) = cambios.nombre.as_deref() {
        validate_required_string(nombre, "El nombre")?;
    }

    let mut conn = state.pool.acquire().await?;

    if !queries::usuarios::update_perfil(&mut conn, claims.id, &cambios).await? {
        return Err(Error::NotFound("Usuario no encontrado".to_string()));
    }

    let usuario = queries::usuarios::find_by_id(&mut conn, claims.id)
        .await?
        .ok_or_else(|| Error::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "mensaje": "Perfil actualizado correctamente",
        "usuario": usuario,
    })))
}

async fn listar(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let usuarios = queries::usuarios::listar(&mut conn).await?;

    Ok(Json(json!({ "success": true, "usuarios": usuarios })))
}
