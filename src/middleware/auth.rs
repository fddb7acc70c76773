//! Token gating for protected routes.
//!
//! `require_auth` validates the Bearer token and stores the [`Claims`] in the
//! request extensions for handlers that need the caller's identity.
//! `require_admin` additionally rejects non admin roles.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::error::{Error, Result};
use crate::services::jwt::{self, Claims};
use crate::state::AppState;

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let claims = authenticate(&state, &request)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let claims = authenticate(&state, &request)?;

    if !claims.is_admin() {
        return Err(Error::Forbidden(
            "Se requieren permisos de administrador".to_string(),
        ));
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, request: &Request) -> Result<Claims> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    jwt::authenticate_bearer(auth_header, state.config.jwt_secret.expose_secret())
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use secrecy::ExposeSecret;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::database;

    fn test_state() -> AppState {
        let config = Config::default();
        let pool = database::create_pool(&config).expect("pool");
        AppState::new(pool, config)
    }

    fn protected_app(state: AppState) -> Router {
        Router::new()
            .route("/protegido", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    fn admin_app(state: AppState) -> Router {
        Router::new()
            .route("/solo-admin", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(state.clone(), require_admin))
            .with_state(state)
    }

    #[tokio::test]
    async fn missing_token_is_401() {
        let app = protected_app(test_state());
        let response = app
            .oneshot(Request::get("/protegido").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes() {
        let state = test_state();
        let token = jwt::sign_token(
            1,
            &state.config.admin_email,
            "admin",
            state.config.jwt_secret.expose_secret(),
        )
        .unwrap();

        let app = protected_app(state);
        let response = app
            .oneshot(
                Request::get("/protegido")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn non_admin_role_is_403() {
        let state = test_state();
        let token = jwt::sign_token(
            9,
            "cliente@example.com",
            "cliente",
            state.config.jwt_secret.expose_secret(),
        )
        .unwrap();

        let app = admin_app(state);
        let response = app
            .oneshot(
                Request::get("/solo-admin")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_role_passes_admin_gate() {
        let state = test_state();
        let token = jwt::sign_token(
            1,
            &state.config.admin_email,
            "admin",
            state.config.jwt_secret.expose_secret(),
        )
        .unwrap();

        let app = admin_app(state);
        let response = app
            .oneshot(
                Request::get("/solo-admin")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
