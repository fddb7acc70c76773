use thiserror::Error;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A validation error (bad client input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// An authentication error (missing or invalid credentials).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A forbidden error (valid identity, insufficient role).
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// A conflict error (resource state rejects the operation).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body exceeded the configured ceiling.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert custom Error to HTTP response.
///
/// Every error renders the API's `{success: false, mensaje}` envelope.
/// Database and internal failures are logged with their detail and reach the
/// client only as a generic message.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, mensaje) = match self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Error::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Error::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "La carga útil excede el tamaño permitido".to_string(),
            ),
            Error::Sqlx(e) => {
                tracing::error!(error = %e, "Error de base de datos");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                )
            }
            Error::Internal(msg) => {
                tracing::error!(error = %msg, "Error interno");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                )
            }
            Error::Config(e) => {
                tracing::error!(error = %e, "Error de configuración");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error interno del servidor".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "success": false,
            "mensaje": mensaje,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validation_error_is_400() {
        let response = Error::Validation("campo requerido".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn authentication_error_is_401() {
        let response =
            Error::Authentication("Credenciales incorrectas".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let response = Error::Internal("pool exhausted at worker 3".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["mensaje"], "Error interno del servidor");
        assert!(!bytes.windows(4).any(|w| w == b"pool"));
    }

    #[tokio::test]
    async fn payload_too_large_is_413() {
        let response = Error::PayloadTooLarge.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
