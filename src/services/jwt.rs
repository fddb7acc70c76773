use crate::error::{Error, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Access tokens expire 24 hours after issuance.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// JWT claims structure
///
/// Matches the payload the frontends already consume: numeric id, email and
/// a `rol` discriminator (`admin` or `cliente`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: u64,
    pub email: String,
    pub rol: String,
    /// Issued at time as Unix timestamp
    pub iat: i64,
    /// Expiration time as Unix timestamp
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.rol == "admin"
    }
}

/// Generates a signed access token for a user identity.
///
/// # Arguments
/// * `id` - Numeric account id (the fixed `1` for the admin account)
/// * `email` - Account email, embedded verbatim
/// * `rol` - Role discriminator embedded in the claims
/// * `secret` - The JWT secret key for signing
pub fn sign_token(id: u64, email: &str, rol: &str, secret: &str) -> Result<String> {
    let now = Utc::now();
    let expiration = now + Duration::hours(TOKEN_TTL_HOURS);

    let claims = Claims {
        id,
        email: email.to_string(),
        rol: rol.to_string(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| Error::Internal(format!("Failed to generate JWT: {}", e)))
}

/// Verifies a token and returns the claims if valid.
///
/// # Errors
/// Returns an authentication error if the token is expired, malformed or has
/// a bad signature. The message stays generic for the client.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        let error_msg = e.to_string().to_lowercase();
        if error_msg.contains("expired") {
            Error::Authentication("El token ha expirado".to_string())
        } else {
            Error::Authentication("Token inválido".to_string())
        }
    })?;

    Ok(token_data.claims)
}

/// Validates a token taken from an `Authorization: Bearer <token>` header.
pub fn authenticate_bearer(auth_header: Option<&str>, secret: &str) -> Result<Claims> {
    let token = extract_token_from_header(auth_header)?;
    verify_token(&token, secret)
}

/// Extracts the Bearer token from the Authorization header
fn extract_token_from_header(auth_header: Option<&str>) -> Result<String> {
    match auth_header {
        Some(header) if header.starts_with("Bearer ") => {
            let token = header[7..].to_string();
            if token.is_empty() {
                return Err(Error::Authentication("Token no proporcionado".to_string()));
            }
            Ok(token)
        }
        Some(_) => Err(Error::Authentication(
            "Formato de autorización inválido, se espera 'Bearer <token>'".to_string(),
        )),
        None => Err(Error::Authentication("Token no proporcionado".to_string())),
    }
}
