//! Input validation utilities for the service layer.

use crate::error::{Error, Result};

/// Validates email format without pulling in a full RFC parser.
///
/// # Examples
/// ```
/// use salon_backend::validation::validate_email;
///
/// validate_email("cliente@example.com").unwrap();
/// assert!(validate_email("sin-arroba").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(Error::Validation("El email es requerido".to_string()));
    }

    if email.len() > 254 {
        return Err(Error::Validation("El email es demasiado largo".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::Validation("El formato del email no es válido".to_string()));
    }

    let domain = parts[1];
    if !domain.contains('.') || email.contains("..") {
        return Err(Error::Validation("El formato del email no es válido".to_string()));
    }

    let invalid_chars = ['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', ' '];
    if email.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(Error::Validation("El formato del email no es válido".to_string()));
    }

    Ok(())
}

/// Validates password length bounds for customer accounts.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(Error::Validation(
            "La contraseña debe tener al menos 8 caracteres".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(Error::Validation("La contraseña es demasiado larga".to_string()));
    }

    if password.contains(' ') {
        return Err(Error::Validation(
            "La contraseña no puede contener espacios".to_string(),
        ));
    }

    Ok(())
}

/// Trims and rejects empty required fields.
pub fn validate_required_string(input: &str, field_name: &str) -> Result<String> {
    let sanitized = input.trim().to_string();

    if sanitized.is_empty() {
        return Err(Error::Validation(format!("{} es requerido", field_name)));
    }

    Ok(sanitized)
}

/// Validates that a quantity is a positive amount.
pub fn validate_cantidad(cantidad: i32) -> Result<()> {
    if cantidad <= 0 {
        return Err(Error::Validation(
            "La cantidad debe ser mayor que cero".to_string(),
        ));
    }
    Ok(())
}

/// Validates that a price is non-negative and finite.
pub fn validate_precio(precio: f64) -> Result<()> {
    if !precio.is_finite() || precio < 0.0 {
        return Err(Error::Validation("El precio no es válido".to_string()));
    }
    Ok(())
}
