//! JSON body sanitization.
//!
//! Every string value in an incoming JSON body is stripped of control
//! characters, `<script>` blocks, `javascript:` URLs and inline event
//! handler fragments before the handler deserializes it. Bodies above
//! [`MAX_BODY_BYTES`] are rejected with 413 before any handler runs.

use std::sync::LazyLock;

use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use regex::Regex;

use crate::error::{Error, Result};

/// Request body ceiling, 10 MB.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());
static SCRIPT_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script.*?>.*?</script>").unwrap());
static JS_PROTOCOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)javascript:").unwrap());
static EVENT_HANDLERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)on\w+\s*=").unwrap());

pub async fn sanitize_json_body(request: Request, next: Next) -> Result<Response> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);

    if !is_json {
        return Ok(next.run(request).await);
    }

    let (mut parts, body) = request.into_parts();

    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| Error::PayloadTooLarge)?;

    let sanitized = match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(mut value) => {
            limpiar_valor(&mut value);
            serde_json::to_vec(&value).unwrap_or_else(|_| bytes.to_vec())
        }
        // Malformed JSON flows through so the handler's extractor rejects it.
        Err(_) => bytes.to_vec(),
    };

    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(sanitized.len()));

    let request = Request::from_parts(parts, Body::from(sanitized));
    Ok(next.run(request).await)
}

fn limpiar_valor(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::String(s) => *s = limpiar_texto(s),
        serde_json::Value::Array(items) => items.iter_mut().for_each(limpiar_valor),
        serde_json::Value::Object(map) => map.values_mut().for_each(limpiar_valor),
        _ => {}
    }
}

pub fn limpiar_texto(input: &str) -> String {
    let paso1 = CONTROL_CHARS.replace_all(input, "");
    let paso2 = SCRIPT_TAGS.replace_all(&paso1, "");
    let paso3 = JS_PROTOCOL.replace_all(&paso2, "");
    EVENT_HANDLERS.replace_all(&paso3, "").into_owned()
}
