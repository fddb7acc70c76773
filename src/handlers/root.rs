use axum::Json;
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Body of the root diagnostic endpoint.
///
/// `endpoints` keeps its declaration order in the JSON output, matching what
/// the deployed frontends already parse.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub mensaje: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub endpoints: IndexMap<&'static str, &'static str>,
}

/// `GET /` - liveness and endpoint directory. Always 200, no side effects.
pub async fn api_info() -> Json<ApiInfo> {
    let mut endpoints = IndexMap::new();
    endpoints.insert("productos", "/api/productos");
    endpoints.insert("carrito", "/api/carrito");
    endpoints.insert("categorias", "/api/categorias");
    endpoints.insert("usuarios", "/api/usuarios");
    endpoints.insert("verificacion", "/api/verificacion");
    endpoints.insert("auth", "/api/auth");
    endpoints.insert("admin", "/api/admin");
    endpoints.insert("citas", "/api/citas");
    endpoints.insert("stock", "/api/stock");

    Json(ApiInfo {
        mensaje: "🟢 API del Salón Sandra Fajardo funcionando correctamente",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        endpoints,
    })
}
