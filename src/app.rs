//! Router assembly: middleware stack, static uploads mount and the API table.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    middleware::from_fn,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::handlers;
use crate::middleware::sanitize::{MAX_BODY_BYTES, sanitize_json_body};
use crate::middleware::security;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    // Static uploads bypass the API table. The header set is forced so
    // file responses stay identical regardless of the outer layers.
    let uploads = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .service(ServeDir::new(state.storage.base_dir()).append_index_html_on_directories(false));

    // Nested report routers are registered before their parents so the
    // static `reportes` segment is never shadowed by `/{id}`.
    let api = Router::new()
        .nest("/usuarios", handlers::usuarios::router(&state))
        .nest("/verificacion", handlers::verificacion::router(&state))
        .nest(
            "/productos/reportes",
            handlers::productos::reportes_router(&state),
        )
        .nest("/productos", handlers::productos::router(&state))
        .nest("/inventario", handlers::inventario::router(&state))
        .nest("/categorias", handlers::categorias::router(&state))
        .nest("/carrito", handlers::carrito::router(&state))
        .nest(
            "/servicios/reportes",
            handlers::servicios::reportes_router(&state),
        )
        .nest("/servicios", handlers::servicios::router(&state))
        .nest("/upload", handlers::upload::router(&state))
        .nest("/logs", handlers::logs::router(&state))
        .nest("/citas", handlers::citas::router(&state))
        .nest("/ventas", handlers::ventas::router(&state))
        .nest("/clientes", handlers::clientes::router(&state))
        .route("/auth/admin-login", post(handlers::auth::admin_login));

    let app = Router::new()
        .route("/", get(handlers::root::api_info))
        .nest("/api", api)
        .nest_service("/uploads", uploads);

    security::with_security_headers(app)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(security::cors())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
                .layer(CompressionLayer::new())
                .layer(from_fn(sanitize_json_body)),
        )
        .with_state(state)
}
