use axum::{
    Json, Router,
    extract::{Query, State},
    middleware::from_fn_with_state,
    routing::get,
};
use serde_json::json;

use crate::error::Result;
use crate::middleware::auth::require_admin;
use crate::models::log::FiltroLogs;
use crate::queries;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(listar))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

async fn listar(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroLogs>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let logs = queries::logs::listar(&mut conn, &filtro).await?;

    Ok(Json(json!({ "success": true, "logs": logs })))
}
