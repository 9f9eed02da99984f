use axum::{extract::State, http::StatusCode, Json};

use common::types::{Health, Readiness};

use crate::auth::AppState;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Liveness only; touches no backing store.
pub async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Point-in-time readiness over the three backing stores.
pub async fn readyz(State(state): State<AppState>) -> Json<Readiness> {
    let report = service::readiness::check(
        &state.db,
        &state.cache,
        state.objects.as_ref(),
        VERSION,
        &state.env,
    )
    .await;
    Json(report)
}

pub async fn metrics() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}
