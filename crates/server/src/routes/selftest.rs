use axum::{extract::State, Json};

use common::types::SelfTestReport;

use crate::auth::AppState;

/// Run the three-store CRUD cycle. Per-sequence failures are captured into
/// their slots, so this handler itself cannot fail; callers interpret the
/// per-store outcomes.
pub async fn run_selftest(State(state): State<AppState>) -> Json<SelfTestReport> {
    let report = service::selftest::run(&state.db, &state.cache, state.objects.as_ref()).await;
    Json(report)
}
