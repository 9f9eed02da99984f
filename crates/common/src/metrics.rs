use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static SELFTEST_RUNS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "conncheck_selftest_runs_total",
        "Total self-test invocations"
    )
    .expect("register selftest_runs_total")
});

pub static SELFTEST_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "conncheck_selftest_failures_total",
        "Self-test sequence failures by store",
        &["store"]
    )
    .expect("register selftest_failures_total")
});

pub static READINESS_DEGRADED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "conncheck_readiness_degraded_total",
        "Readiness checks that returned a degraded verdict"
    )
    .expect("register readiness_degraded_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
