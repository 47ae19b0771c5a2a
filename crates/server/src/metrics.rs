use std::future::Future;

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec, IntCounter,
    IntCounterVec, TextEncoder,
};
use service::errors::ServiceError;

// Prometheus metrics (default registry)
pub static RPC_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "explore_rpc_requests_total",
        "Total RPCs received, by method",
        &["method"]
    )
    .expect("register rpc_requests_total")
});

pub static RPC_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "explore_rpc_errors_total",
        "Total RPCs that returned an error, by method",
        &["method"]
    )
    .expect("register rpc_errors_total")
});

pub static RPC_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "explore_rpc_duration_seconds",
        "RPC duration in seconds",
        &["method"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("register rpc_duration")
});

pub static DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "explore_decisions_total",
        "Decisions recorded, by outcome (like/pass)",
        &["outcome"]
    )
    .expect("register decisions_total")
});

pub static MUTUAL_MATCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "explore_mutual_matches_total",
        "Decisions that completed a mutual like"
    )
    .expect("register mutual_matches_total")
});

pub static LIKES_LISTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "explore_likes_listed_total",
        "Likers returned by ListLikedYou/ListNewLikedYou"
    )
    .expect("register likes_listed_total")
});

/// Count, time and error-track one RPC.
pub async fn observe<T, F>(method: &'static str, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    RPC_REQUESTS_TOTAL.with_label_values(&[method]).inc();
    let timer = RPC_DURATION.with_label_values(&[method]).start_timer();
    let res = call.await;
    timer.observe_duration();
    if res.is_err() {
        RPC_ERRORS_TOTAL.with_label_values(&[method]).inc();
    }
    res
}

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
