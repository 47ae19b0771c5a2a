pub mod rpc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::metrics;
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_text() -> impl IntoResponse {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: RPC methods plus health, metrics and API docs
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let rpc = Router::new()
        .route("/explore.ExploreService/ListLikedYou", post(rpc::list_liked_you))
        .route("/explore.ExploreService/ListNewLikedYou", post(rpc::list_new_liked_you))
        .route("/explore.ExploreService/CountLikedYou", post(rpc::count_liked_you))
        .route("/explore.ExploreService/PutDecision", post(rpc::put_decision))
        .with_state(state);

    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .route("/api-docs/openapi.json", get(openapi_json));

    // Compose
    ops.merge(rpc)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // span 路径即 RPC 方法名，如 /explore.ExploreService/PutDecision
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 503/504 的 RpcError 在此以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
