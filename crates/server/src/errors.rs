use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::warn;

/// JSON error body of a failed RPC: `{"error": <message>, "code": <code>}`.
#[derive(Debug)]
pub struct RpcError {
    pub status: StatusCode,
    pub message: String,
    pub code: u16,
}

impl From<ServiceError> for RpcError {
    fn from(e: ServiceError) -> Self {
        let status = match e {
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        };
        Self { status, message: e.to_string(), code: e.code() }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, code = self.code, error = %self.message, "rpc failed");
        (self.status, Json(serde_json::json!({"error": self.message, "code": self.code}))).into_response()
    }
}
