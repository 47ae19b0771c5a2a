//! ExploreService RPC handlers: one `POST` per method, camelCase JSON bodies.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use service::decisions::domain::{LikedYouPage, Liker, PutDecisionInput};

use crate::errors::RpcError;
use crate::metrics::{self, observe};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLikedYouRequest {
    pub recipient_user_id: String,
    #[serde(default)]
    pub pagination_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLikedYouResponse {
    pub likers: Vec<Liker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_pagination_token: Option<String>,
}

impl From<LikedYouPage> for ListLikedYouResponse {
    fn from(page: LikedYouPage) -> Self {
        Self { likers: page.likers, next_pagination_token: page.next_pagination_token }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountLikedYouRequest {
    pub recipient_user_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountLikedYouResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutDecisionRequest {
    pub actor_user_id: String,
    pub recipient_user_id: String,
    pub liked_recipient: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PutDecisionResponse {
    pub mutual_likes: bool,
}

#[utoipa::path(
    post, path = "/explore.ExploreService/ListLikedYou", tag = "explore",
    request_body = crate::openapi::ListLikedYouRequestDoc,
    responses(
        (status = 200, description = "Page of likers", body = crate::openapi::ListLikedYouResponseDoc),
        (status = 503, description = "Store unavailable"),
        (status = 504, description = "Deadline exceeded")
    )
)]
pub async fn list_liked_you(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ListLikedYouRequest>,
) -> Result<Json<ListLikedYouResponse>, RpcError> {
    let ctx = state.request_context(&headers);
    let page = observe(
        "ListLikedYou",
        state.decisions.list_liked_you(&ctx, &req.recipient_user_id, req.pagination_token.as_deref()),
    )
    .await?;
    metrics::LIKES_LISTED_TOTAL.inc_by(page.likers.len() as u64);
    Ok(Json(page.into()))
}

#[utoipa::path(
    post, path = "/explore.ExploreService/ListNewLikedYou", tag = "explore",
    request_body = crate::openapi::ListLikedYouRequestDoc,
    responses(
        (status = 200, description = "Page of likers not shown before", body = crate::openapi::ListLikedYouResponseDoc),
        (status = 503, description = "Store unavailable"),
        (status = 504, description = "Deadline exceeded")
    )
)]
pub async fn list_new_liked_you(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ListLikedYouRequest>,
) -> Result<Json<ListLikedYouResponse>, RpcError> {
    let ctx = state.request_context(&headers);
    let page = observe(
        "ListNewLikedYou",
        state.decisions.list_new_liked_you(&ctx, &req.recipient_user_id, req.pagination_token.as_deref()),
    )
    .await?;
    metrics::LIKES_LISTED_TOTAL.inc_by(page.likers.len() as u64);
    Ok(Json(page.into()))
}

#[utoipa::path(
    post, path = "/explore.ExploreService/CountLikedYou", tag = "explore",
    request_body = crate::openapi::CountLikedYouRequestDoc,
    responses(
        (status = 200, description = "Cached like count", body = crate::openapi::CountLikedYouResponseDoc),
        (status = 503, description = "Store unavailable"),
        (status = 504, description = "Deadline exceeded")
    )
)]
pub async fn count_liked_you(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CountLikedYouRequest>,
) -> Result<Json<CountLikedYouResponse>, RpcError> {
    let ctx = state.request_context(&headers);
    let count = observe("CountLikedYou", state.decisions.count_liked_you(&ctx, &req.recipient_user_id)).await?;
    Ok(Json(CountLikedYouResponse { count }))
}

#[utoipa::path(
    post, path = "/explore.ExploreService/PutDecision", tag = "explore",
    request_body = crate::openapi::PutDecisionRequestDoc,
    responses(
        (status = 200, description = "Decision recorded", body = crate::openapi::PutDecisionResponseDoc),
        (status = 503, description = "Outcome unknown, safe to retry"),
        (status = 504, description = "Deadline exceeded, outcome unknown")
    )
)]
pub async fn put_decision(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PutDecisionRequest>,
) -> Result<Json<PutDecisionResponse>, RpcError> {
    let ctx = state.request_context(&headers);
    let input = PutDecisionInput {
        actor_id: req.actor_user_id,
        recipient_id: req.recipient_user_id,
        liked: req.liked_recipient,
    };
    let mutual_likes = observe("PutDecision", state.decisions.put_decision(&ctx, &input)).await?;
    metrics::DECISIONS_TOTAL
        .with_label_values(&[if input.liked { "like" } else { "pass" }])
        .inc();
    if mutual_likes {
        metrics::MUTUAL_MATCHES_TOTAL.inc();
    }
    Ok(Json(PutDecisionResponse { mutual_likes }))
}
