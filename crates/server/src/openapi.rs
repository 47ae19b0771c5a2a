use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ListLikedYouRequestDoc {
    pub recipient_user_id: String,
    /// Decimal page number returned as `nextPaginationToken`; defaults to "1"
    pub pagination_token: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct LikerDoc { pub actor_id: String, pub unix_timestamp: u64 }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ListLikedYouResponseDoc {
    pub likers: Vec<LikerDoc>,
    /// Present only when the page was full
    pub next_pagination_token: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CountLikedYouRequestDoc { pub recipient_user_id: String }

#[derive(ToSchema)]
pub struct CountLikedYouResponseDoc { pub count: u64 }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PutDecisionRequestDoc {
    pub actor_user_id: String,
    pub recipient_user_id: String,
    pub liked_recipient: bool,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PutDecisionResponseDoc { pub mutual_likes: bool }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::rpc::list_liked_you,
        crate::routes::rpc::list_new_liked_you,
        crate::routes::rpc::count_liked_you,
        crate::routes::rpc::put_decision,
    ),
    components(
        schemas(
            HealthResponse,
            ListLikedYouRequestDoc,
            LikerDoc,
            ListLikedYouResponseDoc,
            CountLikedYouRequestDoc,
            CountLikedYouResponseDoc,
            PutDecisionRequestDoc,
            PutDecisionResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "explore")
    )
)]
pub struct ApiDoc;
