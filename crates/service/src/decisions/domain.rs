use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored like/pass from `actor_id` to `recipient_id`. Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub actor_id: String,
    pub recipient_id: String,
    pub liked: bool,
    /// Recipient has not been shown this like yet
    pub is_new: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Cached number of likes received
    pub likes: u64,
    pub gender: String,
    pub created_at: u64,
    pub updated_at: u64,
    pub is_active: bool,
}

/// Result of an active-user lookup. Inactive accounts read as `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Found(User),
    NotFound,
}

impl UserLookup {
    pub fn into_option(self) -> Option<User> {
        match self {
            UserLookup::Found(user) => Some(user),
            UserLookup::NotFound => None,
        }
    }
}

/// PutDecision input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutDecisionInput {
    pub actor_id: String,
    pub recipient_id: String,
    pub liked: bool,
}

/// One entry of a "liked you" page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liker {
    pub actor_id: String,
    pub unix_timestamp: u64,
}

impl From<&Decision> for Liker {
    fn from(d: &Decision) -> Self {
        Liker { actor_id: d.actor_id.clone(), unix_timestamp: d.updated_at }
    }
}

/// A page of likers plus the token for the next page, if the page was full
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedYouPage {
    pub likers: Vec<Liker>,
    pub next_pagination_token: Option<String>,
}
