use std::sync::Arc;

use models::decision::LikeFilter;
use tracing::{debug, error, info, instrument};

use super::context::RequestContext;
use super::domain::{LikedYouPage, Liker, PutDecisionInput, UserLookup};
use super::repository::{DecisionReader, DecisionWriter};
use crate::errors::ServiceError;
use crate::pagination::PageCursor;

/// Request handlers for the "who liked me" feature.
///
/// Stateless: every call goes to the injected store, so one instance is shared
/// by all requests.
pub struct DecisionService {
    reader: Arc<dyn DecisionReader>,
    writer: Arc<dyn DecisionWriter>,
}

impl DecisionService {
    pub fn new(reader: Arc<dyn DecisionReader>, writer: Arc<dyn DecisionWriter>) -> Self {
        Self { reader, writer }
    }

    /// Build from a single store implementing both sides.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: DecisionReader + DecisionWriter + 'static,
    {
        Self { reader: store.clone(), writer: store }
    }

    /// One page of everyone who liked `recipient_id`.
    ///
    /// Rows on the page are marked viewed before the page is returned; if that
    /// fails the whole call fails.
    ///
    /// # Examples
    /// ```
    /// use service::decisions::{DecisionService, RequestContext};
    /// use service::decisions::repository::{DecisionWriter, mock::InMemoryDecisionStore};
    /// use std::sync::Arc;
    /// let store = Arc::new(InMemoryDecisionStore::new());
    /// tokio_test::block_on(store.upsert_decision("2", "1", true)).unwrap();
    /// let svc = DecisionService::from_store(store);
    /// let page = tokio_test::block_on(svc.list_liked_you(&RequestContext::background(), "1", None)).unwrap();
    /// assert_eq!(page.likers[0].actor_id, "2");
    /// assert!(page.next_pagination_token.is_none());
    /// ```
    #[instrument(skip(self, ctx), fields(recipient_id = %recipient_id))]
    pub async fn list_liked_you(
        &self,
        ctx: &RequestContext,
        recipient_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<LikedYouPage, ServiceError> {
        self.list_page(ctx, recipient_id, pagination_token, LikeFilter::All).await
    }

    /// Like [`Self::list_liked_you`], limited to likes the recipient has not seen.
    #[instrument(skip(self, ctx), fields(recipient_id = %recipient_id))]
    pub async fn list_new_liked_you(
        &self,
        ctx: &RequestContext,
        recipient_id: &str,
        pagination_token: Option<&str>,
    ) -> Result<LikedYouPage, ServiceError> {
        self.list_page(ctx, recipient_id, pagination_token, LikeFilter::NewOnly).await
    }

    async fn list_page(
        &self,
        ctx: &RequestContext,
        recipient_id: &str,
        pagination_token: Option<&str>,
        filter: LikeFilter,
    ) -> Result<LikedYouPage, ServiceError> {
        let cursor = PageCursor::parse(pagination_token);

        let fetch = async {
            match filter {
                LikeFilter::All => self.reader.find_likes_by_recipient_paginated(recipient_id, cursor.page).await,
                LikeFilter::NewOnly => self.reader.find_new_likes_by_recipient_paginated(recipient_id, cursor.page).await,
            }
        };
        let likes = ctx.bound(fetch).await.map_err(|e| {
            error!(error = %e, page = cursor.page, ?filter, "failed to fetch likes");
            let message = match filter {
                LikeFilter::All => "unable to find likes for ListLikedYou",
                LikeFilter::NewOnly => "unable to find likes for ListNewLikedYou",
            };
            ServiceError::from_store(&e, message)
        })?;

        if !likes.is_empty() {
            ctx.bound(self.writer.mark_likes_viewed(recipient_id, &likes)).await.map_err(|e| {
                error!(error = %e, count = likes.len(), "failed to mark likes as viewed");
                ServiceError::from_store(&e, "unable to update likes")
            })?;
        }

        let next_pagination_token = cursor.next_token(likes.len(), self.reader.page_size());
        debug!(page = cursor.page, returned = likes.len(), has_next = next_pagination_token.is_some(), "likes page served");
        Ok(LikedYouPage {
            likers: likes.iter().map(Liker::from).collect(),
            next_pagination_token,
        })
    }

    /// Cached like counter of `recipient_id`. Unknown or inactive users count 0.
    #[instrument(skip(self, ctx), fields(recipient_id = %recipient_id))]
    pub async fn count_liked_you(&self, ctx: &RequestContext, recipient_id: &str) -> Result<u64, ServiceError> {
        let lookup = ctx.bound(self.reader.get_user_by_id(recipient_id)).await.map_err(|e| {
            error!(error = %e, "failed to load user");
            ServiceError::from_store(&e, "unable to count likes")
        })?;
        match lookup {
            UserLookup::Found(user) => Ok(user.likes),
            UserLookup::NotFound => {
                debug!("no active user, reporting zero likes");
                Ok(0)
            }
        }
    }

    /// Record a like/pass and report whether the pair now likes each other.
    ///
    /// Steps run in order and stop at the first failure; an earlier step's
    /// write is not undone, so an error means "unknown outcome, safe to retry".
    ///
    /// # Examples
    /// ```
    /// use service::decisions::{DecisionService, RequestContext};
    /// use service::decisions::domain::PutDecisionInput;
    /// use service::decisions::repository::mock::InMemoryDecisionStore;
    /// use std::sync::Arc;
    /// let svc = DecisionService::from_store(Arc::new(InMemoryDecisionStore::new()));
    /// let ctx = RequestContext::background();
    /// let first = PutDecisionInput { actor_id: "2".into(), recipient_id: "1".into(), liked: true };
    /// let second = PutDecisionInput { actor_id: "1".into(), recipient_id: "2".into(), liked: true };
    /// assert!(!tokio_test::block_on(svc.put_decision(&ctx, &first)).unwrap());
    /// assert!(tokio_test::block_on(svc.put_decision(&ctx, &second)).unwrap());
    /// ```
    #[instrument(skip(self, ctx, input), fields(actor_id = %input.actor_id, recipient_id = %input.recipient_id, liked = input.liked))]
    pub async fn put_decision(&self, ctx: &RequestContext, input: &PutDecisionInput) -> Result<bool, ServiceError> {
        let actor_id = input.actor_id.as_str();
        let recipient_id = input.recipient_id.as_str();

        ctx.bound(self.writer.upsert_decision(actor_id, recipient_id, input.liked)).await.map_err(|e| {
            error!(error = %e, "failed to upsert decision");
            ServiceError::from_store(&e, "unable to create or update decision")
        })?;

        ctx.bound(self.writer.refresh_user_like_count(recipient_id)).await.map_err(|e| {
            error!(error = %e, "failed to refresh like counter");
            ServiceError::from_store(&e, "unable to update user total likes")
        })?;

        let mutual_likes = ctx.bound(self.reader.is_match(actor_id, recipient_id)).await.map_err(|e| {
            error!(error = %e, "failed to check for mutual likes");
            ServiceError::from_store(&e, "unable to check mutual likes")
        })?;

        info!(mutual_likes, "decision_recorded");
        Ok(mutual_likes)
    }
}
