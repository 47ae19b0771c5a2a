use sea_orm::{prelude::DateTimeWithTimeZone, DatabaseConnection};
use tracing::debug;

use models::decision::{self, LikeFilter};
use models::user;

use crate::decisions::domain::{Decision, User, UserLookup};
use crate::decisions::repository::{DecisionReader, DecisionWriter, PAGE_SIZE};
use crate::errors::StoreError;

/// SeaORM-backed decision store; reader and writer share one connection pool.
#[derive(Clone)]
pub struct SeaOrmDecisionStore {
    pub db: DatabaseConnection,
}

impl SeaOrmDecisionStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn page(&self, recipient_id: &str, page: u64, filter: LikeFilter) -> Result<Vec<Decision>, StoreError> {
        let rows = decision::find_liked_by_recipient(&self.db, recipient_id, filter, page.saturating_sub(1), PAGE_SIZE).await?;
        Ok(rows.into_iter().map(decision_from_row).collect())
    }
}

fn unix(ts: DateTimeWithTimeZone) -> u64 {
    u64::try_from(ts.timestamp()).unwrap_or_default()
}

fn decision_from_row(m: decision::Model) -> Decision {
    Decision {
        id: m.id,
        actor_id: m.actor_id,
        recipient_id: m.recipient_id,
        liked: m.liked,
        is_new: m.is_new,
        created_at: unix(m.created_at),
        updated_at: unix(m.updated_at),
    }
}

fn user_from_row(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        likes: u64::try_from(m.likes).unwrap_or_default(),
        gender: m.gender,
        created_at: unix(m.created_at),
        updated_at: unix(m.updated_at),
        is_active: m.is_active,
    }
}

#[async_trait::async_trait]
impl DecisionReader for SeaOrmDecisionStore {
    async fn find_likes_by_recipient_paginated(&self, recipient_id: &str, page: u64) -> Result<Vec<Decision>, StoreError> {
        self.page(recipient_id, page, LikeFilter::All).await
    }

    async fn find_new_likes_by_recipient_paginated(&self, recipient_id: &str, page: u64) -> Result<Vec<Decision>, StoreError> {
        self.page(recipient_id, page, LikeFilter::NewOnly).await
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<UserLookup, StoreError> {
        let found = user::find_active(&self.db, user_id).await?;
        Ok(match found {
            Some(m) => UserLookup::Found(user_from_row(m)),
            None => UserLookup::NotFound,
        })
    }

    async fn is_match(&self, actor_id: &str, recipient_id: &str) -> Result<bool, StoreError> {
        // Exactly two: one liked row per direction. More would be a broken unique index.
        let rows = decision::count_mutual_likes(&self.db, actor_id, recipient_id).await?;
        Ok(rows == 2)
    }
}

#[async_trait::async_trait]
impl DecisionWriter for SeaOrmDecisionStore {
    async fn upsert_decision(&self, actor_id: &str, recipient_id: &str, liked: bool) -> Result<(), StoreError> {
        decision::upsert(&self.db, actor_id, recipient_id, liked).await?;
        Ok(())
    }

    async fn refresh_user_like_count(&self, recipient_id: &str) -> Result<(), StoreError> {
        let likes = user::refresh_like_count(&self.db, recipient_id).await?;
        debug!(recipient_id, likes, "like counter refreshed");
        Ok(())
    }

    async fn mark_likes_viewed(&self, recipient_id: &str, decisions: &[Decision]) -> Result<(), StoreError> {
        let ids: Vec<_> = decisions.iter().map(|d| d.id).collect();
        let updated = decision::mark_viewed(&self.db, recipient_id, &ids).await?;
        debug!(recipient_id, requested = ids.len(), updated, "likes marked as viewed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn skip() -> bool { std::env::var("SKIP_DB_TESTS").is_ok() }

    #[tokio::test]
    async fn upsert_is_idempotent_per_ordered_pair() -> Result<(), anyhow::Error> {
        if skip() { return Ok(()); }
        let store = SeaOrmDecisionStore::new(get_db().await?);

        store.upsert_decision("2", "1", true).await?;
        store.upsert_decision("2", "1", true).await?;
        let page = store.find_likes_by_recipient_paginated("1", 1).await?;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].actor_id, "2");
        assert!(page[0].is_new);
        Ok(())
    }

    #[tokio::test]
    async fn is_match_is_symmetric_and_tracks_flips() -> Result<(), anyhow::Error> {
        if skip() { return Ok(()); }
        let store = SeaOrmDecisionStore::new(get_db().await?);

        store.upsert_decision("a", "b", true).await?;
        assert!(!store.is_match("a", "b").await?);
        store.upsert_decision("b", "a", true).await?;
        assert!(store.is_match("a", "b").await?);
        assert!(store.is_match("b", "a").await?);
        store.upsert_decision("a", "b", false).await?;
        assert!(!store.is_match("a", "b").await?);
        assert!(!store.is_match("b", "a").await?);
        Ok(())
    }

    #[tokio::test]
    async fn self_like_is_never_a_match() -> Result<(), anyhow::Error> {
        if skip() { return Ok(()); }
        let store = SeaOrmDecisionStore::new(get_db().await?);
        store.upsert_decision("a", "a", true).await?;
        assert!(!store.is_match("a", "a").await?);
        Ok(())
    }

    #[tokio::test]
    async fn pages_hold_at_most_page_size_rows() -> Result<(), anyhow::Error> {
        if skip() { return Ok(()); }
        let store = SeaOrmDecisionStore::new(get_db().await?);
        for i in 0..(PAGE_SIZE + 3) {
            store.upsert_decision(&format!("actor-{i}"), "r", true).await?;
        }
        assert_eq!(store.find_likes_by_recipient_paginated("r", 1).await?.len() as u64, PAGE_SIZE);
        assert_eq!(store.find_likes_by_recipient_paginated("r", 2).await?.len(), 3);
        assert!(store.find_likes_by_recipient_paginated("r", 3).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn far_and_out_of_range_pages_are_empty() -> Result<(), anyhow::Error> {
        if skip() { return Ok(()); }
        let store = SeaOrmDecisionStore::new(get_db().await?);
        store.upsert_decision("2", "1", true).await?;

        assert!(store.find_likes_by_recipient_paginated("1", 1_000_000).await?.is_empty());
        assert!(store.find_new_likes_by_recipient_paginated("1", 1_000_000_000_000_000_000).await?.is_empty());
        assert!(store.find_likes_by_recipient_paginated("1", i64::MAX as u64).await?.is_empty());
        assert!(store.find_likes_by_recipient_paginated("1", u64::MAX).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn huge_pagination_token_lists_nothing_on_sqlite() -> Result<(), anyhow::Error> {
        use crate::decisions::{DecisionService, RequestContext};
        use std::sync::Arc;

        if skip() { return Ok(()); }
        let store = Arc::new(SeaOrmDecisionStore::new(get_db().await?));
        store.upsert_decision("2", "1", true).await?;
        let svc = DecisionService::from_store(store);
        let ctx = RequestContext::background();

        for token in ["1000000000000000000", "9223372036854775807"] {
            let page = svc.list_liked_you(&ctx, "1", Some(token)).await?;
            assert!(page.likers.is_empty(), "token {token}");
            assert!(page.next_pagination_token.is_none());
        }
        let far = svc.list_new_liked_you(&ctx, "1", Some("1000000")).await?;
        assert!(far.likers.is_empty());
        assert!(far.next_pagination_token.is_none());
        // a token beyond i64 is malformed and reads as page 1
        let first = svc.list_liked_you(&ctx, "1", Some("99999999999999999999")).await?;
        assert_eq!(first.likers.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn mark_viewed_removes_rows_from_new_listing() -> Result<(), anyhow::Error> {
        if skip() { return Ok(()); }
        let store = SeaOrmDecisionStore::new(get_db().await?);
        store.upsert_decision("a", "r", true).await?;
        store.upsert_decision("b", "r", true).await?;

        let fresh = store.find_new_likes_by_recipient_paginated("r", 1).await?;
        assert_eq!(fresh.len(), 2);
        store.mark_likes_viewed("r", &fresh[..1]).await?;

        let remaining = store.find_new_likes_by_recipient_paginated("r", 1).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, fresh[1].id);
        // Viewed likes are still part of the full listing
        assert_eq!(store.find_likes_by_recipient_paginated("r", 1).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn user_lookup_and_counter_refresh() -> Result<(), anyhow::Error> {
        if skip() { return Ok(()); }
        let db = get_db().await?;
        models::user::create(&db, "1", "Alice", "female").await?;
        let store = SeaOrmDecisionStore::new(db);

        assert_eq!(store.get_user_by_id("missing").await?, UserLookup::NotFound);

        store.upsert_decision("2", "1", true).await?;
        store.upsert_decision("3", "1", true).await?;
        store.refresh_user_like_count("1").await?;
        let user = store.get_user_by_id("1").await?.into_option().expect("active user");
        assert_eq!(user.likes, 2);
        assert!(user.is_active);
        Ok(())
    }
}
