use async_trait::async_trait;

use super::domain::{Decision, UserLookup};
use crate::errors::StoreError;

/// Fixed page size of the "liked you" listings.
pub const PAGE_SIZE: u64 = 10;

/// Read side of the decision store.
#[async_trait]
pub trait DecisionReader: Send + Sync {
    /// Liked decisions targeting `recipient_id`, page `page` (1-based; `page >= 1`
    /// is a caller precondition).
    async fn find_likes_by_recipient_paginated(&self, recipient_id: &str, page: u64) -> Result<Vec<Decision>, StoreError>;
    /// As above, restricted to decisions the recipient has not seen yet.
    async fn find_new_likes_by_recipient_paginated(&self, recipient_id: &str, page: u64) -> Result<Vec<Decision>, StoreError>;
    async fn get_user_by_id(&self, user_id: &str) -> Result<UserLookup, StoreError>;
    /// True iff both directions between the two users are stored as liked.
    async fn is_match(&self, actor_id: &str, recipient_id: &str) -> Result<bool, StoreError>;

    fn page_size(&self) -> u64 { PAGE_SIZE }
}

/// Write side of the decision store.
#[async_trait]
pub trait DecisionWriter: Send + Sync {
    /// Insert, or overwrite `liked` on the existing row of the ordered pair.
    async fn upsert_decision(&self, actor_id: &str, recipient_id: &str, liked: bool) -> Result<(), StoreError>;
    /// Recompute the recipient's cached like counter from stored decisions.
    async fn refresh_user_like_count(&self, recipient_id: &str) -> Result<(), StoreError>;
    /// Clear the new flag on exactly these rows of `recipient_id`.
    async fn mark_likes_viewed(&self, recipient_id: &str, decisions: &[Decision]) -> Result<(), StoreError>;
}

/// Simple in-memory store for tests and local runs without a database
pub mod mock {
    use super::*;
    use crate::decisions::domain::User;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    /// Store operation, for failure injection
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum StoreOp {
        FindLikes,
        FindNewLikes,
        GetUser,
        IsMatch,
        Upsert,
        RefreshLikeCount,
        MarkViewed,
    }

    #[derive(Default)]
    pub struct InMemoryDecisionStore {
        users: Mutex<HashMap<String, User>>,
        decisions: Mutex<Vec<Decision>>, // insertion order is storage order
        failing: Mutex<HashSet<StoreOp>>,
        mark_viewed_calls: Mutex<Vec<Vec<Uuid>>>,
    }

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
    }

    impl InMemoryDecisionStore {
        pub fn new() -> Self { Self::default() }

        pub fn insert_user(&self, user: User) {
            lock(&self.users).insert(user.id.clone(), user);
        }

        /// Seed a decision as-is (bypasses the upsert path).
        pub fn insert_decision(&self, decision: Decision) {
            lock(&self.decisions).push(decision);
        }

        /// Make every later call of `op` fail with a database error.
        pub fn fail_on(&self, op: StoreOp) {
            lock(&self.failing).insert(op);
        }

        pub fn decisions(&self) -> Vec<Decision> {
            lock(&self.decisions).clone()
        }

        pub fn user(&self, id: &str) -> Option<User> {
            lock(&self.users).get(id).cloned()
        }

        /// Ids passed to each `mark_likes_viewed` call, in call order.
        pub fn mark_viewed_calls(&self) -> Vec<Vec<Uuid>> {
            lock(&self.mark_viewed_calls).clone()
        }

        fn check(&self, op: StoreOp) -> Result<(), StoreError> {
            if lock(&self.failing).contains(&op) {
                return Err(StoreError::Db(format!("injected failure in {op:?}")));
            }
            Ok(())
        }

        fn page_of(&self, recipient_id: &str, page: u64, new_only: bool) -> Vec<Decision> {
            let offset = page.saturating_sub(1).saturating_mul(PAGE_SIZE) as usize;
            lock(&self.decisions)
                .iter()
                .filter(|d| d.recipient_id == recipient_id && d.liked && (!new_only || d.is_new))
                .skip(offset)
                .take(PAGE_SIZE as usize)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl DecisionReader for InMemoryDecisionStore {
        async fn find_likes_by_recipient_paginated(&self, recipient_id: &str, page: u64) -> Result<Vec<Decision>, StoreError> {
            self.check(StoreOp::FindLikes)?;
            Ok(self.page_of(recipient_id, page, false))
        }

        async fn find_new_likes_by_recipient_paginated(&self, recipient_id: &str, page: u64) -> Result<Vec<Decision>, StoreError> {
            self.check(StoreOp::FindNewLikes)?;
            Ok(self.page_of(recipient_id, page, true))
        }

        async fn get_user_by_id(&self, user_id: &str) -> Result<UserLookup, StoreError> {
            self.check(StoreOp::GetUser)?;
            Ok(match lock(&self.users).get(user_id) {
                Some(user) if user.is_active => UserLookup::Found(user.clone()),
                _ => UserLookup::NotFound,
            })
        }

        async fn is_match(&self, actor_id: &str, recipient_id: &str) -> Result<bool, StoreError> {
            self.check(StoreOp::IsMatch)?;
            let rows = lock(&self.decisions)
                .iter()
                .filter(|d| {
                    d.liked
                        && ((d.actor_id == actor_id && d.recipient_id == recipient_id)
                            || (d.actor_id == recipient_id && d.recipient_id == actor_id))
                })
                .count();
            Ok(rows == 2)
        }
    }

    #[async_trait]
    impl DecisionWriter for InMemoryDecisionStore {
        async fn upsert_decision(&self, actor_id: &str, recipient_id: &str, liked: bool) -> Result<(), StoreError> {
            self.check(StoreOp::Upsert)?;
            let ts = now();
            let mut decisions = lock(&self.decisions);
            match decisions.iter_mut().find(|d| d.actor_id == actor_id && d.recipient_id == recipient_id) {
                Some(existing) => {
                    existing.liked = liked;
                    existing.updated_at = ts;
                }
                None => decisions.push(Decision {
                    id: Uuid::new_v4(),
                    actor_id: actor_id.to_string(),
                    recipient_id: recipient_id.to_string(),
                    liked,
                    is_new: true,
                    created_at: ts,
                    updated_at: ts,
                }),
            }
            Ok(())
        }

        async fn refresh_user_like_count(&self, recipient_id: &str) -> Result<(), StoreError> {
            self.check(StoreOp::RefreshLikeCount)?;
            let likes = lock(&self.decisions)
                .iter()
                .filter(|d| d.recipient_id == recipient_id && d.liked)
                .count() as u64;
            if let Some(user) = lock(&self.users).get_mut(recipient_id) {
                user.likes = likes;
            }
            Ok(())
        }

        async fn mark_likes_viewed(&self, recipient_id: &str, decisions: &[Decision]) -> Result<(), StoreError> {
            self.check(StoreOp::MarkViewed)?;
            let ids: Vec<Uuid> = decisions.iter().map(|d| d.id).collect();
            lock(&self.mark_viewed_calls).push(ids.clone());
            for d in lock(&self.decisions).iter_mut() {
                if d.recipient_id == recipient_id && d.is_new && ids.contains(&d.id) {
                    d.is_new = false;
                }
            }
            Ok(())
        }
    }
}
