//! Directed like/pass decisions between two users.
//!
//! Exactly one row exists per ordered `(actor_id, recipient_id)` pair, enforced by
//! `uniq_decision_actor_recipient`.
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, OnConflict},
    Condition, DatabaseConnection, PaginatorTrait, QueryOrder, Set,
};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "decisions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub actor_id: String,
    pub recipient_id: String,
    pub liked: bool,
    /// Cleared once the recipient has been shown this like.
    pub is_new: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Which liked decisions a recipient listing should include.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeFilter {
    All,
    NewOnly,
}

/// Insert the decision, or overwrite `liked`/`updated_at` if the pair already exists.
///
/// A single `INSERT .. ON CONFLICT DO UPDATE`, so concurrent writers on the same
/// pair never produce a second row. `is_new` and `created_at` keep their original
/// values on conflict.
pub async fn upsert(db: &DatabaseConnection, actor_id: &str, recipient_id: &str, liked: bool) -> Result<(), errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        actor_id: Set(actor_id.to_string()),
        recipient_id: Set(recipient_id.to_string()),
        liked: Set(liked),
        is_new: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Entity::insert(am)
        .on_conflict(
            OnConflict::columns([Column::ActorId, Column::RecipientId])
                .update_columns([Column::Liked, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(())
}

/// The decision stored for an ordered pair, if any.
pub async fn find_by_pair(db: &DatabaseConnection, actor_id: &str, recipient_id: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::ActorId.eq(actor_id))
        .filter(Column::RecipientId.eq(recipient_id))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// One page of liked decisions targeting `recipient_id`.
///
/// `page_idx` is 0-based (SeaORM `fetch_page`); rows come back oldest first.
/// A page whose row offset does not fit a signed 64-bit bind value is past any
/// stored data and comes back empty without a query.
pub async fn find_liked_by_recipient(
    db: &DatabaseConnection,
    recipient_id: &str,
    filter: LikeFilter,
    page_idx: u64,
    per_page: u64,
) -> Result<Vec<Model>, errors::ModelError> {
    if page_offset(page_idx, per_page).is_none() {
        return Ok(Vec::new());
    }
    let mut query = Entity::find()
        .filter(Column::RecipientId.eq(recipient_id))
        .filter(Column::Liked.eq(true));
    if filter == LikeFilter::NewOnly {
        query = query.filter(Column::IsNew.eq(true));
    }
    query
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Row offset of `page_idx`, if it is representable as an SQL integer.
pub fn page_offset(page_idx: u64, per_page: u64) -> Option<u64> {
    page_idx
        .checked_mul(per_page)
        .filter(|offset| i64::try_from(*offset).is_ok())
}

pub async fn count_likes_received(db: &DatabaseConnection, recipient_id: &str) -> Result<u64, errors::ModelError> {
    Entity::find()
        .filter(Column::RecipientId.eq(recipient_id))
        .filter(Column::Liked.eq(true))
        .count(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Number of liked rows in either direction between `a` and `b` (0, 1 or 2).
pub async fn count_mutual_likes(db: &DatabaseConnection, a: &str, b: &str) -> Result<u64, errors::ModelError> {
    let forward = Condition::all()
        .add(Column::ActorId.eq(a))
        .add(Column::RecipientId.eq(b))
        .add(Column::Liked.eq(true));
    let backward = Condition::all()
        .add(Column::ActorId.eq(b))
        .add(Column::RecipientId.eq(a))
        .add(Column::Liked.eq(true));
    Entity::find()
        .filter(Condition::any().add(forward).add(backward))
        .count(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Clear `is_new` on the given rows of `recipient_id`. Empty `ids` issues no query.
pub async fn mark_viewed(db: &DatabaseConnection, recipient_id: &str, ids: &[Uuid]) -> Result<u64, errors::ModelError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let res = Entity::update_many()
        .col_expr(Column::IsNew, Expr::value(false))
        .filter(Column::RecipientId.eq(recipient_id))
        .filter(Column::Id.is_in(ids.iter().copied()))
        .filter(Column::IsNew.eq(true))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
