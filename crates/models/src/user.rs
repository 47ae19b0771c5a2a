use sea_orm::{entity::prelude::*, sea_query::Expr, Set, DatabaseConnection};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::decision;
use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    /// Cached count of liked decisions received; see [`refresh_like_count`].
    pub likes: i32,
    pub gender: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_id(id: &str) -> Result<(), errors::ModelError> {
    if id.trim().is_empty() { return Err(errors::ModelError::Validation("user id required".into())); }
    if id.len() > 64 { return Err(errors::ModelError::Validation("user id too long (<=64)".into())); }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    Ok(())
}

/// Insert an active user. Accounts are owned upstream; this exists for seeding.
pub async fn create(db: &DatabaseConnection, id: &str, name: &str, gender: &str) -> Result<Model, errors::ModelError> {
    validate_id(id)?;
    validate_name(name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        likes: Set(0),
        gender: Set(gender.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        is_active: Set(true),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Active user by id; inactive and missing rows are both `None`.
pub async fn find_active(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id.to_string())
        .filter(Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Recompute `likes` from the decisions table and persist it.
///
/// Count and update are two statements, so a concurrent upsert can leave the
/// counter one write behind until the next refresh. Returns the stored count.
pub async fn refresh_like_count(db: &DatabaseConnection, id: &str) -> Result<u64, errors::ModelError> {
    let likes = decision::count_likes_received(db, id).await?;
    Entity::update_many()
        .col_expr(Column::Likes, Expr::value(i32::try_from(likes).unwrap_or(i32::MAX)))
        .filter(Column::Id.eq(id.to_string()))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(likes)
}
