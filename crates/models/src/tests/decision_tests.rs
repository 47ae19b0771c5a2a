use anyhow::Result;
use sea_orm::{EntityTrait, PaginatorTrait};

use super::{setup_test_db, skip_db_tests};
use crate::decision::{self, LikeFilter};

#[tokio::test]
async fn upsert_same_pair_keeps_single_row() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;

    decision::upsert(&db, "2", "1", true).await?;
    decision::upsert(&db, "2", "1", true).await?;
    decision::upsert(&db, "2", "1", false).await?;

    assert_eq!(decision::Entity::find().count(&db).await?, 1);
    let row = decision::find_by_pair(&db, "2", "1").await?.expect("row exists");
    assert!(!row.liked);
    Ok(())
}

#[tokio::test]
async fn upsert_does_not_reset_viewed_flag() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;

    decision::upsert(&db, "2", "1", true).await?;
    let row = decision::find_by_pair(&db, "2", "1").await?.expect("row exists");
    assert!(row.is_new);
    decision::mark_viewed(&db, "1", &[row.id]).await?;

    decision::upsert(&db, "2", "1", true).await?;
    let again = decision::find_by_pair(&db, "2", "1").await?.expect("row exists");
    assert_eq!(again.id, row.id);
    assert!(!again.is_new);
    assert_eq!(again.created_at, row.created_at);
    Ok(())
}

#[tokio::test]
async fn reverse_direction_is_a_separate_row() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;

    decision::upsert(&db, "1", "2", true).await?;
    decision::upsert(&db, "2", "1", false).await?;
    assert_eq!(decision::Entity::find().count(&db).await?, 2);
    Ok(())
}

#[tokio::test]
async fn listing_pages_only_liked_rows_for_recipient() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;

    for actor in 0..12 {
        decision::upsert(&db, &format!("actor-{actor}"), "r", true).await?;
    }
    decision::upsert(&db, "passer", "r", false).await?;
    decision::upsert(&db, "actor-0", "someone-else", true).await?;

    let first = decision::find_liked_by_recipient(&db, "r", LikeFilter::All, 0, 10).await?;
    let second = decision::find_liked_by_recipient(&db, "r", LikeFilter::All, 1, 10).await?;
    let third = decision::find_liked_by_recipient(&db, "r", LikeFilter::All, 2, 10).await?;
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 2);
    assert!(third.is_empty());
    assert!(first.iter().chain(second.iter()).all(|d| d.liked && d.recipient_id == "r"));

    let mut ids: Vec<_> = first.iter().chain(second.iter()).map(|d| d.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 12);
    Ok(())
}

#[tokio::test]
async fn new_only_listing_skips_viewed_rows() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;

    decision::upsert(&db, "a", "r", true).await?;
    decision::upsert(&db, "b", "r", true).await?;
    let seen = decision::find_by_pair(&db, "a", "r").await?.expect("row exists");
    assert_eq!(decision::mark_viewed(&db, "r", &[seen.id]).await?, 1);

    let fresh = decision::find_liked_by_recipient(&db, "r", LikeFilter::NewOnly, 0, 10).await?;
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].actor_id, "b");

    let all = decision::find_liked_by_recipient(&db, "r", LikeFilter::All, 0, 10).await?;
    assert_eq!(all.len(), 2);
    Ok(())
}

#[tokio::test]
async fn mark_viewed_is_scoped_to_recipient_and_new_rows() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;

    decision::upsert(&db, "a", "r", true).await?;
    decision::upsert(&db, "a", "other", true).await?;
    let mine = decision::find_by_pair(&db, "a", "r").await?.expect("row exists");
    let theirs = decision::find_by_pair(&db, "a", "other").await?.expect("row exists");

    // Another recipient's id is ignored
    assert_eq!(decision::mark_viewed(&db, "r", &[mine.id, theirs.id]).await?, 1);
    // Already viewed: nothing left to update
    assert_eq!(decision::mark_viewed(&db, "r", &[mine.id]).await?, 0);
    // Empty input is a no-op
    assert_eq!(decision::mark_viewed(&db, "r", &[]).await?, 0);

    let theirs = decision::find_by_pair(&db, "a", "other").await?.expect("row exists");
    assert!(theirs.is_new);
    Ok(())
}

#[tokio::test]
async fn mutual_like_count_requires_both_directions_liked() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;

    decision::upsert(&db, "a", "b", true).await?;
    assert_eq!(decision::count_mutual_likes(&db, "a", "b").await?, 1);

    decision::upsert(&db, "b", "a", true).await?;
    assert_eq!(decision::count_mutual_likes(&db, "a", "b").await?, 2);
    assert_eq!(decision::count_mutual_likes(&db, "b", "a").await?, 2);

    decision::upsert(&db, "b", "a", false).await?;
    assert_eq!(decision::count_mutual_likes(&db, "a", "b").await?, 1);
    Ok(())
}

#[test]
fn page_offset_rejects_offsets_beyond_sql_range() {
    assert_eq!(decision::page_offset(0, 10), Some(0));
    assert_eq!(decision::page_offset(3, 10), Some(30));
    assert_eq!(decision::page_offset(i64::MAX as u64 / 10, 10), Some(i64::MAX as u64 / 10 * 10));
    assert_eq!(decision::page_offset(i64::MAX as u64 / 10 + 1, 10), None);
    assert_eq!(decision::page_offset(u64::MAX, 10), None);
}

#[tokio::test]
async fn listing_far_past_the_data_is_empty() -> Result<()> {
    if skip_db_tests() { return Ok(()); }
    let db = setup_test_db().await?;
    decision::upsert(&db, "2", "1", true).await?;

    for page_idx in [1_000_000, 999_999_999_999_999_999, u64::MAX - 1] {
        let rows = decision::find_liked_by_recipient(&db, "1", LikeFilter::All, page_idx, 10).await?;
        assert!(rows.is_empty(), "page index {page_idx}");
    }
    Ok(())
}
