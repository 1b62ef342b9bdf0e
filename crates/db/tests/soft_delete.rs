//! Integration tests for block soft-delete and restore behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted blocks disappear from active listings but remain in
//!   unfiltered listings with `is_active = false`
//! - Soft delete is idempotent (second call returns `false`)
//! - Restore brings a block back into the active listing
//! - Soft-deleted blocks are excluded from reorder id sets

use pulsefit_db::models::block::CreateBlock;
use pulsefit_db::models::page::CreatePage;
use pulsefit_db::repositories::{BlockRepo, PageRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_page_with_blocks(pool: &PgPool, n: usize) -> (i64, Vec<i64>) {
    let page = PageRepo::create(
        pool,
        &CreatePage {
            slug: "home".to_string(),
            title: "Home".to_string(),
            description: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            status: None,
            template: None,
            created_by: None,
        },
    )
    .await
    .unwrap();

    let mut ids = Vec::new();
    for i in 0..n {
        let block = BlockRepo::create(
            pool,
            page.id,
            &CreateBlock {
                kind: "text".to_string(),
                sort_order: None,
                data: json!({"text": format!("block {i}")}),
                styles: None,
            },
        )
        .await
        .unwrap();
        ids.push(block.id);
    }
    (page.id, ids)
}

// ---------------------------------------------------------------------------
// Test: soft delete hides from active listing, keeps the row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_excluded_from_active_listing(pool: PgPool) {
    let (page_id, ids) = seed_page_with_blocks(&pool, 3).await;

    let deleted = BlockRepo::soft_delete(&pool, ids[1]).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    let active = BlockRepo::list_for_page(&pool, page_id, false).await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(
        !active.iter().any(|b| b.id == ids[1]),
        "soft-deleted block must be absent from the active listing"
    );

    let all = BlockRepo::list_for_page(&pool, page_id, true).await.unwrap();
    assert_eq!(all.len(), 3);
    let row = all.iter().find(|b| b.id == ids[1]).unwrap();
    assert!(!row.is_active, "row must be retained with is_active = false");
}

// ---------------------------------------------------------------------------
// Test: soft delete is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_idempotent(pool: PgPool) {
    let (_, ids) = seed_page_with_blocks(&pool, 1).await;

    assert!(BlockRepo::soft_delete(&pool, ids[0]).await.unwrap());
    assert!(
        !BlockRepo::soft_delete(&pool, ids[0]).await.unwrap(),
        "second soft_delete should return false (already inactive)"
    );
}

// ---------------------------------------------------------------------------
// Test: restore makes a block active again
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_reactivates(pool: PgPool) {
    let (page_id, ids) = seed_page_with_blocks(&pool, 2).await;

    BlockRepo::soft_delete(&pool, ids[0]).await.unwrap();
    assert!(BlockRepo::restore(&pool, ids[0]).await.unwrap());

    let active = BlockRepo::list_for_page(&pool, page_id, false).await.unwrap();
    assert_eq!(active.len(), 2);
    assert!(active.iter().any(|b| b.id == ids[0]));

    // Restoring an already-active block reports no transition.
    assert!(!BlockRepo::restore(&pool, ids[0]).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: reorder operates on active blocks only
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_ignores_inactive_blocks(pool: PgPool) {
    let (page_id, ids) = seed_page_with_blocks(&pool, 3).await;

    BlockRepo::soft_delete(&pool, ids[2]).await.unwrap();

    // The inactive block is not part of the reorder id set.
    let reordered = BlockRepo::reorder(&pool, page_id, &[ids[1], ids[0]])
        .await
        .unwrap();
    let pairs: Vec<(i64, i32)> = reordered.iter().map(|b| (b.id, b.sort_order)).collect();
    assert_eq!(pairs, vec![(ids[1], 0), (ids[0], 1)]);

    // Including the inactive id must fail.
    assert!(BlockRepo::reorder(&pool, page_id, &[ids[0], ids[1], ids[2]])
        .await
        .is_err());
}
