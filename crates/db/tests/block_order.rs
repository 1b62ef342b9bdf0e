//! Integration tests for block ordering: append-order assignment, ordered
//! listing with deterministic tie-breaks, and atomic reorder semantics.

use pulsefit_db::models::block::CreateBlock;
use pulsefit_db::models::page::CreatePage;
use pulsefit_db::repositories::{BlockRepo, PageRepo, ReorderError};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_page(pool: &PgPool, slug: &str) -> i64 {
    PageRepo::create(
        pool,
        &CreatePage {
            slug: slug.to_string(),
            title: slug.to_string(),
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
    .unwrap()
    .id
}

fn new_block(kind: &str, sort_order: Option<i32>, data: serde_json::Value) -> CreateBlock {
    CreateBlock {
        kind: kind.to_string(),
        sort_order,
        data,
        styles: None,
    }
}

// ---------------------------------------------------------------------------
// Test: omitted order appends after the current maximum
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_append_order_assignment(pool: PgPool) {
    let page_id = seed_page(&pool, "home").await;

    let first = BlockRepo::create(
        &pool,
        page_id,
        &new_block("hero", None, json!({"title": "Welcome"})),
    )
    .await
    .unwrap();
    assert_eq!(first.sort_order, 0, "first appended block gets order 0");

    let second = BlockRepo::create(
        &pool,
        page_id,
        &new_block("text", None, json!({"text": "About us"})),
    )
    .await
    .unwrap();
    assert_eq!(second.sort_order, 1, "second appended block gets order 1");

    // Explicit order is honored as-is.
    let pinned = BlockRepo::create(
        &pool,
        page_id,
        &new_block("button", Some(10), json!({"label": "Join"})),
    )
    .await
    .unwrap();
    assert_eq!(pinned.sort_order, 10);

    // Appending after an explicit high order continues from the max.
    let fourth = BlockRepo::create(&pool, page_id, &new_block("text", None, json!({})))
        .await
        .unwrap();
    assert_eq!(fourth.sort_order, 11);
}

// ---------------------------------------------------------------------------
// Test: inactive blocks are excluded from append-order computation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_blocks_do_not_affect_append_order(pool: PgPool) {
    let page_id = seed_page(&pool, "home").await;

    let a = BlockRepo::create(&pool, page_id, &new_block("hero", None, json!({})))
        .await
        .unwrap();
    let b = BlockRepo::create(&pool, page_id, &new_block("text", None, json!({})))
        .await
        .unwrap();
    assert_eq!((a.sort_order, b.sort_order), (0, 1));

    BlockRepo::soft_delete(&pool, b.id).await.unwrap();

    let c = BlockRepo::create(&pool, page_id, &new_block("text", None, json!({})))
        .await
        .unwrap();
    assert_eq!(
        c.sort_order, 1,
        "inactive block's order must not count toward the max"
    );
}

// ---------------------------------------------------------------------------
// Test: listing orders by sort_order with id tie-break
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_orders_with_id_tiebreak(pool: PgPool) {
    let page_id = seed_page(&pool, "home").await;

    let x = BlockRepo::create(&pool, page_id, &new_block("text", Some(5), json!({})))
        .await
        .unwrap();
    let y = BlockRepo::create(&pool, page_id, &new_block("text", Some(5), json!({})))
        .await
        .unwrap();
    let z = BlockRepo::create(&pool, page_id, &new_block("text", Some(1), json!({})))
        .await
        .unwrap();

    let listed = BlockRepo::list_for_page(&pool, page_id, false).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|b| b.id).collect();
    // Equal orders fall back to insertion sequence.
    assert_eq!(ids, vec![z.id, x.id, y.id]);
}

// ---------------------------------------------------------------------------
// Test: reorder assigns order = index (spec scenario)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_assigns_index_order(pool: PgPool) {
    let page_id = seed_page(&pool, "home").await;

    let b1 = BlockRepo::create(&pool, page_id, &new_block("hero", None, json!({})))
        .await
        .unwrap();
    let b2 = BlockRepo::create(&pool, page_id, &new_block("text", None, json!({})))
        .await
        .unwrap();
    let b3 = BlockRepo::create(&pool, page_id, &new_block("button", None, json!({})))
        .await
        .unwrap();

    let reordered = BlockRepo::reorder(&pool, page_id, &[b3.id, b1.id, b2.id])
        .await
        .unwrap();

    let ids: Vec<i64> = reordered.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![b3.id, b1.id, b2.id]);
    let orders: Vec<i32> = reordered.iter().map(|b| b.sort_order).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    // Re-fetching yields exactly the same sequence.
    let fetched = BlockRepo::list_for_page(&pool, page_id, false).await.unwrap();
    let fetched_ids: Vec<i64> = fetched.iter().map(|b| b.id).collect();
    assert_eq!(fetched_ids, vec![b3.id, b1.id, b2.id]);
}

// ---------------------------------------------------------------------------
// Test: reorder with a wrong id set changes nothing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_mismatch_rolls_back(pool: PgPool) {
    let page_id = seed_page(&pool, "home").await;

    let b1 = BlockRepo::create(&pool, page_id, &new_block("hero", None, json!({})))
        .await
        .unwrap();
    let b2 = BlockRepo::create(&pool, page_id, &new_block("text", None, json!({})))
        .await
        .unwrap();

    // Missing b2 from the sequence.
    let err = BlockRepo::reorder(&pool, page_id, &[b1.id])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReorderError::IdSetMismatch {
            expected: 2,
            got: 1
        }
    ));

    // Naming a foreign block id is also a mismatch.
    let err = BlockRepo::reorder(&pool, page_id, &[b1.id, 999_999])
        .await
        .unwrap_err();
    assert!(matches!(err, ReorderError::IdSetMismatch { .. }));

    // Orders are exactly as they were before the failed attempts.
    let listed = BlockRepo::list_for_page(&pool, page_id, false).await.unwrap();
    let pairs: Vec<(i64, i32)> = listed.iter().map(|b| (b.id, b.sort_order)).collect();
    assert_eq!(pairs, vec![(b1.id, 0), (b2.id, 1)]);
}

// ---------------------------------------------------------------------------
// Test: full spec scenario (create page, append two blocks, swap)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scenario_append_then_swap(pool: PgPool) {
    let page_id = seed_page(&pool, "home").await;

    let block1 = BlockRepo::create(
        &pool,
        page_id,
        &new_block("hero", None, json!({"title": "Welcome"})),
    )
    .await
    .unwrap();
    assert_eq!(block1.sort_order, 0);

    let block2 = BlockRepo::create(&pool, page_id, &new_block("text", None, json!({})))
        .await
        .unwrap();
    assert_eq!(block2.sort_order, 1);

    BlockRepo::reorder(&pool, page_id, &[block2.id, block1.id])
        .await
        .unwrap();

    let listed = BlockRepo::list_for_page(&pool, page_id, false).await.unwrap();
    assert_eq!(listed[0].id, block2.id);
    assert_eq!(listed[0].sort_order, 0);
    assert_eq!(listed[1].id, block1.id);
    assert_eq!(listed[1].sort_order, 1);
}
