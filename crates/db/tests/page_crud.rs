//! Integration tests for page CRUD: creation defaults, slug lookup,
//! filtered listing, partial update with version bump, and archival.

use pulsefit_db::models::page::{CreatePage, PageFilter, UpdatePage};
use pulsefit_db::repositories::PageRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_page(slug: &str, title: &str) -> CreatePage {
    CreatePage {
        slug: slug.to_string(),
        title: title.to_string(),
        description: None,
        meta_title: None,
        meta_description: None,
        meta_keywords: None,
        status: None,
        template: None,
        created_by: Some("test-user".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Test: create applies defaults
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_page_defaults(pool: PgPool) {
    let page = PageRepo::create(&pool, &new_page("home", "Home"))
        .await
        .unwrap();

    assert_eq!(page.slug, "home");
    assert_eq!(page.title, "Home");
    assert_eq!(page.status, "draft");
    assert_eq!(page.template, "default");
    assert_eq!(page.version_number, 1);
    assert_eq!(page.created_by.as_deref(), Some("test-user"));
}

// ---------------------------------------------------------------------------
// Test: slug lookup and resolve
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_slug_and_resolve(pool: PgPool) {
    let created = PageRepo::create(&pool, &new_page("programs", "Programs"))
        .await
        .unwrap();

    let by_slug = PageRepo::find_by_slug(&pool, "programs").await.unwrap();
    assert_eq!(by_slug.unwrap().id, created.id);

    let by_id_str = PageRepo::resolve(&pool, &created.id.to_string())
        .await
        .unwrap();
    assert_eq!(by_id_str.unwrap().id, created.id);

    let by_slug_str = PageRepo::resolve(&pool, "programs").await.unwrap();
    assert_eq!(by_slug_str.unwrap().id, created.id);

    let missing = PageRepo::find_by_slug(&pool, "nope").await.unwrap();
    assert!(missing.is_none());
}

// ---------------------------------------------------------------------------
// Test: duplicate slug among non-archived pages is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_slug_rejected(pool: PgPool) {
    PageRepo::create(&pool, &new_page("home", "Home"))
        .await
        .unwrap();

    let err = PageRepo::create(&pool, &new_page("home", "Home Again"))
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_pages_slug_active"));
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: archiving a page frees its slug for reuse
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_archived_slug_is_reusable(pool: PgPool) {
    let old = PageRepo::create(&pool, &new_page("home", "Old Home"))
        .await
        .unwrap();
    assert!(PageRepo::archive(&pool, old.id).await.unwrap());

    // Same slug is now available again.
    let replacement = PageRepo::create(&pool, &new_page("home", "New Home"))
        .await
        .unwrap();
    assert_ne!(replacement.id, old.id);

    // Slug lookup finds the replacement, not the archived page.
    let found = PageRepo::find_by_slug(&pool, "home").await.unwrap().unwrap();
    assert_eq!(found.id, replacement.id);

    // Archive is idempotent: second call reports no transition.
    assert!(!PageRepo::archive(&pool, old.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: update applies partial fields and bumps version
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_is_partial_and_bumps_version(pool: PgPool) {
    let page = PageRepo::create(&pool, &new_page("about", "About"))
        .await
        .unwrap();
    assert_eq!(page.version_number, 1);

    let updated = PageRepo::update(
        &pool,
        page.id,
        &UpdatePage {
            title: Some("About Us".to_string()),
            updated_by: Some("editor-2".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "About Us");
    assert_eq!(updated.slug, "about", "untouched fields must survive");
    assert_eq!(updated.version_number, 2);
    assert_eq!(updated.updated_by.as_deref(), Some("editor-2"));
    assert!(updated.updated_at >= page.updated_at);

    // Every successful update increments again.
    let again = PageRepo::update(
        &pool,
        page.id,
        &UpdatePage {
            description: Some("A fitness studio".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(again.version_number, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_page_returns_none(pool: PgPool) {
    let result = PageRepo::update(&pool, 999_999, &UpdatePage::default())
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: list filter, search, and total count
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_counts(pool: PgPool) {
    PageRepo::create(&pool, &new_page("home", "Home"))
        .await
        .unwrap();
    let programs = PageRepo::create(&pool, &new_page("programs", "Training Programs"))
        .await
        .unwrap();
    PageRepo::create(&pool, &new_page("corporate", "Corporate Wellness"))
        .await
        .unwrap();

    // Publish one page so the status filter has something to bite on.
    PageRepo::update(
        &pool,
        programs.id,
        &UpdatePage {
            status: Some("published".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (all, total) = PageRepo::list(&pool, &PageFilter::default()).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(all.len(), 3);
    // Ordered by updated_at descending: the just-updated page comes first.
    assert_eq!(all[0].id, programs.id);

    let (published, published_total) = PageRepo::list(
        &pool,
        &PageFilter {
            status: Some("published".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(published_total, 1);
    assert_eq!(published[0].id, programs.id);

    let (matched, matched_total) = PageRepo::list(
        &pool,
        &PageFilter {
            search: Some("corp".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(matched_total, 1);
    assert_eq!(matched[0].slug, "corporate");

    // Limit applies to rows, not the total.
    let (limited, limited_total) = PageRepo::list(
        &pool,
        &PageFilter {
            limit: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited_total, 3);
}
