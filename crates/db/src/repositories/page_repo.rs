//! Repository for the `pages` table.

use sqlx::PgPool;

use pulsefit_core::page::PageStatus;
use pulsefit_core::types::DbId;

use crate::models::page::{CreatePage, Page, PageFilter, UpdatePage};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, title, description, meta_title, meta_description, \
    meta_keywords, status, template, version_number, created_by, updated_by, \
    created_at, updated_at";

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page, returning the created row.
    ///
    /// Slug uniqueness among non-archived pages is enforced by the
    /// `uq_pages_slug_active` partial index; a duplicate surfaces as a
    /// unique-violation database error.
    pub async fn create(pool: &PgPool, input: &CreatePage) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages
                (slug, title, description, meta_title, meta_description,
                 meta_keywords, status, template, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'draft'),
                     COALESCE($8, 'default'), $9, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.meta_keywords)
            .bind(&input.status)
            .bind(&input.template)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a page by its internal ID, regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-archived page by slug.
    ///
    /// Archived pages are excluded: their slug may have been reassigned.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages WHERE slug = $1 AND status != 'archived'"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a page by numeric ID or slug.
    pub async fn resolve(pool: &PgPool, slug_or_id: &str) -> Result<Option<Page>, sqlx::Error> {
        match slug_or_id.parse::<DbId>() {
            Ok(id) => Self::find_by_id(pool, id).await,
            Err(_) => Self::find_by_slug(pool, slug_or_id).await,
        }
    }

    /// List pages matching the filter, newest-updated first, with the total
    /// count of matching rows (ignoring limit/offset).
    pub async fn list(pool: &PgPool, filter: &PageFilter) -> Result<(Vec<Page>, i64), sqlx::Error> {
        let search_pattern = filter.search.as_ref().map(|s| format!("%{s}%"));
        let limit = clamp_limit(filter.limit);
        let offset = clamp_offset(filter.offset);

        let where_clause = "($1::text IS NULL OR status = $1)
             AND ($2::text IS NULL OR title ILIKE $2 OR slug ILIKE $2)";

        let (total,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM pages WHERE {where_clause}"
        ))
        .bind(&filter.status)
        .bind(&search_pattern)
        .fetch_one(pool)
        .await?;

        let rows = sqlx::query_as::<_, Page>(&format!(
            "SELECT {COLUMNS} FROM pages
             WHERE {where_clause}
             ORDER BY updated_at DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(&filter.status)
        .bind(&search_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok((rows, total))
    }

    /// Update a page. Only non-`None` fields in `input` are applied.
    ///
    /// Bumps `version_number` and sets `updated_at`. Concurrency is
    /// last-write-wins: there is no version precondition, so two editors
    /// saving the same page overwrite each other silently.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePage,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                meta_title = COALESCE($5, meta_title),
                meta_description = COALESCE($6, meta_description),
                meta_keywords = COALESCE($7, meta_keywords),
                status = COALESCE($8, status),
                template = COALESCE($9, template),
                updated_by = COALESCE($10, updated_by),
                version_number = version_number + 1,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.meta_keywords)
            .bind(&input.status)
            .bind(&input.template)
            .bind(&input.updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Archive a page (the page-level delete). Returns `true` if a row
    /// transitioned; `false` if it was already archived or does not exist.
    pub async fn archive(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE pages SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status != $2",
        )
        .bind(id)
        .bind(PageStatus::Archived.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
