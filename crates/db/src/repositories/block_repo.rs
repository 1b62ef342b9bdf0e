//! Repository for the `page_blocks` table.

use sqlx::PgPool;

use pulsefit_core::types::DbId;

use crate::models::block::{Block, CreateBlock, UpdateBlock};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, page_id, kind, sort_order, data, styles, is_active, created_at, updated_at";

/// Error type for the atomic reorder operation.
#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),

    /// The supplied id sequence does not exactly cover the page's active
    /// blocks. Nothing was changed.
    #[error("Reorder id set mismatch: page has {expected} active blocks, request named {got} of them")]
    IdSetMismatch { expected: usize, got: usize },
}

/// Provides CRUD operations for page blocks.
pub struct BlockRepo;

impl BlockRepo {
    /// Insert a new block, returning the created row.
    ///
    /// When `sort_order` is omitted, the block is appended after the page's
    /// current maximum active order (0 for the first block). The max lookup
    /// and insert happen in a single statement so concurrent appends cannot
    /// both read the same max.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        input: &CreateBlock,
    ) -> Result<Block, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_blocks (page_id, kind, sort_order, data, styles)
             VALUES ($1, $2,
                     COALESCE($3, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                                   FROM page_blocks
                                   WHERE page_id = $1 AND is_active)),
                     $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(page_id)
            .bind(&input.kind)
            .bind(input.sort_order)
            .bind(&input.data)
            .bind(&input.styles)
            .fetch_one(pool)
            .await
    }

    /// Find a block by its primary key, active or not.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Block>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_blocks WHERE id = $1");
        sqlx::query_as::<_, Block>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List blocks for a page ordered by `sort_order`, ties broken by
    /// insertion sequence (`id`).
    ///
    /// By default only active blocks are returned; pass
    /// `include_inactive = true` to also get soft-deleted rows.
    pub async fn list_for_page(
        pool: &PgPool,
        page_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Block>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_blocks
             WHERE page_id = $1 AND (is_active OR $2)
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(page_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a block. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlock,
    ) -> Result<Option<Block>, sqlx::Error> {
        let query = format!(
            "UPDATE page_blocks SET
                kind = COALESCE($2, kind),
                sort_order = COALESCE($3, sort_order),
                data = COALESCE($4, data),
                styles = COALESCE($5, styles),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Block>(&query)
            .bind(id)
            .bind(&input.kind)
            .bind(input.sort_order)
            .bind(&input.data)
            .bind(&input.styles)
            .fetch_optional(pool)
            .await
    }

    /// Atomically reassign orders so that `sort_order = index` for each id
    /// in `ordered_ids`.
    ///
    /// The id sequence must exactly cover the page's active blocks. On any
    /// mismatch the transaction rolls back and prior orders are untouched,
    /// so the page can never render with a partially-applied order.
    ///
    /// Returns the page's active blocks in their new order.
    pub async fn reorder(
        pool: &PgPool,
        page_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<Vec<Block>, ReorderError> {
        let mut tx = pool.begin().await?;

        // Lock the page's active rows for the duration of the reorder.
        let active_ids: Vec<(DbId,)> = sqlx::query_as(
            "SELECT id FROM page_blocks
             WHERE page_id = $1 AND is_active
             ORDER BY id
             FOR UPDATE",
        )
        .bind(page_id)
        .fetch_all(&mut *tx)
        .await?;

        let expected: std::collections::HashSet<DbId> =
            active_ids.iter().map(|(id,)| *id).collect();
        let got: std::collections::HashSet<DbId> = ordered_ids.iter().copied().collect();
        if expected != got || got.len() != ordered_ids.len() {
            // Implicit rollback when tx drops.
            return Err(ReorderError::IdSetMismatch {
                expected: expected.len(),
                got: ordered_ids.len(),
            });
        }

        for (index, id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE page_blocks SET sort_order = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(id)
            .bind(index as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Self::list_for_page(pool, page_id, false).await?)
    }

    /// Soft-delete a block. Returns `true` if a row was deactivated;
    /// `false` if it was already inactive or does not exist.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE page_blocks SET is_active = FALSE, updated_at = NOW()
             WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reactivate a soft-deleted block. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE page_blocks SET is_active = TRUE, updated_at = NOW()
             WHERE id = $1 AND NOT is_active",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
