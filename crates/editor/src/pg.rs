//! Postgres-backed [`PageStore`].
//!
//! Bridges the document model to the repository layer. Saving diffs the
//! draft's blocks against the stored rows: new drafts are inserted, changed
//! ones updated, missing or deactivated ones soft-deleted, and the final
//! active sequence is normalized through the atomic reorder.

use async_trait::async_trait;
use sqlx::PgPool;

use pulsefit_core::block::BlockKind;
use pulsefit_core::page::{PageStatus, PageTemplate};
use pulsefit_core::types::DbId;
use pulsefit_db::models::block::{Block, CreateBlock, UpdateBlock};
use pulsefit_db::models::page::{CreatePage, Page, UpdatePage};
use pulsefit_db::repositories::{BlockRepo, PageRepo, ReorderError};

use crate::store::{BlockDraft, PageDocument, PageStore, StoreError};

/// [`PageStore`] over a live PostgreSQL pool.
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn assemble(&self, page: Page) -> Result<PageDocument, StoreError> {
        let blocks = BlockRepo::list_for_page(&self.pool, page.id, true)
            .await
            .map_err(map_sqlx)?;
        Ok(to_document(page, &blocks))
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn load(&self, slug_or_id: &str) -> Result<PageDocument, StoreError> {
        let page = PageRepo::resolve(&self.pool, slug_or_id)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| StoreError::NotFound(format!("page '{slug_or_id}'")))?;
        self.assemble(page).await
    }

    async fn save(&self, doc: &PageDocument) -> Result<PageDocument, StoreError> {
        validate_document(doc)?;

        let page = match doc.id {
            None => PageRepo::create(&self.pool, &to_create_page(doc))
                .await
                .map_err(map_sqlx)?,
            Some(id) => PageRepo::update(&self.pool, id, &to_update_page(doc))
                .await
                .map_err(map_sqlx)?
                .ok_or_else(|| StoreError::NotFound(format!("page {id}")))?,
        };

        let stored = BlockRepo::list_for_page(&self.pool, page.id, true)
            .await
            .map_err(map_sqlx)?;

        // Insert new drafts, update persisted ones, deactivate removals.
        for draft in &doc.blocks {
            match draft.id {
                None => {
                    if draft.is_active {
                        BlockRepo::create(&self.pool, page.id, &to_create_block(draft))
                            .await
                            .map_err(map_sqlx)?;
                    }
                }
                Some(block_id) => {
                    let existing = stored.iter().find(|b| b.id == block_id).ok_or_else(|| {
                        StoreError::NotFound(format!("block {block_id}"))
                    })?;
                    if !draft.is_active {
                        if existing.is_active {
                            BlockRepo::soft_delete(&self.pool, block_id)
                                .await
                                .map_err(map_sqlx)?;
                        }
                        continue;
                    }
                    if !existing.is_active {
                        BlockRepo::restore(&self.pool, block_id)
                            .await
                            .map_err(map_sqlx)?;
                    }
                    if block_changed(existing, draft) {
                        BlockRepo::update(&self.pool, block_id, &to_update_block(draft))
                            .await
                            .map_err(map_sqlx)?;
                    }
                }
            }
        }

        // Stored blocks the draft no longer mentions are removals.
        for existing in &stored {
            let mentioned = doc.blocks.iter().any(|d| d.id == Some(existing.id));
            if !mentioned && existing.is_active {
                BlockRepo::soft_delete(&self.pool, existing.id)
                    .await
                    .map_err(map_sqlx)?;
            }
        }

        // Normalize the active sequence to order = index, atomically.
        let active = BlockRepo::list_for_page(&self.pool, page.id, false)
            .await
            .map_err(map_sqlx)?;
        if !active.is_empty() {
            let mut ids: Vec<DbId> = active.iter().map(|b| b.id).collect();
            // Draft order wins for blocks the draft knows about.
            let draft_rank = |id: DbId| {
                doc.blocks
                    .iter()
                    .filter(|d| d.is_active)
                    .position(|d| d.id == Some(id))
            };
            ids.sort_by_key(|id| (draft_rank(*id).is_none(), draft_rank(*id)));
            BlockRepo::reorder(&self.pool, page.id, &ids)
                .await
                .map_err(|e| match e {
                    ReorderError::Db(err) => map_sqlx(err),
                    ReorderError::IdSetMismatch { .. } => {
                        StoreError::Internal(e.to_string())
                    }
                })?;
        }

        // Return the canonical stored copy.
        let page = PageRepo::find_by_id(&self.pool, page.id)
            .await
            .map_err(map_sqlx)?
            .ok_or_else(|| StoreError::NotFound(format!("page {}", page.id)))?;
        self.assemble(page).await
    }
}

/* --------------------------------------------------------------------------
   Conversions
   -------------------------------------------------------------------------- */

/// Build a document from a page row and its block rows.
pub fn to_document(page: Page, blocks: &[Block]) -> PageDocument {
    PageDocument {
        id: Some(page.id),
        slug: page.slug,
        title: page.title,
        description: page.description,
        meta_title: page.meta_title,
        meta_description: page.meta_description,
        meta_keywords: page.meta_keywords,
        status: PageStatus::parse(&page.status).unwrap_or(PageStatus::Draft),
        template: PageTemplate::parse(&page.template).unwrap_or(PageTemplate::Default),
        version_number: page.version_number,
        updated_at: Some(page.updated_at),
        blocks: blocks
            .iter()
            .map(|b| BlockDraft {
                id: Some(b.id),
                kind: BlockKind::from_tag(&b.kind),
                sort_order: b.sort_order,
                data: b.data.clone(),
                styles: b.styles.clone(),
                is_active: b.is_active,
            })
            .collect(),
    }
}

fn validate_document(doc: &PageDocument) -> Result<(), StoreError> {
    pulsefit_core::page::validate_slug(&doc.slug)
        .and_then(|()| pulsefit_core::page::validate_title(&doc.title))
        .map_err(|e| StoreError::Validation(e.to_string()))?;
    for draft in &doc.blocks {
        pulsefit_core::block::validate_tag(draft.kind.as_str())
            .and_then(|()| pulsefit_core::block::validate_data(&draft.data))
            .and_then(|()| pulsefit_core::block::validate_styles(draft.styles.as_ref()))
            .map_err(|e| StoreError::Validation(e.to_string()))?;
    }
    Ok(())
}

fn to_create_page(doc: &PageDocument) -> CreatePage {
    CreatePage {
        slug: doc.slug.clone(),
        title: doc.title.clone(),
        description: doc.description.clone(),
        meta_title: doc.meta_title.clone(),
        meta_description: doc.meta_description.clone(),
        meta_keywords: doc.meta_keywords.clone(),
        status: Some(doc.status.as_str().to_string()),
        template: Some(doc.template.as_str().to_string()),
        created_by: None,
    }
}

fn to_update_page(doc: &PageDocument) -> UpdatePage {
    UpdatePage {
        slug: Some(doc.slug.clone()),
        title: Some(doc.title.clone()),
        description: doc.description.clone(),
        meta_title: doc.meta_title.clone(),
        meta_description: doc.meta_description.clone(),
        meta_keywords: doc.meta_keywords.clone(),
        status: Some(doc.status.as_str().to_string()),
        template: Some(doc.template.as_str().to_string()),
        updated_by: None,
    }
}

fn to_create_block(draft: &BlockDraft) -> CreateBlock {
    CreateBlock {
        kind: draft.kind.as_str().to_string(),
        sort_order: Some(draft.sort_order),
        data: draft.data.clone(),
        styles: draft.styles.clone(),
    }
}

fn to_update_block(draft: &BlockDraft) -> UpdateBlock {
    UpdateBlock {
        kind: Some(draft.kind.as_str().to_string()),
        sort_order: Some(draft.sort_order),
        data: Some(draft.data.clone()),
        styles: draft.styles.clone(),
    }
}

fn block_changed(existing: &Block, draft: &BlockDraft) -> bool {
    existing.kind != draft.kind.as_str()
        || existing.sort_order != draft.sort_order
        || existing.data != draft.data
        || existing.styles != draft.styles
}

/// Map a sqlx error to the store's typed failure.
fn map_sqlx(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound("row not found".to_string()),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            StoreError::Conflict(format!(
                "unique constraint violated: {}",
                db_err.constraint().unwrap_or("unknown")
            ))
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(err.to_string())
        }
        _ => StoreError::Internal(err.to_string()),
    }
}
