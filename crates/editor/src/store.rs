//! The persistence boundary consumed by the editor session.
//!
//! A [`PageDocument`] is the editable value-type projection of a page and
//! its blocks. The session compares documents structurally to decide
//! whether the working copy is dirty, so everything here derives
//! `PartialEq` and `Clone`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pulsefit_core::block::BlockKind;
use pulsefit_core::page::{PageStatus, PageTemplate};
use pulsefit_core::render::BlockView;
use pulsefit_core::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
   Errors
   -------------------------------------------------------------------------- */

/// Typed failures from the persistence boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The page (or a block inside it) no longer exists at the store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation conflicts with stored state (e.g. duplicate slug).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The document failed validation before any persistence happened.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The caller is not allowed to persist this document.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The store cannot be reached (network/backend down). Callers may fall
    /// back to the static dataset for loads.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/* --------------------------------------------------------------------------
   Document types
   -------------------------------------------------------------------------- */

/// Editable projection of a block.
///
/// `id` is `None` for blocks created in the editor that have not been
/// persisted yet; the store assigns an id on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDraft {
    pub id: Option<DbId>,
    pub kind: BlockKind,
    pub sort_order: i32,
    pub data: serde_json::Value,
    pub styles: Option<serde_json::Value>,
    /// False means the block was removed in the editor (soft delete).
    pub is_active: bool,
}

impl BlockDraft {
    /// A new active block with the given kind and payload; the caller (or
    /// [`PageDocument::append_block`]) assigns the order.
    pub fn new(kind: BlockKind, data: serde_json::Value) -> Self {
        Self {
            id: None,
            kind,
            sort_order: 0,
            data,
            styles: None,
            is_active: true,
        }
    }

    /// Project into the renderer's view type. Unsaved drafts render with a
    /// sentinel id of 0.
    pub fn to_view(&self) -> BlockView {
        BlockView {
            id: self.id.unwrap_or(0),
            kind: self.kind.clone(),
            data: self.data.clone(),
            styles: self.styles.clone(),
        }
    }
}

/// Editable projection of a page with its blocks.
///
/// `version_number` and `updated_at` are authoritative only on documents
/// returned by a store; the session never modifies them locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    pub id: Option<DbId>,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub status: PageStatus,
    pub template: PageTemplate,
    pub version_number: i64,
    pub updated_at: Option<Timestamp>,
    /// All blocks, active and inactive, ordered by `sort_order`.
    pub blocks: Vec<BlockDraft>,
}

impl PageDocument {
    /// A fresh draft document with no blocks.
    pub fn new(slug: &str, title: &str) -> Self {
        Self {
            id: None,
            slug: slug.to_string(),
            title: title.to_string(),
            description: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            status: PageStatus::Draft,
            template: PageTemplate::Default,
            version_number: 0,
            updated_at: None,
            blocks: Vec::new(),
        }
    }

    /// Active blocks in render order.
    pub fn active_blocks(&self) -> impl Iterator<Item = &BlockDraft> {
        self.blocks.iter().filter(|b| b.is_active)
    }

    /// Mutable access to a persisted block by id.
    pub fn block_mut(&mut self, id: DbId) -> Option<&mut BlockDraft> {
        self.blocks.iter_mut().find(|b| b.id == Some(id))
    }

    /// Append a block after the current maximum active order.
    ///
    /// Returns the index of the new draft within `blocks`.
    pub fn append_block(&mut self, mut block: BlockDraft) -> usize {
        block.sort_order = self
            .active_blocks()
            .map(|b| b.sort_order + 1)
            .max()
            .unwrap_or(0);
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    /// Soft-remove a persisted block. Returns false if the id is unknown.
    pub fn remove_block(&mut self, id: DbId) -> bool {
        match self.block_mut(id) {
            Some(block) => {
                block.is_active = false;
                true
            }
            None => false,
        }
    }

    /// Reorder the active blocks so they appear in the sequence given by
    /// `ordered_ids`, assigning distinct consecutive orders (`order =
    /// index`). Inactive blocks are untouched.
    ///
    /// Fails if the id sequence does not exactly cover the active persisted
    /// blocks.
    pub fn reorder_blocks(&mut self, ordered_ids: &[DbId]) -> Result<(), StoreError> {
        let active: Vec<DbId> = self.active_blocks().filter_map(|b| b.id).collect();
        let expected: std::collections::HashSet<DbId> = active.iter().copied().collect();
        let got: std::collections::HashSet<DbId> = ordered_ids.iter().copied().collect();
        if expected != got || got.len() != ordered_ids.len() {
            return Err(StoreError::Validation(format!(
                "Reorder id set mismatch: page has {} active blocks, request named {}",
                expected.len(),
                ordered_ids.len()
            )));
        }
        for (index, id) in ordered_ids.iter().enumerate() {
            if let Some(block) = self.block_mut(*id) {
                block.sort_order = index as i32;
            }
        }
        self.blocks.sort_by_key(|b| (!b.is_active, b.sort_order));
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Store trait
   -------------------------------------------------------------------------- */

/// Asynchronous persistence boundary for page documents.
///
/// `save` returns the canonical stored representation: the store assigns
/// ids to new blocks, bumps `version_number`, and sets `updated_at`.
/// Cross-session concurrency is last-write-wins; the boundary performs no
/// version check.
#[async_trait]
pub trait PageStore: Send + Sync + 'static {
    /// Fetch the canonical document by numeric id or slug.
    async fn load(&self, slug_or_id: &str) -> Result<PageDocument, StoreError>;

    /// Durably store the document, returning the canonical copy.
    async fn save(&self, doc: &PageDocument) -> Result<PageDocument, StoreError>;
}

/* --------------------------------------------------------------------------
   Tests
   -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_blocks() -> PageDocument {
        let mut doc = PageDocument::new("home", "Home");
        for (i, kind) in ["hero", "text", "button"].iter().enumerate() {
            doc.blocks.push(BlockDraft {
                id: Some(i as DbId + 1),
                kind: BlockKind::from_tag(kind),
                sort_order: i as i32,
                data: json!({}),
                styles: None,
                is_active: true,
            });
        }
        doc
    }

    #[test]
    fn append_assigns_next_order() {
        let mut doc = doc_with_blocks();
        let idx = doc.append_block(BlockDraft::new(BlockKind::Text, json!({})));
        assert_eq!(doc.blocks[idx].sort_order, 3);

        let mut empty = PageDocument::new("p", "P");
        let idx = empty.append_block(BlockDraft::new(BlockKind::Hero, json!({})));
        assert_eq!(empty.blocks[idx].sort_order, 0);
    }

    #[test]
    fn append_skips_inactive_orders() {
        let mut doc = doc_with_blocks();
        doc.remove_block(3);
        let idx = doc.append_block(BlockDraft::new(BlockKind::Text, json!({})));
        // Block 3 had order 2; inactive, so the next active order is 2.
        assert_eq!(doc.blocks[idx].sort_order, 2);
    }

    #[test]
    fn reorder_assigns_index_order() {
        let mut doc = doc_with_blocks();
        doc.reorder_blocks(&[3, 1, 2]).unwrap();
        let seq: Vec<(Option<DbId>, i32)> = doc
            .active_blocks()
            .map(|b| (b.id, b.sort_order))
            .collect();
        assert_eq!(seq, vec![(Some(3), 0), (Some(1), 1), (Some(2), 2)]);
    }

    #[test]
    fn reorder_rejects_wrong_id_set() {
        let mut doc = doc_with_blocks();
        assert!(doc.reorder_blocks(&[1, 2]).is_err());
        assert!(doc.reorder_blocks(&[1, 2, 99]).is_err());
        assert!(doc.reorder_blocks(&[1, 2, 2]).is_err());
        // Orders unchanged after failed attempts.
        let orders: Vec<i32> = doc.active_blocks().map(|b| b.sort_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn structural_equality_detects_edits() {
        let doc = doc_with_blocks();
        let mut edited = doc.clone();
        assert_eq!(doc, edited);
        edited.block_mut(2).unwrap().data = json!({"text": "changed"});
        assert_ne!(doc, edited);
    }

    #[test]
    fn document_serde_round_trip() {
        let doc = doc_with_blocks();
        let json = serde_json::to_string(&doc).unwrap();
        let back: PageDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
