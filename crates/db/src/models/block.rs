//! Block entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use pulsefit_core::block::BlockKind;
use pulsefit_core::render::BlockView;
use pulsefit_core::types::{DbId, Timestamp};

/// A block row from the `page_blocks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Block {
    pub id: DbId,
    pub page_id: DbId,
    /// Free-form type tag; see [`BlockKind`] for the known set.
    pub kind: String,
    /// Render position among active blocks of the page.
    pub sort_order: i32,
    pub data: serde_json::Value,
    pub styles: Option<serde_json::Value>,
    /// False means soft-deleted: hidden from rendering and active listings,
    /// retained in storage.
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Block {
    /// Project this row into the renderer's view type.
    pub fn to_view(&self) -> BlockView {
        BlockView {
            id: self.id,
            kind: BlockKind::from_tag(&self.kind),
            data: self.data.clone(),
            styles: self.styles.clone(),
        }
    }
}

/// DTO for creating a new block.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlock {
    pub kind: String,
    /// When omitted, the block is appended after the page's current maximum
    /// active order.
    pub sort_order: Option<i32>,
    pub data: serde_json::Value,
    pub styles: Option<serde_json::Value>,
}

/// DTO for updating an existing block. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlock {
    pub kind: Option<String>,
    pub sort_order: Option<i32>,
    pub data: Option<serde_json::Value>,
    pub styles: Option<serde_json::Value>,
}
