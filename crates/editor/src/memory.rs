//! In-process page store.
//!
//! Backs the editor tests and the static fallback dataset. Mirrors the
//! canonicalization the real store performs on save: id assignment for new
//! pages/blocks, version bump, and `updated_at` stamping.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use pulsefit_core::types::DbId;

use crate::store::{PageDocument, PageStore, StoreError};

#[derive(Default)]
struct Inner {
    pages: HashMap<DbId, PageDocument>,
    next_page_id: DbId,
    next_block_id: DbId,
}

/// HashMap-backed [`PageStore`].
///
/// Test hooks: `fail_next_save` makes the next save fail with an
/// `Unavailable` error, and `save_latency` delays each save so in-flight
/// behaviour can be exercised under a paused clock.
pub struct MemoryPageStore {
    inner: Mutex<Inner>,
    fail_next_save: AtomicBool,
    save_calls: AtomicUsize,
    save_latency: Mutex<Duration>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                pages: HashMap::new(),
                next_page_id: 1,
                next_block_id: 1,
            }),
            fail_next_save: AtomicBool::new(false),
            save_calls: AtomicUsize::new(0),
            save_latency: Mutex::new(Duration::ZERO),
        }
    }

    /// A store pre-seeded with documents. Unset ids are assigned.
    pub fn with_pages(pages: Vec<PageDocument>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().unwrap();
            for mut doc in pages {
                let id = match doc.id {
                    Some(id) => {
                        inner.next_page_id = inner.next_page_id.max(id + 1);
                        id
                    }
                    None => {
                        let id = inner.next_page_id;
                        inner.next_page_id += 1;
                        doc.id = Some(id);
                        id
                    }
                };
                for block in &mut doc.blocks {
                    if block.id.is_none() {
                        block.id = Some(inner.next_block_id);
                        inner.next_block_id += 1;
                    } else {
                        inner.next_block_id =
                            inner.next_block_id.max(block.id.unwrap() + 1);
                    }
                }
                inner.pages.insert(id, doc);
            }
        }
        store
    }

    /// Make the next `save` call fail with `Unavailable`.
    pub fn fail_next_save(&self) {
        self.fail_next_save.store(true, Ordering::SeqCst);
    }

    /// Delay every save by `latency` (uses the tokio clock, so paused-time
    /// tests control when the save resolves).
    pub fn set_save_latency(&self, latency: Duration) {
        *self.save_latency.lock().unwrap() = latency;
    }

    /// Number of `save` calls made so far, including failed ones.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Direct read of a stored document.
    pub fn get(&self, id: DbId) -> Option<PageDocument> {
        self.inner.lock().unwrap().pages.get(&id).cloned()
    }
}

impl Default for MemoryPageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn load(&self, slug_or_id: &str) -> Result<PageDocument, StoreError> {
        let inner = self.inner.lock().unwrap();
        let found = match slug_or_id.parse::<DbId>() {
            Ok(id) => inner.pages.get(&id),
            Err(_) => inner.pages.values().find(|p| p.slug == slug_or_id),
        };
        found
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("page '{slug_or_id}'")))
    }

    async fn save(&self, doc: &PageDocument) -> Result<PageDocument, StoreError> {
        // Count the request before simulating latency so in-flight saves
        // are observable to tests.
        self.save_calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self.save_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.fail_next_save.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }

        pulsefit_core::page::validate_slug(&doc.slug)
            .and_then(|()| pulsefit_core::page::validate_title(&doc.title))
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let mut inner = self.inner.lock().unwrap();

        let id = match doc.id {
            Some(id) if inner.pages.contains_key(&id) => id,
            Some(id) => return Err(StoreError::NotFound(format!("page {id}"))),
            None => {
                let id = inner.next_page_id;
                inner.next_page_id += 1;
                id
            }
        };

        if inner
            .pages
            .values()
            .any(|p| p.slug == doc.slug && p.id != Some(id))
        {
            return Err(StoreError::Conflict(format!(
                "slug '{}' already exists",
                doc.slug
            )));
        }

        let mut canonical = doc.clone();
        canonical.id = Some(id);
        canonical.version_number += 1;
        canonical.updated_at = Some(Utc::now());
        for block in &mut canonical.blocks {
            if block.id.is_none() {
                block.id = Some(inner.next_block_id);
                inner.next_block_id += 1;
            }
        }
        inner.pages.insert(id, canonical.clone());
        Ok(canonical)
    }
}
