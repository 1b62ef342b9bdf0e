//! The editor session controller.
//!
//! Owns the working copy of a page during an edit and reconciles it with a
//! [`PageStore`] only through explicit save operations. The session is an
//! explicitly constructed object (no global state); cloning yields another
//! handle to the same session, which is how the autosave timer task reaches
//! back in.
//!
//! Timing discipline:
//! - Every mutation resets the debounce timer (abort + respawn).
//! - A timer that fires while a save is in flight records a pending request
//!   instead of issuing a second save; the save's completion re-arms the
//!   debounce if the document is still dirty.
//! - The timer is cancelled on manual save, reset, close, and load.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use pulsefit_core::types::DbId;

use crate::fallback;
use crate::store::{BlockDraft, PageDocument, PageStore, StoreError};

/// Default debounce delay between the last mutation and an autosave.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(2000);

/* --------------------------------------------------------------------------
   Public result types
   -------------------------------------------------------------------------- */

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An operation that needs a loaded page was called on an empty session.
    #[error("No page is loaded in this session")]
    NoPage,

    /// A targeted block edit named an id the document does not contain.
    #[error("Block {0} is not part of the loaded page")]
    UnknownBlock(DbId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a save request.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The document was persisted; the baseline now holds the canonical copy.
    Saved,
    /// Nothing to do: the working copy matched the baseline.
    Clean,
    /// Another save from this session is still in flight; no request issued.
    InFlight,
}

/// Where a load got its document from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Store,
    Fallback,
}

/// Snapshot of session flags for UI polling.
#[derive(Debug, Clone, Default)]
pub struct EditorStatus {
    pub has_page: bool,
    pub is_dirty: bool,
    pub is_saving: bool,
    pub is_preview: bool,
    pub last_error: Option<String>,
}

/* --------------------------------------------------------------------------
   Session
   -------------------------------------------------------------------------- */

#[derive(Default)]
struct SessionState {
    current: Option<PageDocument>,
    baseline: Option<PageDocument>,
    is_dirty: bool,
    is_saving: bool,
    is_preview: bool,
    /// The debounce fired while a save was in flight; re-arm on completion.
    autosave_pending: bool,
    last_error: Option<String>,
}

/// The armed debounce timer, if any.
///
/// The generation counter lets a fired timer tell whether it still owns the
/// slot: arming bumps the generation, so a task waking up against a stale
/// generation knows it was superseded and must not save.
#[derive(Default)]
struct TimerSlot {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

/// Editor session over a page store.
///
/// Cheap to clone; all clones share the same state and timer slot. The
/// state mutex is never held across an await, so mutations stay responsive
/// while a save is in flight.
pub struct EditorSession<S: PageStore> {
    store: Arc<S>,
    state: Arc<Mutex<SessionState>>,
    timer: Arc<Mutex<TimerSlot>>,
    autosave_delay: Duration,
}

impl<S: PageStore> Clone for EditorSession<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
            timer: Arc::clone(&self.timer),
            autosave_delay: self.autosave_delay,
        }
    }
}

impl<S: PageStore> EditorSession<S> {
    /// A session with the default autosave delay.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_autosave_delay(store, DEFAULT_AUTOSAVE_DELAY)
    }

    pub fn with_autosave_delay(store: Arc<S>, autosave_delay: Duration) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(SessionState::default())),
            timer: Arc::new(Mutex::new(TimerSlot::default())),
            autosave_delay,
        }
    }

    /* ---------------------------------------------------------------------
       Load / reset
       --------------------------------------------------------------------- */

    /// Fetch the canonical page and make it both the working copy and the
    /// baseline. Starts clean; never schedules an autosave.
    pub async fn load(&self, slug_or_id: &str) -> Result<PageDocument, SessionError> {
        self.cancel_timer();
        let doc = self.store.load(slug_or_id).await?;
        self.install(doc.clone());
        Ok(doc)
    }

    /// Like [`load`](Self::load), but when the store is unreachable the
    /// static fallback dataset is consulted so the editor can still open.
    pub async fn load_or_fallback(
        &self,
        slug_or_id: &str,
    ) -> Result<(PageDocument, LoadSource), SessionError> {
        self.cancel_timer();
        match self.store.load(slug_or_id).await {
            Ok(doc) => {
                self.install(doc.clone());
                Ok((doc, LoadSource::Store))
            }
            Err(StoreError::Unavailable(reason)) | Err(StoreError::Internal(reason)) => {
                tracing::warn!(%reason, "Page store unreachable, trying fallback dataset");
                let doc = fallback::find(slug_or_id)
                    .ok_or(StoreError::NotFound(format!("page '{slug_or_id}'")))?;
                self.install(doc.clone());
                Ok((doc, LoadSource::Fallback))
            }
            Err(other) => Err(other.into()),
        }
    }

    fn install(&self, doc: PageDocument) {
        let mut st = self.state.lock().unwrap();
        st.current = Some(doc.clone());
        st.baseline = Some(doc);
        st.is_dirty = false;
        st.is_saving = false;
        st.autosave_pending = false;
        st.last_error = None;
    }

    /// Clear the working copy, baseline, and all flags; cancel the timer.
    pub fn reset(&self) {
        self.cancel_timer();
        *self.state.lock().unwrap() = SessionState::default();
    }

    /// Cancel the autosave timer without touching state. Call on unmount.
    pub fn close(&self) {
        self.cancel_timer();
    }

    /* ---------------------------------------------------------------------
       Introspection
       --------------------------------------------------------------------- */

    pub fn status(&self) -> EditorStatus {
        let st = self.state.lock().unwrap();
        EditorStatus {
            has_page: st.current.is_some(),
            is_dirty: st.is_dirty,
            is_saving: st.is_saving,
            is_preview: st.is_preview,
            last_error: st.last_error.clone(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().unwrap().is_dirty
    }

    /// Clone of the working copy, if a page is loaded.
    pub fn document(&self) -> Option<PageDocument> {
        self.state.lock().unwrap().current.clone()
    }

    /* ---------------------------------------------------------------------
       Mutation
       --------------------------------------------------------------------- */

    /// Apply an arbitrary edit to the working copy.
    ///
    /// Dirtiness is recomputed by structural comparison against the
    /// baseline, so an edit that restores the saved state goes back to
    /// clean (and disarms the timer).
    pub fn edit<F>(&self, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut PageDocument),
    {
        let dirty = {
            let mut st = self.state.lock().unwrap();
            let Some(current) = st.current.as_mut() else {
                return Err(SessionError::NoPage);
            };
            f(current);
            st.is_dirty = st.current != st.baseline;
            st.is_dirty
        };
        if dirty {
            self.arm_timer();
        } else {
            self.cancel_timer();
        }
        Ok(())
    }

    pub fn set_title(&self, title: &str) -> Result<(), SessionError> {
        self.edit(|doc| doc.title = title.to_string())
    }

    pub fn set_description(&self, description: Option<String>) -> Result<(), SessionError> {
        self.edit(|doc| doc.description = description)
    }

    /// Replace the data payload of one block.
    pub fn update_block_data(
        &self,
        block_id: DbId,
        data: serde_json::Value,
    ) -> Result<(), SessionError> {
        self.edit_block(block_id, |b| b.data = data)
    }

    /// Replace the style overrides of one block.
    pub fn update_block_styles(
        &self,
        block_id: DbId,
        styles: Option<serde_json::Value>,
    ) -> Result<(), SessionError> {
        self.edit_block(block_id, |b| b.styles = styles)
    }

    fn edit_block<F>(&self, block_id: DbId, f: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut BlockDraft),
    {
        let mut hit = false;
        self.edit(|doc| {
            if let Some(block) = doc.block_mut(block_id) {
                f(block);
                hit = true;
            }
        })?;
        if hit {
            Ok(())
        } else {
            Err(SessionError::UnknownBlock(block_id))
        }
    }

    /// Append a new block after the current maximum active order.
    pub fn add_block(&self, block: BlockDraft) -> Result<(), SessionError> {
        self.edit(|doc| {
            doc.append_block(block);
        })
    }

    /// Soft-remove a block from the working copy.
    pub fn remove_block(&self, block_id: DbId) -> Result<(), SessionError> {
        let mut hit = false;
        self.edit(|doc| hit = doc.remove_block(block_id))?;
        if hit {
            Ok(())
        } else {
            Err(SessionError::UnknownBlock(block_id))
        }
    }

    /// Reorder the active blocks to the given id sequence.
    pub fn reorder_blocks(&self, ordered_ids: &[DbId]) -> Result<(), SessionError> {
        let mut result = Ok(());
        self.edit(|doc| result = doc.reorder_blocks(ordered_ids))?;
        result.map_err(SessionError::Store)
    }

    /// Toggle preview mode. Pure view state: never dirties the document and
    /// never schedules a save.
    pub fn set_preview_mode(&self, preview: bool) {
        self.state.lock().unwrap().is_preview = preview;
    }

    /* ---------------------------------------------------------------------
       Saving
       --------------------------------------------------------------------- */

    /// Explicit save. Cancels any armed autosave first (the manual save
    /// supersedes it).
    pub async fn save(&self) -> Result<SaveOutcome, SessionError> {
        self.cancel_timer();
        self.save_internal().await
    }

    async fn save_internal(&self) -> Result<SaveOutcome, SessionError> {
        // Snapshot the working copy and claim the in-flight slot.
        let snapshot = {
            let mut st = self.state.lock().unwrap();
            let Some(current) = st.current.clone() else {
                return Err(SessionError::NoPage);
            };
            if !st.is_dirty {
                return Ok(SaveOutcome::Clean);
            }
            if st.is_saving {
                return Ok(SaveOutcome::InFlight);
            }
            st.is_saving = true;
            st.last_error = None;
            current
        };

        let result = self.store.save(&snapshot).await;

        let (out, rearm) = {
            let mut st = self.state.lock().unwrap();
            st.is_saving = false;
            if st.current.is_none() {
                // The session was reset while the save was in flight; the
                // result has nowhere to land.
                return result
                    .map(|_| SaveOutcome::Saved)
                    .map_err(SessionError::Store);
            }
            match result {
                Ok(canonical) => {
                    // The canonical copy carries the authoritative version
                    // and timestamps. If no edits landed mid-flight the
                    // working copy adopts it wholesale; otherwise the edits
                    // win and stay dirty against the new baseline.
                    if st.current.as_ref() == Some(&snapshot) {
                        st.current = Some(canonical.clone());
                        st.is_dirty = false;
                    } else {
                        st.is_dirty = st.current.as_ref() != Some(&canonical);
                    }
                    st.baseline = Some(canonical);
                    let rearm = st.autosave_pending && st.is_dirty;
                    st.autosave_pending = false;
                    (Ok(SaveOutcome::Saved), rearm)
                }
                Err(e) => {
                    // Working copy untouched; dirty stays true for retry.
                    st.last_error = Some(e.to_string());
                    st.autosave_pending = false;
                    (Err(SessionError::Store(e)), false)
                }
            }
        };
        if rearm {
            self.arm_timer();
        }
        out
    }

    /* ---------------------------------------------------------------------
       Debounce timer
       --------------------------------------------------------------------- */

    fn arm_timer(&self) {
        let session = self.clone();
        // Anchor the deadline at the mutation, not at the task's first poll.
        let deadline = tokio::time::Instant::now() + self.autosave_delay;
        let mut slot = self.timer.lock().unwrap();
        if let Some(handle) = slot.handle.take() {
            handle.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;
        slot.handle = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            session.autosave_fire(generation).await;
        }));
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.timer.lock().unwrap().handle.take() {
            handle.abort();
        }
    }

    async fn autosave_fire(&self, generation: u64) {
        // Take our own handle out of the slot before saving: once the save
        // is running it must not be abortable by a later arm_timer. A stale
        // generation or an empty slot means this timer was superseded or
        // cancelled between waking and acquiring the lock.
        {
            let mut slot = self.timer.lock().unwrap();
            if slot.generation != generation || slot.handle.take().is_none() {
                return;
            }
        }
        {
            let mut st = self.state.lock().unwrap();
            if !st.is_dirty || st.current.is_none() {
                return;
            }
            if st.is_saving {
                // Suppress: no overlapping writes to the same page from one
                // session. Completion re-arms if still dirty.
                st.autosave_pending = true;
                return;
            }
        }
        match self.save_internal().await {
            Ok(_) => {}
            Err(e) => {
                // No automatic retry; the next mutation or a manual save
                // will try again.
                tracing::warn!(error = %e, "Autosave failed; changes kept locally");
            }
        }
    }
}
