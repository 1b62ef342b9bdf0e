//! Editor session controller for the pulsefit CMS.
//!
//! Mediates between an in-memory editable [`store::PageDocument`] and a
//! [`store::PageStore`] persistence boundary: dirty tracking by structural
//! comparison, manual saves, debounced autosave with a cancellable timer,
//! and suppression of overlapping saves from the same session.
//!
//! Store implementations: [`pg::PgPageStore`] (direct Postgres),
//! [`remote::RemotePageStore`] (HTTP API), [`memory::MemoryPageStore`]
//! (in-process, also backs the static fallback dataset in [`fallback`]).

pub mod fallback;
pub mod memory;
pub mod pg;
pub mod remote;
pub mod session;
pub mod store;

pub use session::{EditorSession, EditorStatus, LoadSource, SaveOutcome, SessionError};
pub use store::{BlockDraft, PageDocument, PageStore, StoreError};
