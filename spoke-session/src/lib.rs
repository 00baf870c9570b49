//! # Spoke Session Library
//!
//! Client-side editing surface for scoring records:
//! - An explicitly owned editing session (no ambient global record)
//! - Debounced autosave against the remote store
//! - File-backed local cache fallback for offline/degraded operation
//!
//! The session never blocks the editor on a remote write: background saves
//! that fail fall back to the local cache and raise a degraded-mode event;
//! only user-initiated operations (load, delete) surface errors.

pub mod cache;
pub mod session;
pub mod store;
pub mod sync;

pub use cache::{CachedDraft, FileCache, LocalCache, MemoryCache};
pub use session::{Binding, Draft};
pub use store::{HttpStore, RemoteStore, StoreError};
pub use sync::EditSession;
