#![forbid(unsafe_code)]

//! Session persistence for the pterm terminal widget.
//!
//! - [`StorageBackend`] - Host key/value store (`get`/`set`/`remove`)
//! - [`SessionSnapshot`] - History, command list, root flag, and geometry
//! - [`SessionBridge`] - Writes snapshots and consumes them once on mount
//!
//! # Feature Flags
//!
//! - `file-storage`: enables [`FileStorage`], a JSON file backend

pub mod bridge;
pub mod snapshot;
pub mod storage;

pub use bridge::{SESSION_KEY, SessionBridge};
pub use snapshot::{SNAPSHOT_VERSION, SessionSnapshot};
#[cfg(feature = "file-storage")]
pub use storage::FileStorage;
pub use storage::{MemoryStorage, StorageBackend, StorageError, StorageResult};
