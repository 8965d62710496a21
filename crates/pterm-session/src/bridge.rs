#![forbid(unsafe_code)]

//! Session Persistence Bridge.
//!
//! Writes happen before minimizing and before navigation or reload. The
//! read happens once on mount through [`SessionBridge::take_restore`]: the
//! restore flag is cleared as the snapshot is consumed, while a reopen flag
//! stays behind for the host shell to pick up with
//! [`SessionBridge::take_reopen`].
//!
//! Storage failures never reach the user. They are logged at `warn` and
//! treated as "no snapshot".

use crate::snapshot::{SNAPSHOT_VERSION, SessionSnapshot};
use crate::storage::{StorageBackend, StorageError, StorageResult};

/// Default storage key.
pub const SESSION_KEY: &str = "pterm.session";

pub struct SessionBridge<S> {
    storage: S,
    key: String,
}

impl<S: StorageBackend> SessionBridge<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, SESSION_KEY)
    }

    #[must_use]
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Write `snapshot`. Returns `false` if the store refused it.
    pub fn save(&mut self, snapshot: &SessionSnapshot) -> bool {
        match self.write(snapshot) {
            Ok(()) => {
                tracing::info!(
                    key = %self.key,
                    entries = snapshot.history.len(),
                    reopen = snapshot.reopen,
                    "session snapshot written"
                );
                true
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "session snapshot not written");
                false
            }
        }
    }

    fn write(&mut self, snapshot: &SessionSnapshot) -> StorageResult<()> {
        let text = serde_json::to_string(snapshot)?;
        self.storage.set(&self.key, &text)
    }

    /// Read the stored snapshot without consuming it.
    pub fn peek(&self) -> StorageResult<Option<SessionSnapshot>> {
        let Some(text) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        let snapshot: SessionSnapshot = serde_json::from_str(&text)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::Unavailable(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(Some(snapshot))
    }

    /// Consume a snapshot flagged for restore.
    ///
    /// A snapshot with neither flag is discarded. One carrying only `reopen`
    /// is left for [`Self::take_reopen`].
    pub fn take_restore(&mut self) -> Option<SessionSnapshot> {
        let snapshot = match self.peek() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "ignoring stored session");
                self.discard();
                return None;
            }
        };

        match (snapshot.restore, snapshot.reopen) {
            (true, true) => {
                let remaining = SessionSnapshot {
                    restore: false,
                    ..snapshot.clone()
                };
                if let Err(err) = self.write(&remaining) {
                    tracing::warn!(key = %self.key, error = %err, "could not clear restore flag");
                }
            }
            (true, false) | (false, false) => self.discard(),
            (false, true) => return None,
        }

        if snapshot.restore {
            tracing::info!(
                key = %self.key,
                entries = snapshot.history.len(),
                is_root = snapshot.is_root,
                "session snapshot restored"
            );
            Some(snapshot)
        } else {
            None
        }
    }

    /// Whether the host shell should open the widget. Clears the flag.
    pub fn take_reopen(&mut self) -> bool {
        let snapshot = match self.peek() {
            Ok(Some(snapshot)) if snapshot.reopen => snapshot,
            Ok(_) => return false,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "ignoring stored session");
                return false;
            }
        };
        if snapshot.restore {
            let remaining = SessionSnapshot {
                reopen: false,
                ..snapshot
            };
            if let Err(err) = self.write(&remaining) {
                tracing::warn!(key = %self.key, error = %err, "could not clear reopen flag");
            }
        } else {
            self.discard();
        }
        true
    }

    /// Remove any stored snapshot.
    pub fn discard(&mut self) {
        if let Err(err) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %err, "could not remove session");
        }
    }
}

impl<S> std::fmt::Debug for SessionBridge<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBridge")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
