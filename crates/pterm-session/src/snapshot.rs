#![forbid(unsafe_code)]

//! Serializable projection of the widget state.

use pterm_shell::{HistoryEntry, Interpreter};
use pterm_window::{WindowGeometry, WindowManager};
use serde::{Deserialize, Serialize};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

/// What survives a navigation or reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    /// Scrollback without the welcome banner.
    pub history: Vec<HistoryEntry>,
    /// Submitted command literals, oldest first.
    pub commands: Vec<String>,
    pub is_root: bool,
    pub geometry: WindowGeometry,
    /// Apply this snapshot on the next mount.
    pub restore: bool,
    /// Ask the host shell to open the widget on the next page.
    pub reopen: bool,
}

impl SessionSnapshot {
    /// Capture the current state, flagged for restore.
    #[must_use]
    pub fn capture(shell: &Interpreter, window: &WindowManager, reopen: bool) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            history: shell.session_history(),
            commands: shell.commands().to_vec(),
            is_root: shell.is_root(),
            geometry: window.geometry(),
            restore: true,
            reopen,
        }
    }

    /// Merge into freshly mounted components. The window always comes back visible.
    pub fn apply(self, shell: &mut Interpreter, window: &mut WindowManager) {
        shell.restore_session(self.history, self.commands, self.is_root);
        window.restore_geometry(self.geometry);
    }
}
