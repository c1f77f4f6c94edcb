//! Runtime options for a state machine.

use serde::{Deserialize, Serialize};

/// History entries a machine keeps unless told otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Options controlling what a machine keeps track of while it runs.
///
/// By default the most recent [`DEFAULT_HISTORY_LIMIT`] transitions are kept,
/// so a long-running machine holds a bounded amount of history.
///
/// Deserializes with defaults for missing fields, so a partial config is valid:
///
/// ```rust
/// use fsm_engine::MachineOptions;
///
/// let options: MachineOptions = serde_json::from_str(r#"{ "history_limit": 16 }"#).unwrap();
/// assert!(options.record_history);
/// assert_eq!(options.history_limit, Some(16));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    /// Record every completed transition in the machine's history
    pub record_history: bool,
    /// Keep at most this many history entries, dropping the oldest.
    /// `None` keeps every entry.
    pub history_limit: Option<usize>,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            record_history: true,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl MachineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn history recording off.
    pub fn without_history(mut self) -> Self {
        self.record_history = false;
        self
    }

    /// Bound the history to the `limit` most recent transitions.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    /// Keep every transition. Memory grows with each dispatch.
    pub fn unbounded_history(mut self) -> Self {
        self.history_limit = None;
        self
    }
}
