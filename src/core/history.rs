//! State transition history tracking.
//!
//! Records which transitions a machine has taken, by state and event name,
//! so the path can be inspected later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single completed transition.
///
/// # Example
///
/// ```rust
/// use fsm_engine::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: "idle".to_string(),
///     to: "running".to_string(),
///     event: "start".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_self_transition());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// Name of the state that was exited
    pub from: String,
    /// Name of the state that was entered
    pub to: String,
    /// Name of the event that triggered the transition
    pub event: String,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            event: event.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_self_transition(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered history of completed transitions.
///
/// [`record`](StateHistory::record) is pure and returns a new history;
/// [`push_bounded`](StateHistory::push_bounded) appends in place and is what
/// a running machine uses.
///
/// # Example
///
/// ```rust
/// use fsm_engine::{StateHistory, StateTransition};
///
/// let history = StateHistory::new()
///     .record(StateTransition::new("idle", "running", "start"))
///     .record(StateTransition::new("running", "stopped", "stop"));
///
/// assert_eq!(history.get_path(), vec!["idle", "running", "stopped"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left unchanged.
    pub fn record(&self, transition: StateTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place, dropping the oldest entries so that at
    /// most `limit` remain.
    pub fn push_bounded(&mut self, transition: StateTransition, limit: Option<usize>) {
        self.transitions.push(transition);
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            if excess > 0 {
                self.transitions.drain(..excess);
            }
        }
    }

    /// Names of the states traversed: the first `from`, then every `to`.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// The most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.last()
    }
}
