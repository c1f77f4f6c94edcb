//! Error types for table registration, lookup, and dispatch.

use crate::core::Hook;
use std::fmt;
use thiserror::Error;

/// Boxed error raised by host code inside a hook or action.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building, mutating, or driving a state machine.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("No initial state specified. Call .initial(state) before .build()")]
    MissingStartState,

    #[error("No transition table specified. Call .table(table) or add a transition before .build()")]
    MissingTransitionTable,

    #[error("A transition for event '{event}' in state '{state}' is already registered")]
    DuplicateTransition { event: String, state: String },

    #[error("No transition registered for event '{event}' in state '{state}'")]
    TransitionNotFound { event: String, state: String },

    #[error("No transitions available for event '{event}'")]
    NoTransitionForEvent { event: String },

    #[error("No transition available for event '{event}' in state '{state}'")]
    NoTransitionForState { event: String, state: String },

    /// A hook or action returned an error of its own.
    #[error("Hook failed: {0}")]
    HookFailure(#[source] BoxError),

    /// A hook was invoked that the state never overrode.
    #[error("{hook} hook not implemented for state '{state}'")]
    NotImplemented { hook: Hook, state: String },

    #[error("Invalid state machine definition: {}", format_violations(.0))]
    InvalidDefinition(Vec<DefinitionViolation>),
}

impl FsmError {
    /// Wrap an error raised by host code inside a hook or action.
    pub fn hook_failure<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        FsmError::HookFailure(error.into())
    }

    /// True for lookup misses, which leave the machine untouched and run no hook.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            FsmError::NoTransitionForEvent { .. } | FsmError::NoTransitionForState { .. }
        )
    }
}

/// A problem found while validating a machine definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionViolation {
    /// Two distinct state handles share one name.
    ConflictingStateName { name: String },

    /// A state was registered with an empty name.
    EmptyStateName,

    /// A transition was registered for an empty event name.
    EmptyEventName { state: String },
}

impl fmt::Display for DefinitionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionViolation::ConflictingStateName { name } => {
                write!(f, "state name '{name}' is used by more than one state")
            }
            DefinitionViolation::EmptyStateName => write!(f, "state with an empty name"),
            DefinitionViolation::EmptyEventName { state } => {
                write!(f, "transition from '{state}' has an empty event name")
            }
        }
    }
}

fn format_violations(violations: &[DefinitionViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
