//! Transitions and the table that resolves them.
//!
//! A [`Transition`] is an immutable edge between two states, keyed by an
//! event name. The [`TransitionTable`] owns transitions in an arena and
//! indexes them by `(event, source state)` name pairs; it holds state
//! handles but never owns the states' lifecycles.

mod table;
mod transition;

pub use table::TransitionTable;
pub use transition::{action, Action, Transition, TransitionId};
