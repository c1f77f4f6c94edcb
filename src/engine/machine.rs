//! State machine that dispatches events through a transition table.

use crate::core::{Event, Hook, StateHistory, StateRef, StateTransition};
use crate::engine::options::MachineOptions;
use crate::error::FsmError;
use crate::transitions::{Action, Transition, TransitionId, TransitionTable};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A finite state machine with exactly one current state.
///
/// Events are dispatched with [`trigger_event`](Self::trigger_event), which
/// looks up the transition for `(event, current state)`, runs it, and moves
/// to its destination. The current state changes only when the whole
/// transition succeeded: a failed lookup, hook, or action leaves it where it
/// was.
///
/// Dispatch runs to completion on the caller's thread. Because it takes
/// `&mut self`, only one dispatch can be in flight per machine; share a
/// machine across threads behind a `Mutex`.
pub struct StateMachine<D = ()> {
    current: StateRef<D>,
    table: TransitionTable<D>,
    history: StateHistory,
    options: MachineOptions,
}

impl<D> StateMachine<D> {
    /// Create a machine in `start` that resolves events through `table`.
    pub fn new(start: StateRef<D>, table: TransitionTable<D>) -> Self {
        Self::with_options(start, table, MachineOptions::default())
    }

    pub fn with_options(
        start: StateRef<D>,
        table: TransitionTable<D>,
        options: MachineOptions,
    ) -> Self {
        Self {
            current: start,
            table,
            history: StateHistory::new(),
            options,
        }
    }

    /// Get the current state
    pub fn current_state(&self) -> &StateRef<D> {
        &self.current
    }

    /// True if the current state is named `name`.
    pub fn is_in(&self, name: &str) -> bool {
        self.current.name() == name
    }

    pub fn transition_table(&self) -> &TransitionTable<D> {
        &self.table
    }

    /// Completed transitions, oldest first.
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    /// See [`TransitionTable::add_transition`].
    pub fn add_transition(
        &mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
        action: Option<Action>,
    ) -> Result<TransitionId, FsmError> {
        self.table.add_transition(source, event, destination, action)
    }

    /// See [`TransitionTable::replace_transition`].
    pub fn replace_transition(
        &mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
        action: Option<Action>,
    ) -> (TransitionId, Option<Transition<D>>) {
        self.table
            .replace_transition(source, event, destination, action)
    }

    /// See [`TransitionTable::remove_transition`].
    pub fn remove_transition(
        &mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
    ) -> Result<Transition<D>, FsmError> {
        self.table.remove_transition(source, event, destination)
    }

    /// True if `event` has a transition out of the current state.
    pub fn can_handle(&self, event: &str) -> bool {
        self.table.contains(&self.current, event)
    }

    /// Dispatch `event` and return the new current state.
    ///
    /// Lookup errors ([`FsmError::NoTransitionForEvent`],
    /// [`FsmError::NoTransitionForState`]) and hook or action errors are
    /// returned unchanged. On any error the current state is left as it was,
    /// even if the old state's exit hook already ran.
    pub fn trigger_event(&mut self, event: &Event<D>) -> Result<StateRef<D>, FsmError> {
        let transition = self
            .table
            .get_transition(&self.current, &event.name)
            .inspect_err(|err| {
                debug!(
                    event = %event.name,
                    state = self.current.name(),
                    error = %err,
                    "no transition for event"
                );
            })?;

        let next = transition.execute(&event.data).inspect_err(|err| {
            debug!(
                event = %event.name,
                state = self.current.name(),
                error = %err,
                "transition failed, current state unchanged"
            );
        })?;

        debug!(
            event = %event.name,
            from = self.current.name(),
            to = next.name(),
            "transition completed"
        );

        if self.options.record_history {
            self.history.push_bounded(
                StateTransition::new(self.current.name(), next.name(), event.name.as_str()),
                self.options.history_limit,
            );
        }
        self.current = Arc::clone(&next);
        Ok(next)
    }

    /// Run the current state's tick hook without looking anything up or
    /// changing state.
    pub fn tick(&self, data: &D) -> Result<(), FsmError> {
        trace!(state = self.current.name(), hook = %Hook::Tick, "running hook");
        self.current.on_tick(data)
    }
}

impl<D> fmt::Debug for StateMachine<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current.name())
            .field("transitions", &self.table.len())
            .field("history", &self.history.len())
            .field("options", &self.options)
            .finish()
    }
}
