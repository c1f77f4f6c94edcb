//! Builder for constructing state machines.

use crate::core::StateRef;
use crate::engine::machine::StateMachine;
use crate::engine::options::MachineOptions;
use crate::error::FsmError;
use crate::transitions::{action, Action, TransitionTable};

/// Builder for constructing state machines with a fluent API.
///
/// Unlike [`StateMachine::new`], the builder accepts a missing start state or
/// table and reports it from [`build`](Self::build), and it validates the
/// definition before handing out a machine.
///
/// # Example
///
/// ```rust
/// use fsm_engine::{Event, FnState, StateMachineBuilder, StateRef};
///
/// let idle: StateRef = FnState::passive("idle").into_ref();
/// let running: StateRef = FnState::passive("running").into_ref();
///
/// let mut machine = StateMachineBuilder::new()
///     .initial(idle.clone())
///     .transition(&idle, "start", &running)?
///     .transition(&running, "stop", &idle)?
///     .build()?;
///
/// machine.trigger_event(&Event::named("start"))?;
/// assert!(machine.is_in("running"));
/// # Ok::<(), fsm_engine::FsmError>(())
/// ```
pub struct StateMachineBuilder<D = ()> {
    initial: Option<StateRef<D>>,
    table: Option<TransitionTable<D>>,
    options: MachineOptions,
}

impl<D> StateMachineBuilder<D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            table: None,
            options: MachineOptions::default(),
        }
    }

    /// Set the start state (required).
    pub fn initial(mut self, state: StateRef<D>) -> Self {
        self.initial = Some(state);
        self
    }

    /// Use a prepared table.
    ///
    /// Transitions registered on the builder before or after this call are
    /// merged with the table's. A key present on both sides fails with
    /// [`FsmError::DuplicateTransition`].
    pub fn table(mut self, table: TransitionTable<D>) -> Result<Self, FsmError> {
        let Some(existing) = self.table.as_mut() else {
            self.table = Some(table);
            return Ok(self);
        };
        for transition in table.iter() {
            existing.add_transition(
                transition.source(),
                transition.event_name(),
                transition.destination(),
                transition.action().cloned(),
            )?;
        }
        Ok(self)
    }

    /// Register a transition without an action.
    pub fn transition(
        self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
    ) -> Result<Self, FsmError> {
        self.register(source, event, destination, None)
    }

    /// Register a transition that runs `f` between exit and enter.
    pub fn transition_with_action<F>(
        self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
        f: F,
    ) -> Result<Self, FsmError>
    where
        F: Fn() -> Result<(), FsmError> + Send + Sync + 'static,
    {
        self.register(source, event, destination, Some(action(f)))
    }

    pub fn options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the state machine.
    ///
    /// Fails with [`FsmError::MissingStartState`] or
    /// [`FsmError::MissingTransitionTable`] if either was never supplied, and
    /// with [`FsmError::InvalidDefinition`] if state names are empty or shared
    /// by different states.
    pub fn build(self) -> Result<StateMachine<D>, FsmError> {
        let initial = self.initial.ok_or(FsmError::MissingStartState)?;
        let table = self.table.ok_or(FsmError::MissingTransitionTable)?;

        let violations = table.violations(Some(&initial));
        if !violations.is_empty() {
            return Err(FsmError::InvalidDefinition(violations));
        }

        Ok(StateMachine::with_options(initial, table, self.options))
    }

    fn register(
        mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
        action: Option<Action>,
    ) -> Result<Self, FsmError> {
        self.table
            .get_or_insert_with(TransitionTable::new)
            .add_transition(source, event, destination, action)?;
        Ok(self)
    }
}

impl<D> Default for StateMachineBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
