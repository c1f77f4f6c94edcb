//! Transitions between two states with an optional side-effecting action.

use crate::core::{Hook, StateRef};
use crate::error::FsmError;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Side effect run between the source's exit hook and the destination's
/// enter hook.
pub type Action = Arc<dyn Fn() -> Result<(), FsmError> + Send + Sync>;

/// Wrap a closure as an [`Action`].
///
/// # Example
///
/// ```rust
/// use fsm_engine::action;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let counter = Arc::new(AtomicUsize::new(0));
/// let sink = Arc::clone(&counter);
/// let increment = action(move || {
///     sink.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// });
///
/// increment().unwrap();
/// assert_eq!(counter.load(Ordering::SeqCst), 1);
/// ```
pub fn action<F>(f: F) -> Action
where
    F: Fn() -> Result<(), FsmError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Stable handle of a transition inside its table.
///
/// The slot index may be reused once its transition is removed, but the
/// generation differs, so an old handle never resolves to a different
/// transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl TransitionId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Arena slot the transition occupies.
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// An immutable edge from a source state to a destination state, taken when
/// the named event arrives while the source state is current.
///
/// Source and destination may be the same state.
pub struct Transition<D = ()> {
    id: TransitionId,
    source: StateRef<D>,
    destination: StateRef<D>,
    event_name: String,
    action: Option<Action>,
}

impl<D> Transition<D> {
    pub(crate) fn new(
        id: TransitionId,
        source: StateRef<D>,
        event_name: String,
        destination: StateRef<D>,
        action: Option<Action>,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            event_name,
            action,
        }
    }

    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn source(&self) -> &StateRef<D> {
        &self.source
    }

    pub fn destination(&self) -> &StateRef<D> {
        &self.destination
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub(crate) fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn is_self_transition(&self) -> bool {
        self.source.name() == self.destination.name()
    }

    /// Run the transition: exit the source, run the action, enter the
    /// destination, and return the destination.
    ///
    /// The first failing step stops the sequence and its error is returned
    /// unchanged. If the exit hook succeeded before the failure, the source
    /// state has already been exited; callers keep the source as current
    /// regardless, so hooks must tolerate being exited without a matching
    /// re-entry.
    pub fn execute(&self, data: &D) -> Result<StateRef<D>, FsmError> {
        trace!(state = self.source.name(), hook = %Hook::Exit, "running hook");
        self.source.on_exit(data)?;

        if let Some(action) = &self.action {
            trace!(event = %self.event_name, hook = %Hook::Action, "running action");
            action().inspect_err(|err| self.warn_half_exited(Hook::Action, err))?;
        }

        trace!(state = self.destination.name(), hook = %Hook::Enter, "running hook");
        self.destination
            .on_enter(data)
            .inspect_err(|err| self.warn_half_exited(Hook::Enter, err))?;

        Ok(Arc::clone(&self.destination))
    }

    fn warn_half_exited(&self, hook: Hook, err: &FsmError) {
        warn!(
            event = %self.event_name,
            from = self.source.name(),
            to = self.destination.name(),
            %hook,
            error = %err,
            "transition failed after source state was exited"
        );
    }
}

impl<D> Clone for Transition<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            source: Arc::clone(&self.source),
            destination: Arc::clone(&self.destination),
            event_name: self.event_name.clone(),
            action: self.action.clone(),
        }
    }
}

impl<D> fmt::Debug for Transition<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("source", &self.source.name())
            .field("event", &self.event_name)
            .field("destination", &self.destination.name())
            .field("action", &self.action.is_some())
            .finish()
    }
}

impl<D> fmt::Display for Transition<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {} on '{}', Action: {}",
            self.source.name(),
            self.destination.name(),
            self.event_name,
            if self.action.is_some() { "yes" } else { "none" }
        )
    }
}
