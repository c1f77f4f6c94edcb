//! Registry resolving (event, source state) pairs to transitions.

use crate::core::StateRef;
use crate::error::{DefinitionViolation, FsmError};
use crate::transitions::transition::{Action, Transition, TransitionId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Transition registry keyed by event name, then by source state name.
///
/// Transitions live in an arena addressed by [`TransitionId`]; the two-level
/// name index maps `event -> source -> id`. At most one transition exists per
/// (event, source) pair. Slots freed by removal or replacement are reused,
/// and a generation counter keeps stale ids from resolving to the new
/// occupant. The table never creates or drops states, it only
/// holds the handles it was given.
///
/// # Example
///
/// ```rust
/// use fsm_engine::{FnState, FsmError, StateRef, TransitionTable};
///
/// let idle: StateRef = FnState::passive("idle").into_ref();
/// let running: StateRef = FnState::passive("running").into_ref();
///
/// let mut table = TransitionTable::new();
/// let id = table.add_transition(&idle, "start", &running, None).unwrap();
///
/// assert_eq!(table.get_transition(&idle, "start").unwrap().id(), id);
/// assert!(matches!(
///     table.get_transition(&running, "start"),
///     Err(FsmError::NoTransitionForState { .. })
/// ));
/// assert!(matches!(
///     table.get_transition(&idle, "strat"),
///     Err(FsmError::NoTransitionForEvent { .. })
/// ));
/// ```
pub struct TransitionTable<D = ()> {
    slots: Vec<Slot<D>>,
    free: Vec<usize>,
    index: HashMap<String, HashMap<String, TransitionId>>,
}

struct Slot<D> {
    generation: u32,
    transition: Option<Transition<D>>,
}

impl<D> TransitionTable<D> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a transition from `source` to `destination` on `event`.
    ///
    /// Fails with [`FsmError::DuplicateTransition`] if `(event, source)` is
    /// already taken; the table is left unchanged in that case. Use
    /// [`replace_transition`](Self::replace_transition) to overwrite.
    pub fn add_transition(
        &mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
        action: Option<Action>,
    ) -> Result<TransitionId, FsmError> {
        if self.lookup_id(source.name(), event).is_some() {
            return Err(FsmError::DuplicateTransition {
                event: event.to_string(),
                state: source.name().to_string(),
            });
        }
        Ok(self.insert(source, event, destination, action))
    }

    /// Register a transition, displacing any transition already registered
    /// for `(event, source)`.
    ///
    /// Returns the new handle and the displaced transition, if there was one.
    pub fn replace_transition(
        &mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
        action: Option<Action>,
    ) -> (TransitionId, Option<Transition<D>>) {
        let previous = self
            .lookup_id(source.name(), event)
            .and_then(|id| self.take(id));
        if let Some(previous) = &previous {
            debug!(
                event,
                from = source.name(),
                replaced = previous.destination().name(),
                "replacing transition"
            );
        }
        let id = self.insert(source, event, destination, action);
        (id, previous)
    }

    /// Remove the transition registered for `(event, source)`.
    ///
    /// `destination` does not take part in the lookup; it is only compared
    /// against the stored destination for diagnostics. Fails with
    /// [`FsmError::TransitionNotFound`] if nothing is registered.
    pub fn remove_transition(
        &mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
    ) -> Result<Transition<D>, FsmError> {
        let removed = self
            .lookup_id(source.name(), event)
            .and_then(|id| self.take(id))
            .ok_or_else(|| FsmError::TransitionNotFound {
                event: event.to_string(),
                state: source.name().to_string(),
            })?;

        if removed.destination().name() != destination.name() {
            debug!(
                event,
                from = source.name(),
                stored = removed.destination().name(),
                given = destination.name(),
                "removed transition has a different destination than requested"
            );
        }
        debug!(event, from = source.name(), "removed transition");
        Ok(removed)
    }

    /// Look up the transition for `event` while `state` is current.
    ///
    /// An event with no transitions at all fails with
    /// [`FsmError::NoTransitionForEvent`]; an event that is known but not
    /// handled in `state` fails with [`FsmError::NoTransitionForState`].
    pub fn get_transition(
        &self,
        state: &StateRef<D>,
        event: &str,
    ) -> Result<&Transition<D>, FsmError> {
        let by_source = self
            .index
            .get(event)
            .ok_or_else(|| FsmError::NoTransitionForEvent {
                event: event.to_string(),
            })?;

        by_source
            .get(state.name())
            .and_then(|id| self.get(*id))
            .ok_or_else(|| FsmError::NoTransitionForState {
                event: event.to_string(),
                state: state.name().to_string(),
            })
    }

    /// Resolve a handle returned by `add_transition`.
    ///
    /// A handle whose transition was removed or replaced resolves to `None`,
    /// even after its slot has been reused.
    pub fn get(&self, id: TransitionId) -> Option<&Transition<D>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.transition.as_ref())
    }

    /// True if `event` has a transition out of `state`.
    pub fn contains(&self, state: &StateRef<D>, event: &str) -> bool {
        self.lookup_id(state.name(), event).is_some()
    }

    /// Number of registered transitions.
    pub fn len(&self) -> usize {
        self.index.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All registered transitions, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<D>> {
        self.slots.iter().filter_map(|slot| slot.transition.as_ref())
    }

    /// Names of all events with at least one transition.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Check that every state name maps to exactly one state handle and that
    /// no name is empty. All problems are reported at once.
    pub fn validate(&self) -> Result<(), FsmError> {
        let violations = self.violations(None);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(FsmError::InvalidDefinition(violations))
        }
    }

    /// Collect definition problems, treating `extra` as one more state in use.
    pub(crate) fn violations(&self, extra: Option<&StateRef<D>>) -> Vec<DefinitionViolation> {
        let mut violations = Vec::new();
        let mut seen: HashMap<&str, &StateRef<D>> = HashMap::new();
        let mut reported: HashSet<&str> = HashSet::new();
        let mut empty_state_reported = false;

        let states = extra
            .into_iter()
            .chain(self.iter().flat_map(|t| [t.source(), t.destination()]));

        for state in states {
            let name = state.name();
            if name.is_empty() {
                if !empty_state_reported {
                    violations.push(DefinitionViolation::EmptyStateName);
                    empty_state_reported = true;
                }
                continue;
            }
            match seen.get(name) {
                Some(known) if !Arc::ptr_eq(*known, state) => {
                    if reported.insert(name) {
                        violations.push(DefinitionViolation::ConflictingStateName {
                            name: name.to_string(),
                        });
                    }
                }
                Some(_) => {}
                None => {
                    seen.insert(name, state);
                }
            }
        }

        for transition in self.iter() {
            if transition.event_name().is_empty() {
                violations.push(DefinitionViolation::EmptyEventName {
                    state: transition.source().name().to_string(),
                });
            }
        }

        violations
    }

    fn lookup_id(&self, state: &str, event: &str) -> Option<TransitionId> {
        self.index
            .get(event)
            .and_then(|by_source| by_source.get(state))
            .copied()
    }

    fn insert(
        &mut self,
        source: &StateRef<D>,
        event: &str,
        destination: &StateRef<D>,
        action: Option<Action>,
    ) -> TransitionId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    transition: None,
                });
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        let id = TransitionId::new(index, slot.generation);
        slot.transition = Some(Transition::new(
            id,
            Arc::clone(source),
            event.to_string(),
            Arc::clone(destination),
            action,
        ));
        self.index
            .entry(event.to_string())
            .or_default()
            .insert(source.name().to_string(), id);

        debug!(
            event,
            from = source.name(),
            to = destination.name(),
            slot = id.index,
            generation = id.generation,
            "registered transition"
        );
        id
    }

    fn take(&mut self, id: TransitionId) -> Option<Transition<D>> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?;
        let transition = slot.transition.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        let event = transition.event_name();
        if let Some(by_source) = self.index.get_mut(event) {
            by_source.remove(transition.source().name());
            if by_source.is_empty() {
                self.index.remove(event);
            }
        }
        Some(transition)
    }
}

impl<D> Default for TransitionTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for Slot<D> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            transition: self.transition.clone(),
        }
    }
}

impl<D> Clone for TransitionTable<D> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            free: self.free.clone(),
            index: self.index.clone(),
        }
    }
}

impl<D> fmt::Debug for TransitionTable<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
