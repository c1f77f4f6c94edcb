//! fsm-engine: a finite state machine engine with lifecycle hooks
//!
//! A machine holds exactly one current state and a table of transitions
//! keyed by `(event name, source state name)`. Dispatching an event looks the
//! transition up, runs the source's exit hook, the transition's action, and
//! the destination's enter hook in that order, and only then moves the
//! machine to the destination.
//!
//! # Core Concepts
//!
//! - **State**: named node with `on_enter` / `on_exit` / `on_tick` hooks via the `State` trait
//! - **Event**: named stimulus carrying a payload handed to every hook
//! - **Transition**: immutable edge with an optional action
//! - **TransitionTable**: registry resolving `(event, state)` to a transition
//! - **StateMachine**: current state plus table; the dispatch entry point
//!
//! # Example
//!
//! ```rust
//! use fsm_engine::{action, Event, FnState, FsmError, StateMachine, StateRef, TransitionTable};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let idle: StateRef = FnState::passive("idle").into_ref();
//! let running: StateRef = FnState::passive("running").into_ref();
//! let stopped: StateRef = FnState::passive("stopped").into_ref();
//!
//! let starts = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&starts);
//!
//! let mut table = TransitionTable::new();
//! table.add_transition(
//!     &idle,
//!     "start",
//!     &running,
//!     Some(action(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     })),
//! )?;
//! table.add_transition(&running, "stop", &stopped, None)?;
//!
//! let mut machine = StateMachine::new(idle, table);
//! machine.trigger_event(&Event::named("start"))?;
//! assert!(machine.is_in("running"));
//! assert_eq!(starts.load(Ordering::SeqCst), 1);
//!
//! machine.trigger_event(&Event::named("stop"))?;
//! let err = machine.trigger_event(&Event::named("start")).unwrap_err();
//! assert!(matches!(err, FsmError::NoTransitionForState { .. }));
//! assert!(machine.is_in("stopped"));
//! # Ok::<(), FsmError>(())
//! ```

pub mod core;
pub mod engine;
pub mod error;
pub mod transitions;

// Re-export commonly used types
pub use crate::core::{Event, FnState, Hook, State, StateHistory, StateRef, StateTransition};
pub use engine::{MachineOptions, StateMachine, StateMachineBuilder, DEFAULT_HISTORY_LIMIT};
pub use error::{BoxError, DefinitionViolation, FsmError};
pub use transitions::{action, Action, Transition, TransitionId, TransitionTable};
