//! The `State` trait and its lifecycle hooks.
//!
//! A state is a named node with three hooks: `on_enter`, `on_exit` and
//! `on_tick`. Hooks a state does not override fail loudly with
//! [`FsmError::NotImplemented`] so that a missing hook shows up during
//! development instead of being silently skipped.

use crate::error::FsmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle point at which the engine calls into host code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
    Enter,
    Exit,
    Tick,
    Action,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::Enter => "enter",
            Hook::Exit => "exit",
            Hook::Tick => "tick",
            Hook::Action => "action",
        };
        f.write_str(name)
    }
}

/// Trait for state machine states.
///
/// `D` is the payload type carried by events. States are identified by
/// [`name`](State::name): two values with the same name are the same state as
/// far as transition lookup is concerned, so names must be unique within one
/// machine.
///
/// Hooks take `&self`; states that need to mutate something on entry or exit
/// use interior mutability.
///
/// # Example
///
/// ```rust
/// use fsm_engine::{FsmError, State};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// struct Counting {
///     entries: AtomicUsize,
/// }
///
/// impl State<String> for Counting {
///     fn name(&self) -> &str {
///         "counting"
///     }
///
///     fn on_enter(&self, _data: &String) -> Result<(), FsmError> {
///         self.entries.fetch_add(1, Ordering::SeqCst);
///         Ok(())
///     }
///
///     fn on_exit(&self, _data: &String) -> Result<(), FsmError> {
///         Ok(())
///     }
/// }
///
/// let state = Counting { entries: AtomicUsize::new(0) };
/// state.on_enter(&"payload".to_string()).unwrap();
/// assert_eq!(state.entries.load(Ordering::SeqCst), 1);
/// assert!(matches!(
///     state.on_tick(&String::new()),
///     Err(FsmError::NotImplemented { .. })
/// ));
/// ```
pub trait State<D = ()>: Send + Sync {
    /// Unique name identifying this state.
    fn name(&self) -> &str;

    /// Free-text description. Defaults to empty.
    fn description(&self) -> &str {
        ""
    }

    /// Called once each time a transition enters this state, after the
    /// previous state's exit hook and the transition action.
    fn on_enter(&self, _data: &D) -> Result<(), FsmError> {
        Err(FsmError::NotImplemented {
            hook: Hook::Enter,
            state: self.name().to_string(),
        })
    }

    /// Called once each time a transition leaves this state, before the
    /// transition action and the destination's enter hook.
    fn on_exit(&self, _data: &D) -> Result<(), FsmError> {
        Err(FsmError::NotImplemented {
            hook: Hook::Exit,
            state: self.name().to_string(),
        })
    }

    /// Called on explicit request while this state is current. Never changes
    /// the current state.
    fn on_tick(&self, _data: &D) -> Result<(), FsmError> {
        Err(FsmError::NotImplemented {
            hook: Hook::Tick,
            state: self.name().to_string(),
        })
    }
}

/// Shared handle to a state.
///
/// The caller keeps its own handle; tables and machines hold clones and never
/// create or destroy states themselves.
pub type StateRef<D = ()> = Arc<dyn State<D>>;

impl<D> fmt::Debug for dyn State<D> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name())
            .field("description", &self.description())
            .finish()
    }
}

impl<D> fmt::Display for dyn State<D> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {}, Description: {}",
            self.name(),
            self.description()
        )
    }
}

type HookFn<D> = Box<dyn Fn(&D) -> Result<(), FsmError> + Send + Sync>;

/// A state whose hooks are plain closures supplied at construction.
///
/// Hooks that are never supplied behave like the trait defaults and return
/// [`FsmError::NotImplemented`].
///
/// # Example
///
/// ```rust
/// use fsm_engine::{FnState, State, StateRef};
///
/// let running: StateRef<u32> = FnState::new("running")
///     .describe("motor is spinning")
///     .with_enter(|rpm: &u32| {
///         assert!(*rpm > 0);
///         Ok(())
///     })
///     .with_exit(|_| Ok(()))
///     .into_ref();
///
/// assert_eq!(running.name(), "running");
/// assert!(running.on_enter(&1200).is_ok());
/// ```
pub struct FnState<D = ()> {
    name: String,
    description: String,
    enter: Option<HookFn<D>>,
    exit: Option<HookFn<D>>,
    tick: Option<HookFn<D>>,
}

impl<D> FnState<D> {
    /// Create a state with no hooks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            enter: None,
            exit: None,
            tick: None,
        }
    }

    /// Create a state whose enter and exit hooks succeed without doing anything.
    pub fn passive(name: impl Into<String>) -> Self {
        Self::new(name).with_enter(|_| Ok(())).with_exit(|_| Ok(()))
    }

    /// Set the free-text description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the enter hook.
    pub fn with_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(&D) -> Result<(), FsmError> + Send + Sync + 'static,
    {
        self.enter = Some(Box::new(hook));
        self
    }

    /// Set the exit hook.
    pub fn with_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(&D) -> Result<(), FsmError> + Send + Sync + 'static,
    {
        self.exit = Some(Box::new(hook));
        self
    }

    /// Set the tick hook.
    pub fn with_tick<F>(mut self, hook: F) -> Self
    where
        F: Fn(&D) -> Result<(), FsmError> + Send + Sync + 'static,
    {
        self.tick = Some(Box::new(hook));
        self
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> StateRef<D>
    where
        D: 'static,
    {
        Arc::new(self)
    }
}

impl<D> State<D> for FnState<D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn on_enter(&self, data: &D) -> Result<(), FsmError> {
        match &self.enter {
            Some(hook) => hook(data),
            None => Err(FsmError::NotImplemented {
                hook: Hook::Enter,
                state: self.name.clone(),
            }),
        }
    }

    fn on_exit(&self, data: &D) -> Result<(), FsmError> {
        match &self.exit {
            Some(hook) => hook(data),
            None => Err(FsmError::NotImplemented {
                hook: Hook::Exit,
                state: self.name.clone(),
            }),
        }
    }

    fn on_tick(&self, data: &D) -> Result<(), FsmError> {
        match &self.tick {
            Some(hook) => hook(data),
            None => Err(FsmError::NotImplemented {
                hook: Hook::Tick,
                state: self.name.clone(),
            }),
        }
    }
}

impl<D> fmt::Debug for FnState<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnState")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("enter", &self.enter.is_some())
            .field("exit", &self.exit.is_some())
            .field("tick", &self.tick.is_some())
            .finish()
    }
}
