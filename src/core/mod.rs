//! Core value types of the engine.
//!
//! This module contains the leaves of the model:
//! - States and their lifecycle hooks via the `State` trait
//! - Events carrying a name and payload
//! - History of completed transitions

mod event;
mod history;
mod state;

pub use event::Event;
pub use history::{StateHistory, StateTransition};
pub use state::{FnState, Hook, State, StateRef};
