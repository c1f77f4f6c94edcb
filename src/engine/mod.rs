//! The runtime side of the engine.
//!
//! - **State Machine**: holds the current state and dispatches events
//! - **Builder**: validated, fallible construction
//! - **Options**: what the machine records while it runs

mod builder;
mod machine;
mod options;

pub use builder::StateMachineBuilder;
pub use machine::StateMachine;
pub use options::{MachineOptions, DEFAULT_HISTORY_LIMIT};
