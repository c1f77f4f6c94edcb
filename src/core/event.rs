//! Events dispatched into a state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named stimulus carrying an opaque payload.
///
/// Events are transient: the engine reads one during a single dispatch and
/// never keeps it afterwards.
///
/// # Example
///
/// ```rust
/// use fsm_engine::Event;
///
/// let start = Event::new("start", 42u32);
/// assert_eq!(start.name, "start");
/// assert_eq!(start.data, 42);
///
/// let stop: Event = Event::named("stop");
/// assert_eq!(stop.data, ());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<D = ()> {
    /// Name used to look up the transition
    pub name: String,
    /// Payload handed to every hook run by the dispatch
    pub data: D,
}

impl<D> Event<D> {
    pub fn new(name: impl Into<String>, data: D) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create an event with a default payload.
    pub fn named(name: impl Into<String>) -> Self
    where
        D: Default,
    {
        Self::new(name, D::default())
    }
}

impl<D: fmt::Debug> fmt::Display for Event<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event: {}, Event-Args: {:?}", self.name, self.data)
    }
}
