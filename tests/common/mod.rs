//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use fsm_engine::{FsmError, Hook, State, StateRef};
use std::sync::{Arc, Mutex};

/// Setup tracing for tests
pub fn setup_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Ordered record of hook and action calls shared by several states.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// State that appends `"<hook>:<name>"` to a shared log on every hook call,
/// optionally failing one hook after logging it.
pub struct RecordingState {
    name: String,
    log: CallLog,
    fail_on: Option<Hook>,
}

impl RecordingState {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::clone(log),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, hook: Hook) -> Self {
        self.fail_on = Some(hook);
        self
    }

    pub fn into_ref<D>(self) -> StateRef<D> {
        Arc::new(self)
    }

    fn call(&self, hook: Hook) -> Result<(), FsmError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", hook, self.name));
        if self.fail_on == Some(hook) {
            return Err(FsmError::hook_failure(format!(
                "{} hook of '{}' failed",
                hook, self.name
            )));
        }
        Ok(())
    }
}

impl<D> State<D> for RecordingState {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_enter(&self, _data: &D) -> Result<(), FsmError> {
        self.call(Hook::Enter)
    }

    fn on_exit(&self, _data: &D) -> Result<(), FsmError> {
        self.call(Hook::Exit)
    }

    fn on_tick(&self, _data: &D) -> Result<(), FsmError> {
        self.call(Hook::Tick)
    }
}

/// Action that appends `"action:<label>"` to the log.
pub fn logging_action(label: &str, log: &CallLog) -> fsm_engine::Action {
    let log = Arc::clone(log);
    let entry = format!("action:{label}");
    fsm_engine::action(move || {
        log.lock().unwrap().push(entry.clone());
        Ok(())
    })
}
