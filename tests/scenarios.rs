//! End-to-end dispatch scenarios.

mod common;

use common::{calls, logging_action, new_log, setup_tracing, RecordingState};
use fsm_engine::{
    action, Event, FnState, FsmError, Hook, MachineOptions, StateMachine, StateMachineBuilder,
    StateRef, TransitionTable,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn start_stop_scenario() {
    setup_tracing();

    let idle: StateRef = FnState::passive("idle").into_ref();
    let running: StateRef = FnState::passive("running").into_ref();
    let stopped: StateRef = FnState::passive("stopped").into_ref();
    let counter = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&counter);

    let mut machine = StateMachineBuilder::new()
        .initial(Arc::clone(&idle))
        .transition_with_action(&idle, "start", &running, move || {
            sink.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap()
        .transition(&running, "stop", &stopped)
        .unwrap()
        .build()
        .unwrap();

    let current = machine.trigger_event(&Event::named("start")).unwrap();
    assert!(Arc::ptr_eq(&current, &running));
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let current = machine.trigger_event(&Event::named("stop")).unwrap();
    assert!(Arc::ptr_eq(&current, &stopped));

    let err = machine.trigger_event(&Event::named("start")).unwrap_err();
    assert!(matches!(
        err,
        FsmError::NoTransitionForState { ref event, ref state }
            if event == "start" && state == "stopped"
    ));
    assert!(Arc::ptr_eq(machine.current_state(), &stopped));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_table_rejects_every_event() {
    setup_tracing();

    for start in ["idle", "running", "stopped"] {
        let start_state: StateRef = FnState::passive(start).into_ref();
        let mut machine = StateMachine::new(start_state, TransitionTable::new());

        for event in ["start", "stop", ""] {
            let err = machine.trigger_event(&Event::named(event)).unwrap_err();
            assert!(matches!(err, FsmError::NoTransitionForEvent { .. }));
            assert!(machine.is_in(start));
        }
    }
}

#[test]
fn hooks_run_exit_action_enter_exactly_once() {
    setup_tracing();
    let log = new_log();
    let idle: StateRef = RecordingState::new("idle", &log).into_ref();
    let running: StateRef = RecordingState::new("running", &log).into_ref();

    let mut table = TransitionTable::new();
    table
        .add_transition(&idle, "start", &running, Some(logging_action("start", &log)))
        .unwrap();
    let mut machine = StateMachine::new(Arc::clone(&idle), table);

    machine.trigger_event(&Event::new("start", ())).unwrap();

    assert_eq!(calls(&log), vec!["exit:idle", "action:start", "enter:running"]);
}

#[test]
fn self_transition_runs_both_hooks() {
    setup_tracing();
    let log = new_log();
    let idle: StateRef = RecordingState::new("idle", &log).into_ref();

    let mut table = TransitionTable::new();
    table.add_transition(&idle, "poke", &idle, None).unwrap();
    let mut machine = StateMachine::new(Arc::clone(&idle), table);

    let current = machine.trigger_event(&Event::named("poke")).unwrap();

    assert!(Arc::ptr_eq(&current, &idle));
    assert_eq!(calls(&log), vec!["exit:idle", "enter:idle"]);
    assert!(machine.history().last().unwrap().is_self_transition());
}

#[test]
fn exit_failure_aborts_before_anything_else_runs() {
    setup_tracing();
    let log = new_log();
    let idle: StateRef = RecordingState::new("idle", &log)
        .failing_on(Hook::Exit)
        .into_ref();
    let running: StateRef = RecordingState::new("running", &log).into_ref();

    let mut table = TransitionTable::new();
    table
        .add_transition(&idle, "start", &running, Some(logging_action("start", &log)))
        .unwrap();
    let mut machine = StateMachine::new(Arc::clone(&idle), table);

    let err = machine.trigger_event(&Event::named("start")).unwrap_err();

    assert!(matches!(err, FsmError::HookFailure(_)));
    assert_eq!(calls(&log), vec!["exit:idle"]);
    assert!(machine.is_in("idle"));
    assert!(machine.history().is_empty());
}

#[test]
fn action_failure_leaves_source_current_after_exit() {
    setup_tracing();
    let log = new_log();
    let idle: StateRef = RecordingState::new("idle", &log).into_ref();
    let running: StateRef = RecordingState::new("running", &log).into_ref();

    let mut table = TransitionTable::new();
    table
        .add_transition(
            &idle,
            "start",
            &running,
            Some(action(|| Err(FsmError::hook_failure("pump jammed")))),
        )
        .unwrap();
    let mut machine = StateMachine::new(Arc::clone(&idle), table);

    let err = machine.trigger_event(&Event::named("start")).unwrap_err();

    assert_eq!(err.to_string(), "Hook failed: pump jammed");
    assert_eq!(calls(&log), vec!["exit:idle"]);
    assert!(Arc::ptr_eq(machine.current_state(), &idle));
}

#[test]
fn enter_failure_leaves_source_current() {
    setup_tracing();
    let log = new_log();
    let idle: StateRef = RecordingState::new("idle", &log).into_ref();
    let running: StateRef = RecordingState::new("running", &log)
        .failing_on(Hook::Enter)
        .into_ref();

    let mut table = TransitionTable::new();
    table
        .add_transition(&idle, "start", &running, Some(logging_action("start", &log)))
        .unwrap();
    let mut machine = StateMachine::new(Arc::clone(&idle), table);

    let err = machine.trigger_event(&Event::named("start")).unwrap_err();

    assert!(matches!(err, FsmError::HookFailure(_)));
    assert_eq!(calls(&log), vec!["exit:idle", "action:start", "enter:running"]);
    assert!(machine.is_in("idle"));
    assert!(machine.history().is_empty());

    // the failed attempt can simply be retried
    let err = machine.trigger_event(&Event::named("start")).unwrap_err();
    assert!(matches!(err, FsmError::HookFailure(_)));
    assert_eq!(calls(&log).len(), 6);
}

#[test]
fn unimplemented_hook_surfaces_to_caller() {
    setup_tracing();
    let bare: StateRef = FnState::new("bare").into_ref();
    let passive: StateRef = FnState::passive("passive").into_ref();

    let mut table = TransitionTable::new();
    table.add_transition(&bare, "go", &passive, None).unwrap();
    let mut machine = StateMachine::new(Arc::clone(&bare), table);

    let err = machine.trigger_event(&Event::named("go")).unwrap_err();

    assert!(matches!(
        err,
        FsmError::NotImplemented { hook: Hook::Exit, ref state } if state == "bare"
    ));
    assert!(machine.is_in("bare"));
}

#[test]
fn event_payload_reaches_every_hook() {
    setup_tracing();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let on_exit = Arc::clone(&seen);
    let on_enter = Arc::clone(&seen);

    let closed: StateRef<String> = FnState::new("closed")
        .with_exit(move |who: &String| {
            on_exit.lock().unwrap().push(format!("leaving closed for {who}"));
            Ok(())
        })
        .into_ref();
    let open: StateRef<String> = FnState::new("open")
        .with_enter(move |who: &String| {
            on_enter.lock().unwrap().push(format!("opened by {who}"));
            Ok(())
        })
        .into_ref();

    let mut table = TransitionTable::new();
    table.add_transition(&closed, "open", &open, None).unwrap();
    let mut machine = StateMachine::new(closed, table);

    machine
        .trigger_event(&Event::new("open", "alice".to_string()))
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["leaving closed for alice", "opened by alice"]
    );
}

#[test]
fn tick_calls_current_state_only() {
    setup_tracing();
    let log = new_log();
    let idle: StateRef = RecordingState::new("idle", &log).into_ref();
    let running: StateRef = RecordingState::new("running", &log).into_ref();

    let mut table = TransitionTable::new();
    table.add_transition(&idle, "start", &running, None).unwrap();
    let mut machine = StateMachine::new(Arc::clone(&idle), table);

    machine.tick(&()).unwrap();
    machine.trigger_event(&Event::named("start")).unwrap();
    machine.tick(&()).unwrap();
    machine.tick(&()).unwrap();

    assert_eq!(
        calls(&log),
        vec!["tick:idle", "exit:idle", "enter:running", "tick:running", "tick:running"]
    );
    assert!(machine.is_in("running"));
    assert_eq!(machine.history().len(), 1);
}

#[test]
fn tick_failure_does_not_move_machine() {
    setup_tracing();
    let log = new_log();
    let idle: StateRef = RecordingState::new("idle", &log)
        .failing_on(Hook::Tick)
        .into_ref();
    let machine = StateMachine::new(idle, TransitionTable::new());

    assert!(matches!(machine.tick(&()), Err(FsmError::HookFailure(_))));
    assert!(machine.is_in("idle"));
}

#[test]
fn replaced_transition_is_used_on_next_dispatch() {
    setup_tracing();
    let idle: StateRef = FnState::passive("idle").into_ref();
    let running: StateRef = FnState::passive("running").into_ref();
    let paused: StateRef = FnState::passive("paused").into_ref();

    let mut table = TransitionTable::new();
    table.add_transition(&idle, "start", &running, None).unwrap();
    let mut machine = StateMachine::new(Arc::clone(&idle), table);

    let (_, previous) = machine.replace_transition(&idle, "start", &paused, None);
    assert_eq!(previous.unwrap().destination().name(), "running");

    machine.trigger_event(&Event::named("start")).unwrap();
    assert!(machine.is_in("paused"));
}

#[test]
fn machine_can_be_shared_behind_a_mutex() {
    setup_tracing();
    let idle: StateRef = FnState::passive("idle").into_ref();
    let mut table = TransitionTable::new();
    table.add_transition(&idle, "poke", &idle, None).unwrap();
    let machine = Arc::new(Mutex::new(StateMachine::with_options(
        Arc::clone(&idle),
        table,
        MachineOptions::new().unbounded_history(),
    )));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let machine = Arc::clone(&machine);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    machine
                        .lock()
                        .unwrap()
                        .trigger_event(&Event::named("poke"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(machine.lock().unwrap().history().len(), 100);
}
