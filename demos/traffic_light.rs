//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic state machine.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Enter/exit hooks with an event payload
//! - A transition action
//! - Tick dispatch while a state is current
//!
//! Run with: cargo run --example traffic_light

use fsm_engine::{Event, FnState, FsmError, StateMachineBuilder, StateRef};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Seconds elapsed on the controller clock.
type Clock = u32;

fn lamp(colour: &'static str) -> StateRef<Clock> {
    FnState::new(colour)
        .describe(format!("{colour} lamp lit"))
        .with_enter(move |t: &Clock| {
            println!("  [{t:>3}s] {colour} on");
            Ok(())
        })
        .with_exit(move |t: &Clock| {
            println!("  [{t:>3}s] {colour} off");
            Ok(())
        })
        .with_tick(move |t: &Clock| {
            println!("  [{t:>3}s] ... still {colour}");
            Ok(())
        })
        .into_ref()
}

fn main() -> Result<(), FsmError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let red = lamp("Red");
    let green = lamp("Green");
    let yellow = lamp("Yellow");
    let cycles = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&cycles);

    let mut machine = StateMachineBuilder::new()
        .initial(Arc::clone(&red))
        .transition(&red, "next", &green)?
        .transition(&green, "next", &yellow)?
        .transition_with_action(&yellow, "next", &red, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })?
        .build()?;

    println!("Initial state: {}\n", machine.current_state());

    let mut clock: Clock = 0;
    for _ in 0..6 {
        machine.tick(&clock)?;
        clock += 10;
        machine.trigger_event(&Event::new("next", clock))?;
    }

    if let Err(err) = machine.trigger_event(&Event::new("emergency", clock)) {
        println!("\nUnhandled event: {err}");
    }

    println!("\nCompleted cycles: {}", cycles.load(Ordering::SeqCst));
    println!("Path: {}", machine.history().get_path().join(" -> "));

    println!("\n=== Example Complete ===");
    Ok(())
}
