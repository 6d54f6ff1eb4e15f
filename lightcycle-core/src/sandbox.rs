//! Bounded execution of decision providers
//!
//! A [`Sandbox`] runs one provider call under a wall-clock budget and
//! classifies whatever goes wrong into an [`AgentFault`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::agent::DecisionProvider;
use crate::board::Direction;
use crate::error::{AgentFault, InvalidOutput};
use crate::view::BoardView;

/// Runs a provider call with a hard deadline
pub trait Sandbox: Send + Sync {
    fn call(
        &self,
        provider: &Arc<dyn DecisionProvider>,
        view: BoardView,
        budget: Duration,
    ) -> Result<Direction, AgentFault>;
}

/// Runs every call on its own worker thread and stops waiting at the deadline.
///
/// A worker that overruns is abandoned, not killed: it keeps running in the
/// background and its late answer is discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSandbox;

impl Sandbox for ThreadSandbox {
    fn call(
        &self,
        provider: &Arc<dyn DecisionProvider>,
        view: BoardView,
        budget: Duration,
    ) -> Result<Direction, AgentFault> {
        let (tx, rx) = mpsc::sync_channel(1);
        let provider = Arc::clone(provider);

        let spawned = thread::Builder::new()
            .name("lightcycle-agent".to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| provider.decide(&view)));
                // Receiver is gone if we already timed out
                let _ = tx.send(outcome.map_err(panic_message));
            });

        if let Err(e) = spawned {
            return Err(AgentFault::Runtime(format!("failed to spawn evaluation thread: {e}")));
        }

        match rx.recv_timeout(budget) {
            Ok(Ok(Ok(direction))) => Ok(direction),
            Ok(Ok(Err(err))) => Err(classify(err)),
            Ok(Err(msg)) => Err(AgentFault::Runtime(msg)),
            Err(RecvTimeoutError::Timeout) => Err(AgentFault::Timeout { budget }),
            Err(RecvTimeoutError::Disconnected) => Err(AgentFault::Runtime(
                "evaluation thread exited without a result".to_string(),
            )),
        }
    }
}

/// Runs the call on the current thread and checks the elapsed time after
/// it returns. Cannot preempt a provider that never returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineSandbox;

impl Sandbox for InlineSandbox {
    fn call(
        &self,
        provider: &Arc<dyn DecisionProvider>,
        view: BoardView,
        budget: Duration,
    ) -> Result<Direction, AgentFault> {
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| provider.decide(&view)));
        let elapsed = start.elapsed();

        match outcome {
            Err(payload) => Err(AgentFault::Runtime(panic_message(payload))),
            Ok(_) if elapsed > budget => Err(AgentFault::Timeout { budget }),
            Ok(result) => result.map_err(classify),
        }
    }
}

/// Map a provider error onto a fault kind
fn classify(err: anyhow::Error) -> AgentFault {
    match err.downcast_ref::<InvalidOutput>() {
        Some(InvalidOutput(raw)) => AgentFault::InvalidOutput(raw.clone()),
        None => AgentFault::Runtime(format!("{err:#}")),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
