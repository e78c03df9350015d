//! Periodic execution of the health cycle.
//!
//! The scheduler is the outermost containment boundary: whatever a cycle
//! returns or panics with is reported as an alert and the loop goes on.
//! Only a shutdown request ends it.

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use hostwatch_monitor::error::panic_message;
use hostwatch_monitor::{Dispatcher, HealthCycle, MonitorError};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::error::DaemonError;
use crate::signal::SignalHandler;

const SOURCE: &str = "scheduler";

/// One unit of scheduled work.
#[async_trait]
pub trait Cycle: Send + Sync {
    async fn run_cycle(&self) -> Result<(), DaemonError>;
}

#[async_trait]
impl Cycle for HealthCycle {
    async fn run_cycle(&self) -> Result<(), DaemonError> {
        self.run().await;
        Ok(())
    }
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerState {
    Idle = 0,
    RunningCycle = 1,
    /// Terminal.
    ShuttingDown = 2,
}

impl From<u8> for SchedulerState {
    fn from(v: u8) -> Self {
        match v {
            1 => SchedulerState::RunningCycle,
            2 => SchedulerState::ShuttingDown,
            _ => SchedulerState::Idle,
        }
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerState::Idle => write!(f, "idle"),
            SchedulerState::RunningCycle => write!(f, "running_cycle"),
            SchedulerState::ShuttingDown => write!(f, "shutting_down"),
        }
    }
}

/// Runs a cycle immediately, then once per interval until shutdown.
///
/// The interval is measured from the start of one cycle to the start of the
/// next. A cycle that overruns is followed at once by the next one; missed
/// ticks are not replayed and cycles never overlap.
pub struct Scheduler<C> {
    cycle: C,
    dispatcher: Arc<Dispatcher>,
    interval: Duration,
    signals: SignalHandler,
    state: AtomicU8,
    cycles_run: AtomicU64,
    faults: AtomicU64,
}

impl<C: Cycle> Scheduler<C> {
    pub fn new(
        cycle: C,
        dispatcher: Arc<Dispatcher>,
        interval: Duration,
        signals: SignalHandler,
    ) -> Self {
        Self {
            cycle,
            dispatcher,
            interval,
            signals,
            state: AtomicU8::new(SchedulerState::Idle as u8),
            cycles_run: AtomicU64::new(0),
            faults: AtomicU64::new(0),
        }
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        SchedulerState::from(self.state.load(Ordering::SeqCst))
    }

    /// Number of cycles run so far, faulted ones included.
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run.load(Ordering::SeqCst)
    }

    /// Number of cycles that returned an error or panicked.
    pub fn faults(&self) -> u64 {
        self.faults.load(Ordering::SeqCst)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run until shutdown is requested.
    ///
    /// A cycle in progress is allowed to finish; the wait between cycles is
    /// cut short.
    pub async fn run(&self) -> Result<(), DaemonError> {
        let mut shutdown_rx = self.signals.subscribe();
        info!("Scheduler started (interval: {:?})", self.interval);

        while !self.signals.is_shutdown_requested() {
            let started = Instant::now();
            self.run_once().await;

            if self.signals.is_shutdown_requested() {
                break;
            }

            let next = started + self.interval;
            debug!("Next cycle in {:?}", next.saturating_duration_since(Instant::now()));

            tokio::select! {
                _ = tokio::time::sleep_until(next) => {}
                _ = shutdown_rx.recv() => break,
            }
        }

        self.state
            .store(SchedulerState::ShuttingDown as u8, Ordering::SeqCst);
        info!("Scheduler shutting down after {} cycle(s)", self.cycles_run());
        self.dispatcher.info(SOURCE, "Monitoring stopped.").await;
        Ok(())
    }

    /// Run a single contained cycle.
    pub async fn run_once(&self) {
        // ShuttingDown is terminal; only move out of Idle.
        let _ = self.state.compare_exchange(
            SchedulerState::Idle as u8,
            SchedulerState::RunningCycle as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );

        let outcome = AssertUnwindSafe(self.cycle.run_cycle()).catch_unwind().await;
        self.cycles_run.fetch_add(1, Ordering::SeqCst);

        let reason = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(panic_message(&*payload)),
        };

        if let Some(reason) = reason {
            self.faults.fetch_add(1, Ordering::SeqCst);
            error!("Health cycle failed: {}", MonitorError::UnexpectedCycleFault(reason.clone()));
            self.dispatcher
                .alert(SOURCE, "Unexpected Error", format!("Unexpected error: {}", reason))
                .await;
        }

        let _ = self.state.compare_exchange(
            SchedulerState::RunningCycle as u8,
            SchedulerState::Idle as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}
