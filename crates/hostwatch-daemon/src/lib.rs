//! # hostwatch Daemon
//!
//! Long-running side of the monitor.
//!
//! ## Features
//!
//! - Periodic scheduling of health cycles with fault containment
//! - Signal handling (SIGTERM/SIGINT, Ctrl+C elsewhere) for graceful shutdown
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hostwatch_daemon::{Scheduler, SignalHandler};
//!
//! let signals = SignalHandler::new();
//! signals.setup_os_signals().await?;
//! let scheduler = Scheduler::new(cycle, dispatcher, config.check_interval(), signals);
//! scheduler.run().await?;
//! ```

pub mod error;
pub mod scheduler;
pub mod signal;

pub use error::DaemonError;
pub use scheduler::{Cycle, Scheduler, SchedulerState};
pub use signal::SignalHandler;
