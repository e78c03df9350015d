//! Shutdown signalling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::DaemonError;

/// Carries the shutdown request from the OS (or a test) to the scheduler.
///
/// The flag is sticky: once set it stays set, so a request made before
/// anyone subscribes is still observed.
#[derive(Clone)]
pub struct SignalHandler {
    sender: broadcast::Sender<()>,
    shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(4);
        Self {
            sender,
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to shutdown notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    /// Request shutdown.
    pub fn request_shutdown(&self) {
        debug!("Shutdown requested");
        self.shutdown_requested.store(true, Ordering::SeqCst);
        let _ = self.sender.send(());
    }

    /// Check if shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }

    /// Install SIGTERM and SIGINT handlers.
    #[cfg(unix)]
    pub async fn setup_os_signals(&self) -> Result<(), DaemonError> {
        use tokio::signal::unix::{signal, SignalKind};

        for (kind, name) in [
            (SignalKind::terminate(), "SIGTERM"),
            (SignalKind::interrupt(), "SIGINT"),
        ] {
            let mut stream = signal(kind).map_err(|e| DaemonError::SignalSetup(e.to_string()))?;
            let handler = self.clone();
            tokio::spawn(async move {
                while stream.recv().await.is_some() {
                    info!("Received {}", name);
                    handler.request_shutdown();
                }
            });
        }

        info!("OS signal handlers installed (SIGTERM, SIGINT)");
        Ok(())
    }

    /// Install the Ctrl+C handler.
    #[cfg(not(unix))]
    pub async fn setup_os_signals(&self) -> Result<(), DaemonError> {
        let handler = self.clone();

        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received Ctrl+C");
                handler.request_shutdown();
            }
        });

        info!("OS signal handlers installed (Ctrl+C only)");
        Ok(())
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}
