//! Log retention sweep.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use hostwatch_config::Config;
use tracing::{debug, info, warn};

use crate::error::MonitorError;

/// Outcome of one sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Files that were deleted.
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted or inspected.
    pub failed: usize,
}

/// Deletes log files older than the retention period.
///
/// Best effort: every failure is logged and counted, never returned.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    log_dir: PathBuf,
    retention: Duration,
}

impl RetentionSweeper {
    pub fn new(log_dir: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            log_dir: log_dir.into(),
            retention,
        }
    }

    /// Build from config. The retention period is fixed from here on.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.log_directory.clone(), config.retention_period())
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Sweep against the current time.
    pub fn sweep(&self) -> SweepReport {
        self.sweep_at(SystemTime::now())
    }

    /// Sweep as if the current time were `now`.
    pub fn sweep_at(&self, now: SystemTime) -> SweepReport {
        self.sweep_with(now, Self::remove)
    }

    fn sweep_with<F>(&self, now: SystemTime, remove: F) -> SweepReport
    where
        F: Fn(&Path) -> Result<(), MonitorError>,
    {
        let mut report = SweepReport::default();

        let Some(cutoff) = now.checked_sub(self.retention) else {
            return report;
        };

        let entries = match fs::read_dir(&self.log_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Log directory {} does not exist yet", self.log_dir.display());
                return report;
            }
            Err(e) => {
                warn!("Cannot list log directory {}: {}", self.log_dir.display(), e);
                report.failed += 1;
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Cannot read entry in {}: {}", self.log_dir.display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            let path = entry.path();

            match Self::is_expired(&path, cutoff) {
                Ok(false) => {}
                Ok(true) => match remove(&path) {
                    Ok(()) => {
                        info!("Removed old log file: {}", path.display());
                        report.removed.push(path);
                    }
                    Err(e) => {
                        warn!("{}", e);
                        report.failed += 1;
                    }
                },
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("{} vanished during sweep", path.display());
                }
                Err(e) => {
                    warn!("Cannot inspect {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    fn is_expired(path: &Path, cutoff: SystemTime) -> io::Result<bool> {
        let metadata = fs::symlink_metadata(path)?;
        if !metadata.is_file() {
            return Ok(false);
        }
        Ok(artifact_time(&metadata)? < cutoff)
    }

    fn remove(path: &Path) -> Result<(), MonitorError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            // Removed concurrently; the end state is what we wanted.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MonitorError::Housekeeping {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Creation time, or modification time on filesystems without birth time.
pub(crate) fn artifact_time(metadata: &Metadata) -> io::Result<SystemTime> {
    metadata.created().or_else(|_| metadata.modified())
}
