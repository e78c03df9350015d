//! In-memory collaborators and channels for unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::channels::{ChannelKind, NotificationChannel};
use crate::error::MonitorError;
use crate::finding::Finding;
use crate::collaborators::{
    Collaborators, ContainerInfo, ContainerRuntime, MetricsSource, ServiceManager,
};

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn calls() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Fixed metric samples; `None` makes the query fail.
pub(crate) struct FakeMetrics {
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub disk: Option<f64>,
    pub network: Option<u64>,
    pub calls: CallLog,
}

impl FakeMetrics {
    pub fn healthy(calls: CallLog) -> Self {
        Self {
            cpu: Some(10.0),
            memory: Some(20.0),
            disk: Some(30.0),
            network: Some(1024),
            calls,
        }
    }
}

fn sample<T: Copy>(value: Option<T>, what: &str) -> Result<T, MonitorError> {
    value.ok_or_else(|| MonitorError::CollaboratorUnavailable(format!("{} sensor offline", what)))
}

#[async_trait]
impl MetricsSource for FakeMetrics {
    async fn cpu_percent(&self) -> Result<f64, MonitorError> {
        self.calls.lock().push("cpu".to_string());
        sample(self.cpu, "cpu")
    }

    async fn memory_percent(&self) -> Result<f64, MonitorError> {
        self.calls.lock().push("memory".to_string());
        sample(self.memory, "memory")
    }

    async fn disk_percent(&self, path: &Path) -> Result<f64, MonitorError> {
        self.calls.lock().push(format!("disk:{}", path.display()));
        sample(self.disk, "disk")
    }

    async fn network_bytes_total(&self) -> Result<u64, MonitorError> {
        self.calls.lock().push("network".to_string());
        sample(self.network, "network")
    }
}

/// Service states by name. Unknown services are inactive; `Err` simulates a
/// failing service manager.
pub(crate) struct FakeServices {
    pub states: HashMap<String, Result<bool, String>>,
    pub calls: CallLog,
}

#[async_trait]
impl ServiceManager for FakeServices {
    async fn is_active(&self, service: &str) -> Result<bool, MonitorError> {
        self.calls.lock().push(format!("service:{}", service));
        match self.states.get(service) {
            Some(Ok(active)) => Ok(*active),
            Some(Err(reason)) => Err(MonitorError::CollaboratorUnavailable(reason.clone())),
            None => Ok(false),
        }
    }
}

/// Containers by name. Unknown names are not found.
pub(crate) struct FakeContainers {
    pub containers: HashMap<String, Result<ContainerInfo, String>>,
    pub calls: CallLog,
}

#[async_trait]
impl ContainerRuntime for FakeContainers {
    async fn get(&self, name: &str) -> Result<Option<ContainerInfo>, MonitorError> {
        self.calls.lock().push(format!("container:{}", name));
        match self.containers.get(name) {
            Some(Ok(info)) => Ok(Some(info.clone())),
            Some(Err(reason)) => Err(MonitorError::CollaboratorUnavailable(reason.clone())),
            None => Ok(None),
        }
    }
}

pub(crate) fn container(name: &str, status: &str) -> ContainerInfo {
    ContainerInfo {
        id: format!("{:0<64}", format!("{}c0ffee", name)),
        name: name.to_string(),
        status: status.to_string(),
    }
}

/// Collaborators over the fakes, sharing one call log.
pub(crate) fn collaborators(
    metrics: FakeMetrics,
    services: HashMap<String, Result<bool, String>>,
    containers: HashMap<String, Result<ContainerInfo, String>>,
) -> Collaborators {
    let calls = metrics.calls.clone();
    Collaborators {
        metrics: Arc::new(metrics),
        services: Arc::new(FakeServices {
            states: services,
            calls: calls.clone(),
        }),
        containers: Arc::new(FakeContainers { containers, calls }),
    }
}

/// Records every finding it receives.
pub(crate) struct RecordingChannel {
    pub kind: ChannelKind,
    pub received: Arc<Mutex<Vec<Finding>>>,
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(&self, finding: &Finding) -> Result<(), MonitorError> {
        self.received.lock().push(finding.clone());
        Ok(())
    }
}
