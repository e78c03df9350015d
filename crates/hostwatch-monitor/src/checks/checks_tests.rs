//! Tests for the check registry and the individual checks.

use std::collections::HashMap;

use hostwatch_config::Config;

use super::*;
use crate::finding::Severity;
use crate::testing::{calls, container, collaborators, FakeMetrics};

fn healthy_collaborators() -> Collaborators {
    collaborators(FakeMetrics::healthy(calls()), HashMap::new(), HashMap::new())
}

struct FailingCheck;

#[async_trait]
impl HealthCheck for FailingCheck {
    fn id(&self) -> &'static str {
        "failing"
    }

    async fn run(&self, _ctx: &CheckContext<'_>) -> Result<CheckResult, MonitorError> {
        Err(MonitorError::CollaboratorUnavailable("daemon socket closed".to_string()))
    }
}

struct PanickingCheck;

#[async_trait]
impl HealthCheck for PanickingCheck {
    fn id(&self) -> &'static str {
        "panicking"
    }

    async fn run(&self, _ctx: &CheckContext<'_>) -> Result<CheckResult, MonitorError> {
        panic!("sensor table corrupted");
    }
}

struct InfoCheck;

#[async_trait]
impl HealthCheck for InfoCheck {
    fn id(&self) -> &'static str {
        "info"
    }

    async fn run(&self, _ctx: &CheckContext<'_>) -> Result<CheckResult, MonitorError> {
        Ok(vec![Finding::info("info", "still here")])
    }
}

#[test]
fn test_standard_order() {
    let registry = CheckRegistry::standard();
    assert_eq!(
        registry.ids(),
        vec!["cpu", "memory", "disk", "network", "services", "containers"]
    );
}

#[tokio::test]
async fn test_healthy_host_is_silent() {
    let config = Config::default();
    let collaborators = healthy_collaborators();
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    let findings = CheckRegistry::standard().run_all(&ctx).await;
    assert!(findings.is_empty());
}

#[tokio::test]
async fn test_collaborators_queried_in_order() {
    let log = calls();
    let config = Config {
        services: vec!["nginx".to_string()],
        docker_containers: vec!["db".to_string()],
        ..Default::default()
    };
    let collaborators = collaborators(FakeMetrics::healthy(log.clone()), HashMap::new(), HashMap::new());
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    CheckRegistry::standard().run_all(&ctx).await;
    assert_eq!(
        *log.lock(),
        vec!["cpu", "memory", "disk:/", "network", "service:nginx", "container:db"]
    );
}

#[tokio::test]
async fn test_cpu_scenario_alert_contains_sample() {
    let mut config = Config::default();
    config.thresholds.cpu = 80.0;
    let mut metrics = FakeMetrics::healthy(calls());
    metrics.cpu = Some(95.0);
    let collaborators = collaborators(metrics, HashMap::new(), HashMap::new());
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    let findings = CheckRegistry::standard().run_all(&ctx).await;
    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.source, "cpu");
    assert_eq!(finding.severity, Severity::Alert);
    assert!(finding.message.contains("95"));
    assert_eq!(finding.subject.as_deref(), Some("CPU Alert"));
}

#[test]
fn test_threshold_is_strict() {
    assert!(resources::evaluate_percent(Resource::Cpu, 80.0, 80.0).is_none());
    assert!(resources::evaluate_percent(Resource::Cpu, 80.01, 80.0).is_some());
    assert!(resources::evaluate_percent(Resource::Memory, 79.9, 80.0).is_none());
    assert!(resources::evaluate_percent(Resource::Disk, f64::NAN, 80.0).is_none());
    assert!(resources::evaluate_network(1000, 1000).is_none());
    assert!(resources::evaluate_network(1001, 1000).is_some());
}

#[test]
fn test_threshold_messages() {
    let memory = resources::evaluate_percent(Resource::Memory, 91.26, 80.0).unwrap();
    assert_eq!(memory.message, "High memory usage detected: 91.3%");
    assert_eq!(memory.subject.as_deref(), Some("Memory Alert"));

    let disk = resources::evaluate_percent(Resource::Disk, 97.0, 90.0).unwrap();
    assert_eq!(disk.message, "Low disk space detected: 97.0% used");
    assert_eq!(disk.subject.as_deref(), Some("Disk Alert"));
}

#[test]
fn test_network_message_in_megabytes() {
    let finding = resources::evaluate_network(3 * 1024 * 1024 + 512 * 1024, 1024).unwrap();
    assert_eq!(finding.message, "High network traffic detected: 3.50 MB");
    assert_eq!(finding.subject.as_deref(), Some("Network Alert"));
    assert_eq!(finding.source, "network");
}

#[tokio::test]
async fn test_disk_check_uses_configured_path() {
    let log = calls();
    let config = Config {
        disk_path: "/var/lib/docker".into(),
        ..Default::default()
    };
    let collaborators = collaborators(FakeMetrics::healthy(log.clone()), HashMap::new(), HashMap::new());
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    let check = ResourceCheck::new(Resource::Disk);
    CheckRegistry::new().run_check(&check, &ctx).await;
    assert_eq!(*log.lock(), vec!["disk:/var/lib/docker"]);
}

#[tokio::test]
async fn test_metrics_fault_becomes_alert_and_later_checks_run() {
    let log = calls();
    let mut metrics = FakeMetrics::healthy(log.clone());
    metrics.memory = None;
    let config = Config {
        services: vec!["nginx".to_string()],
        ..Default::default()
    };
    let mut services = HashMap::new();
    services.insert("nginx".to_string(), Ok(true));
    let collaborators = collaborators(metrics, services, HashMap::new());
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    let findings = CheckRegistry::standard().run_all(&ctx).await;
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].source, "memory");
    assert!(findings[0].is_alert());
    assert_eq!(findings[0].subject.as_deref(), Some("Check Failure: memory"));
    assert!(findings[0].message.contains("memory sensor offline"));
    assert_eq!(findings[1].source, "services");
    assert!(log.lock().contains(&"network".to_string()));
}

#[tokio::test]
async fn test_failing_and_panicking_checks_are_contained() {
    let config = Config::default();
    let collaborators = healthy_collaborators();
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    let mut registry = CheckRegistry::new();
    registry.register(Box::new(FailingCheck));
    registry.register(Box::new(PanickingCheck));
    registry.register(Box::new(InfoCheck));

    let findings = registry.run_all(&ctx).await;
    assert_eq!(findings.len(), 3);
    assert_eq!(findings[0].source, "failing");
    assert!(findings[0].message.contains("daemon socket closed"));
    assert_eq!(findings[1].source, "panicking");
    assert!(findings[1].is_alert());
    assert!(findings[1].message.contains("sensor table corrupted"));
    assert_eq!(findings[2].source, "info");
}

#[tokio::test]
async fn test_one_finding_per_service() {
    let config = Config {
        services: vec!["nginx".to_string(), "ssh".to_string(), "cron".to_string()],
        ..Default::default()
    };
    let mut services = HashMap::new();
    services.insert("nginx".to_string(), Ok(true));
    services.insert("ssh".to_string(), Ok(false));
    services.insert("cron".to_string(), Err("systemd bus unavailable".to_string()));
    let collaborators = collaborators(FakeMetrics::healthy(calls()), services, HashMap::new());
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    let findings = ServiceCheck.run(&ctx).await.unwrap();
    assert_eq!(findings.len(), 3);

    assert_eq!(findings[0].severity, Severity::Info);
    assert_eq!(findings[0].message, "Service nginx is active.");
    assert!(findings[0].subject.is_none());

    assert_eq!(findings[1].severity, Severity::Alert);
    assert_eq!(findings[1].message, "ALERT: Service ssh is not active!");
    assert_eq!(findings[1].subject.as_deref(), Some("Service Alert: ssh"));

    assert_eq!(findings[2].severity, Severity::Alert);
    assert!(findings[2].message.contains("systemd bus unavailable"));
    assert_eq!(findings[2].subject.as_deref(), Some("Service Alert: cron"));
}

#[tokio::test]
async fn test_no_services_no_findings() {
    let config = Config::default();
    let collaborators = healthy_collaborators();
    let ctx = CheckContext { config: &config, collaborators: &collaborators };
    assert!(ServiceCheck.run(&ctx).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_one_finding_per_container() {
    let config = Config {
        docker_containers: vec![
            "web".to_string(),
            "ghost".to_string(),
            "broken".to_string(),
            "db".to_string(),
        ],
        ..Default::default()
    };
    let mut containers = HashMap::new();
    containers.insert("web".to_string(), Ok(container("web", "running")));
    containers.insert("broken".to_string(), Err("permission denied on docker.sock".to_string()));
    containers.insert("db".to_string(), Ok(container("db", "exited")));
    let log = calls();
    let collaborators = collaborators(FakeMetrics::healthy(log.clone()), HashMap::new(), containers);
    let ctx = CheckContext { config: &config, collaborators: &collaborators };

    let findings = ContainerCheck.run(&ctx).await.unwrap();
    assert_eq!(findings.len(), 4);

    assert_eq!(findings[0].severity, Severity::Info);
    assert_eq!(findings[0].message, "Docker container web is running.");

    assert!(findings[1].is_alert());
    assert!(findings[1].message.contains("ghost"));
    assert!(findings[1].message.contains("not found"));

    assert!(findings[2].is_alert());
    assert!(findings[2].message.contains("permission denied on docker.sock"));

    assert!(findings[3].is_alert());
    assert!(findings[3].message.contains("db (dbc0ffee0000)"));
    assert!(findings[3].message.contains("exited"));
    assert_eq!(findings[3].subject.as_deref(), Some("Docker Container Alert: db"));

    assert_eq!(
        *log.lock(),
        vec!["container:web", "container:ghost", "container:broken", "container:db"]
    );
}
