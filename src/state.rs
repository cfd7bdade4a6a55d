use crate::types::health::{HealthReport, HealthStatus};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use std::time::Instant;

/// Read-only handle shared by every request. Built once at process init and
/// handed to Rocket as managed state.
#[derive(Debug, Clone)]
pub struct ServiceState {
    started: Instant,
    started_at: DateTime<Utc>,
}

impl ServiceState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            // Reports carry millisecond timestamps, so the start time is kept
            // at the same precision to stay comparable with them.
            started_at: Utc::now().trunc_subsecs(3),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn uptime(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn health_report(&self) -> HealthReport {
        HealthReport {
            status: HealthStatus::Healthy,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime: self.uptime(),
        }
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}
