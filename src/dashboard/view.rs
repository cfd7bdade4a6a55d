use super::client::FetchError;
use crate::types::health::{HealthReport, HealthStatus};
use crate::types::welcome::WelcomeMessage;
use std::fmt::Write;

pub const LOADING_MESSAGE: &str = "Loading...";
pub const API_FAILURE_MESSAGE: &str = "Failed to connect to API";

const TITLE: &str = "MERN DevOps";
const SUBTITLE: &str = "Full-stack application with industry-level DevOps";
const FOOTER: &str = "Built for DevOps demonstration";
const FEATURES: [&str; 5] = [
    "Docker (dev/prod)",
    "GitHub Actions CI/CD",
    "Kubernetes deployment",
    "Prometheus monitoring",
    "Structured logging",
];

#[derive(Debug, Clone, PartialEq)]
pub struct HealthCard {
    pub status: HealthStatus,
    pub uptime: Option<f64>,
}

impl HealthCard {
    pub fn unhealthy() -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            uptime: None,
        }
    }
}

impl From<HealthReport> for HealthCard {
    fn from(report: HealthReport) -> Self {
        Self {
            status: report.status,
            uptime: Some(report.uptime),
        }
    }
}

/// What the dashboard shows. The two cards are updated independently; a
/// failed fetch for one never touches the other.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub message: String,
    pub health: Option<HealthCard>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            message: LOADING_MESSAGE.to_string(),
            health: None,
        }
    }
}

impl DashboardView {
    pub fn apply_welcome(&mut self, result: Result<WelcomeMessage, FetchError>) {
        self.message = match result {
            Ok(welcome) => welcome.message,
            Err(err) => {
                tracing::warn!(error = %err, "welcome fetch failed");
                API_FAILURE_MESSAGE.to_string()
            }
        };
    }

    pub fn apply_health(&mut self, result: Result<HealthReport, FetchError>) {
        self.health = Some(match result {
            Ok(report) => report.into(),
            Err(err) => {
                tracing::warn!(error = %err, "health fetch failed");
                HealthCard::unhealthy()
            }
        });
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{TITLE}")?;
        writeln!(out, "{SUBTITLE}")?;
        writeln!(out)?;

        writeln!(out, "== API Response ==")?;
        writeln!(out, "{}", self.message)?;
        writeln!(out)?;

        writeln!(out, "== Health Status ==")?;
        if let Some(health) = &self.health {
            match health.uptime {
                Some(uptime) => writeln!(out, "[{}] uptime {uptime:.1}s", health.status)?,
                None => writeln!(out, "[{}]", health.status)?,
            }
        }
        writeln!(out)?;

        writeln!(out, "== DevOps Features ==")?;
        for feature in FEATURES {
            writeln!(out, "  - {feature}")?;
        }
        writeln!(out)?;
        write!(out, "{FOOTER}")
    }
}
