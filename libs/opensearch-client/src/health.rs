//! Engine health probe

use std::time::Duration;

use serde::Serialize;

use crate::client::SearchEngine;

pub const HEALTHY_DESCRIPTION: &str = "OpenSearch server is reachable";
pub const UNHEALTHY_DESCRIPTION: &str = "No connection to OpenSearch-server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub description: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Pings the engine with a short timeout of its own.
#[derive(Debug, Clone)]
pub struct HealthChecker<E> {
    engine: E,
    timeout: Duration,
}

impl<E: SearchEngine> HealthChecker<E> {
    pub fn new(engine: E, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    pub async fn check(&self) -> HealthReport {
        match self.engine.ping(self.timeout).await {
            Ok(()) => HealthReport {
                status: HealthStatus::Healthy,
                description: HEALTHY_DESCRIPTION.to_string(),
            },
            Err(err) => {
                tracing::warn!(error = %err, "OpenSearch health check failed");
                HealthReport {
                    status: HealthStatus::Unhealthy,
                    description: format!("{UNHEALTHY_DESCRIPTION}\n{err}"),
                }
            }
        }
    }
}
