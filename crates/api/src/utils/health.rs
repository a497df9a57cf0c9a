//! Health report served by `GET /health`

use chrono::Utc;
use serde::Serialize;

/// Overall health of the server
///
/// `status` is `"ok"` only when every component is healthy, otherwise
/// `"degraded"`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub components: Vec<ComponentHealth>,
    /// Unix timestamp of the check
    pub timestamp: i64,
}

impl HealthStatus {
    pub fn new() -> Self {
        Self { status: "ok", components: Vec::new(), timestamp: Utc::now().timestamp() }
    }

    #[must_use]
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    /// Settle `status` from the collected components.
    #[must_use]
    pub fn evaluate(mut self) -> Self {
        self.status =
            if self.components.iter().all(|c| c.is_healthy) { "ok" } else { "degraded" };
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "ok"
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Health status of an individual component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
