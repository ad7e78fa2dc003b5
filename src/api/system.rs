//! Backend health monitoring

use serde::Deserialize;

use crate::api::client::{list_field, ApiTransport, Method};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    #[serde(default)]
    pub rss: u64,
    #[serde(default)]
    pub heap_total: u64,
    #[serde(default)]
    pub heap_used: u64,
    #[serde(default)]
    pub external: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    /// Seconds since the process started
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: MemoryUsage,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    #[serde(default)]
    pub connected: bool,
    /// Milliseconds
    #[serde(default)]
    pub response_time: f64,
    #[serde(default)]
    pub active_connections: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetrics {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub average_response_time: f64,
    /// Percentage of failed requests
    #[serde(default)]
    pub error_rate: f64,
}

/// Current health of the backend
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    #[serde(default)]
    pub server_status: ServerStatus,
    #[serde(default)]
    pub database_status: DatabaseStatus,
    #[serde(default)]
    pub api_metrics: ApiMetrics,
}

/// A historical health sample
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HealthSample {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub health: SystemHealth,
}

/// Bytes as megabytes with two decimals, e.g. `12.50 MB`
pub fn format_bytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Seconds as `{hours}h {minutes}m`
pub fn format_uptime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}h {}m", total / 3600, (total % 3600) / 60)
}

/// System health operations handler
pub struct SystemHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> SystemHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// Current health snapshot
    pub async fn health(&self) -> Result<SystemHealth> {
        let value = self
            .client
            .request(Method::GET, "/api/system/health", None)
            .await?;
        if value.is_null() {
            return Ok(SystemHealth::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Samples from the last `hours` hours
    pub async fn history(&self, hours: u32) -> Result<Vec<HealthSample>> {
        let path = format!("/api/system/health/history?hours={}", hours);
        let value = self.client.request(Method::GET, &path, None).await?;
        list_field(value, "healthHistory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::json;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.00 MB");
        assert_eq!(format_bytes(13_107_200), "12.50 MB");
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0.0), "0h 0m");
        assert_eq!(format_uptime(3_725.9), "1h 2m");
        assert_eq!(format_uptime(90_000.0), "25h 0m");
    }

    #[tokio::test]
    async fn test_health_parses_nested_status() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, _| *method == Method::GET && path == "/api/system/health")
            .returning(|_, _, _| {
                Ok(json!({
                    "serverStatus": {"uptime": 7200, "cpuUsage": 12.5,
                                     "memoryUsage": {"rss": 1048576, "heapUsed": 524288}},
                    "databaseStatus": {"connected": true, "responseTime": 4, "activeConnections": 9},
                    "apiMetrics": {"totalRequests": 1200, "averageResponseTime": 35.2, "errorRate": 0.4}
                }))
            });

        let health = SystemHandler::new(&mock).health().await.unwrap();
        assert!(health.database_status.connected);
        assert_eq!(format_bytes(health.server_status.memory_usage.rss), "1.00 MB");
        assert_eq!(health.api_metrics.total_requests, 1200);
    }

    #[tokio::test]
    async fn test_history_query() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|_, path, _| path == "/api/system/health/history?hours=24")
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"healthHistory": [
                    {"timestamp": "2024-06-01T10:00:00Z", "serverStatus": {"cpuUsage": 30}}
                ]}))
            });

        let samples = SystemHandler::new(&mock).history(24).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].health.server_status.cpu_usage, 30.0);
    }
}
