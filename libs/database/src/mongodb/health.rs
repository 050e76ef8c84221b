use mongodb::{Database, bson::doc};
use serde::Serialize;
use std::time::Instant;

/// Outcome of a `ping` round trip
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

pub async fn check_health(db: &Database) -> bool {
    db.run_command(doc! { "ping": 1 }).await.is_ok()
}

/// Like [`check_health`] but keeps the latency and the driver error.
pub async fn check_health_detailed(db: &Database) -> HealthStatus {
    let start = Instant::now();
    let result = db.run_command(doc! { "ping": 1 }).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_omits_empty_message() {
        let status = HealthStatus {
            healthy: true,
            message: None,
            response_time_ms: 3,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["healthy"], true);
        assert!(json.get("message").is_none());
    }
}
