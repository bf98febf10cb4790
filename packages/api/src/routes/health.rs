use axum::{http::Uri, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PingResponse {
    pub greeting: String,
    pub date: String,
    pub url: String,
}

/// Health check endpoint to verify API status
#[tracing::instrument]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[tracing::instrument]
pub async fn ping(uri: Uri) -> Json<PingResponse> {
    Json(PingResponse {
        greeting: format!("Hello from {}", env!("CARGO_PKG_NAME")),
        date: chrono::Utc::now().to_rfc3339(),
        url: uri.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_json() {
        let response = health_check().await;
        assert_eq!(response.0.status, "healthy");
        assert_eq!(response.0.service, "retro-game-api");
    }

    #[tokio::test]
    async fn test_health_check_version_is_set() {
        let response = health_check().await;
        assert_eq!(response.0.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_ping_echoes_url() {
        let response = ping(Uri::from_static("/ping")).await;
        assert_eq!(response.0.url, "/ping");
        assert!(response.0.greeting.starts_with("Hello from"));
        assert!(chrono::DateTime::parse_from_rfc3339(&response.0.date).is_ok());
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            service: "retro-game-api".to_string(),
            version: "0.1.0".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"service\":\"retro-game-api\""));
    }
}
