//! Health check handler.

use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, response::Json};
use serde_json::{Value, json};

use crate::state::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Pings the database and reports its latency.
pub async fn health(Extension(state): Extension<AppState>) -> (StatusCode, Json<Value>) {
    let config = &state.config;

    let ping = match tokio::time::timeout(PING_TIMEOUT, state.db.health_check()).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "database ping timed out after {}s",
            PING_TIMEOUT.as_secs()
        )),
    };

    match ping {
        Ok(latency) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": {
                    "name": config.app_name,
                    "environment": config.app_env,
                    "port": config.server_port,
                },
                "checks": {
                    "database": {
                        "status": "up",
                        "latency_ms": latency.as_millis() as u64,
                    }
                }
            })),
        ),
        Err(error) => {
            tracing::error!(error = %format!("{:#}", error), "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": {
                        "name": config.app_name,
                        "environment": config.app_env,
                    },
                    "checks": {
                        "database": {
                            "status": "down",
                            "error": error.to_string(),
                        }
                    }
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn test_healthy() {
        let state = test_state().await;

        let (status, Json(body)) = health(Extension(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"]["database"]["status"], "up");
        assert!(body["checks"]["database"]["latency_ms"].is_u64());
    }

    #[tokio::test]
    async fn test_unhealthy_when_pool_closed() {
        let state = test_state().await;
        state.db.close().await;

        let (status, Json(body)) = health(Extension(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["checks"]["database"]["status"], "down");
    }
}
