//! Health and metrics HTTP routes
//!
//! Served by the same warp server as the chat channel, for operators and
//! container orchestration probes.

use crate::observability::metrics::metrics;
use serde::Serialize;
use std::convert::Infallible;
use std::time::{SystemTime, UNIX_EPOCH};
use warp::Filter;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_connections: u64,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: u64,
}

/// Current health status (pure read of the global collector)
pub fn health_status() -> HealthStatus {
    let collector = metrics();
    HealthStatus {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: collector.uptime_seconds(),
        active_connections: collector.active_connections(),
        timestamp: current_timestamp(),
    }
}

/// `GET /health`, `GET /metrics` and `GET /live`
pub fn health_routes(
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // GET /health - service status
    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(|| async { Ok::<_, Infallible>(warp::reply::json(&health_status())) });

    // GET /metrics - complete metrics export
    let metrics_route = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(|| async { Ok::<_, Infallible>(warp::reply::json(&metrics().get_metrics())) });

    // GET /live - liveness probe
    let live_route = warp::path("live")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(|| async {
            Ok::<_, Infallible>(warp::reply::json(&LivenessResponse {
                alive: true,
                timestamp: current_timestamp(),
            }))
        });

    health_route.or(metrics_route).or(live_route)
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
