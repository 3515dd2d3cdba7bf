//! Observability: structured logging, metrics collection and health routes

pub mod health;
pub mod logging;
pub mod metrics;

// Re-export for convenience
pub use health::{health_routes, health_status, HealthStatus};
pub use logging::{init_default_logging, init_logging, LogFormat};
pub use metrics::{metrics, MetricsCollector, MetricsSnapshot};

// Span macros for structured logging
pub use logging::{connection_span, frame_span};
