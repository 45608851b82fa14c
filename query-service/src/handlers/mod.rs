//! HTTP handlers for query-service.

pub mod health;
pub mod metrics;
pub mod query;

pub use health::{fallback, health_check, readiness_check};
pub use metrics::metrics_endpoint;
pub use query::{query_get, query_post};
