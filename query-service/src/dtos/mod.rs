//! Request and response bodies.

pub mod health;
pub mod query;

pub use health::HealthResponse;
pub use query::{QueryParams, QueryRequest, QueryResponse};
