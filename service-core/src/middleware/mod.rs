pub mod metrics;
pub mod panic;
pub mod tracing;

pub use self::metrics::metrics_middleware;
pub use self::panic::handle_panic;
pub use self::tracing::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
