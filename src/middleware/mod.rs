//! Request middleware: per-request logging with a request id, and endpoint metrics.

pub mod logging;
pub mod metrics;

pub use logging::{RequestId, RequestLogging, REQUEST_ID_HEADER};
pub use metrics::MetricsMiddleware;
