pub mod cors;
pub mod rate_limit;
pub mod request_trace;
pub mod require_user;
pub mod security_headers;
pub mod structured_logger;
pub mod trace_span;

pub use cors::cors_middleware;
pub use rate_limit::RateLimits;
pub use request_trace::{RequestTrace, TraceId};
pub use require_user::RequireUser;
pub use security_headers::SecurityHeaders;
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
