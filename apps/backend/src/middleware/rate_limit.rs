//! Fixed-window rate limiting, keyed by client IP.
//!
//! Five policies share one `InMemoryBackend`; keys are namespaced per policy
//! so counters never bleed between limiters. Use [`rate_limiter!`] to wrap a
//! scope or resource:
//!
//! ```ignore
//! web::resource("/login")
//!     .wrap(rate_limiter!(&limits, AUTH))
//! ```

use std::time::Duration;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub name: &'static str,
    pub window: Duration,
    pub max_requests: u64,
    pub message: &'static str,
    /// Successful (2xx) responses give their slot back.
    pub skip_successful: bool,
}

const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);
const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

pub const GENERAL: RateLimitPolicy = RateLimitPolicy {
    name: "general",
    window: FIFTEEN_MINUTES,
    max_requests: 300,
    message: "Too many requests from this IP, please try again later.",
    skip_successful: false,
};

pub const AUTH: RateLimitPolicy = RateLimitPolicy {
    name: "auth",
    window: FIFTEEN_MINUTES,
    max_requests: 5,
    message: "Too many login attempts from this IP, please try again after 15 minutes.",
    skip_successful: true,
};

pub const UPLOAD: RateLimitPolicy = RateLimitPolicy {
    name: "upload",
    window: ONE_HOUR,
    max_requests: 50,
    message: "Too many uploads from this IP, please try again after an hour.",
    skip_successful: false,
};

pub const PUBLIC: RateLimitPolicy = RateLimitPolicy {
    name: "public",
    window: FIFTEEN_MINUTES,
    max_requests: 300,
    message: "Too many requests, please slow down.",
    skip_successful: false,
};

pub const STRICT: RateLimitPolicy = RateLimitPolicy {
    name: "strict",
    window: FIFTEEN_MINUTES,
    max_requests: 3,
    message: "Too many attempts for this sensitive operation, please try again later.",
    skip_successful: false,
};

/// Shared limiter state handed to route configuration.
#[derive(Clone)]
pub struct RateLimits {
    pub backend: InMemoryBackend,
    /// Limiters only engage when `true` (production).
    pub enabled: bool,
}

impl RateLimits {
    pub fn new(enabled: bool) -> Self {
        Self {
            backend: InMemoryBackend::builder().build(),
            enabled,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }
}

/// Input function builder for `policy`: real client IP, namespaced by policy name.
pub fn input_config(policy: &RateLimitPolicy) -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(policy.window, policy.max_requests)
        .real_ip_key()
        .custom_key(policy.name)
}

pub fn rollback_on_success(status: StatusCode) -> bool {
    status.is_success()
}

/// 429 with the standard error envelope plus `x-ratelimit-*` and `retry-after`.
///
/// `retry-after` is the full window: an upper bound on the wait.
pub fn denied_response(policy: &RateLimitPolicy, limit: u64, remaining: u64) -> HttpResponse {
    crate::logging::security::rate_limit_hit(policy.name);

    let mut response = AppError::too_many_requests(policy.message).error_response();
    let window = policy.window.as_secs();

    let headers = response.headers_mut();
    for (name, value) in [
        ("x-ratelimit-limit", limit),
        ("x-ratelimit-remaining", remaining),
        ("retry-after", window),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from(value));
    }
    response
}

/// Build the limiter for `$policy` (a `RateLimitPolicy` const path under this
/// module), wrapped in `Condition` so it is a no-op when limits are disabled.
#[macro_export]
macro_rules! rate_limiter {
    ($limits:expr, $policy:ident) => {{
        let limits: &$crate::middleware::rate_limit::RateLimits = $limits;
        let policy = &$crate::middleware::rate_limit::$policy;
        let builder = ::actix_extensible_rate_limit::RateLimiter::builder(
            limits.backend.clone(),
            $crate::middleware::rate_limit::input_config(policy).build(),
        )
        .add_headers()
        .request_denied_response(
            |output: &::actix_extensible_rate_limit::backend::SimpleOutput| {
                $crate::middleware::rate_limit::denied_response(
                    &$crate::middleware::rate_limit::$policy,
                    output.limit,
                    output.remaining,
                )
            },
        );
        let rollback = if policy.skip_successful {
            Some(
                $crate::middleware::rate_limit::rollback_on_success
                    as fn(::actix_web::http::StatusCode) -> bool,
            )
        } else {
            None
        };
        let builder = builder.rollback_condition(rollback);
        ::actix_web::middleware::Condition::new(limits.enabled, builder.build())
    }};
}
