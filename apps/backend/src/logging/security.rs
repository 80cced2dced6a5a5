//! Security-relevant events, tagged with `event` so they can be alerted on.

use tracing::{info, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

pub fn registration_blocked(email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_REGISTRATION_BLOCKED",
        %trace_id,
        email = %Redacted(email),
        "Registration attempted after admin account exists"
    );
}

pub fn token_revoked(user_id: &str) {
    let trace_id = trace_ctx::trace_id();

    info!(
        event = "SECURITY_TOKEN_REVOKED",
        %trace_id,
        user_id,
        "Token revoked on logout"
    );
}

pub fn rate_limit_hit(limiter: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_RATE_LIMIT_HIT",
        %trace_id,
        limiter,
        "Rate limit exceeded"
    );
}
