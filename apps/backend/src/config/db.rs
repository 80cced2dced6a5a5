use std::env;

use crate::error::AppError;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbProfile {
    /// `DATABASE_URL` (Postgres in production, a SQLite file locally)
    Prod,
    /// Private in-memory SQLite, one per state; used by tests
    InMemory,
}

pub const IN_MEMORY_SQLITE_URL: &str = "sqlite::memory:";

/// Resolve the connection URL for `profile`.
pub fn db_url(profile: &DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => {
            let url = must_var("DATABASE_URL")?;
            validate_url(&url)?;
            Ok(url)
        }
        DbProfile::InMemory => Ok(IN_MEMORY_SQLITE_URL.to_string()),
    }
}

fn validate_url(url: &str) -> Result<(), AppError> {
    let supported = ["postgres://", "postgresql://", "sqlite:"];
    if supported.iter().any(|prefix| url.starts_with(prefix)) {
        Ok(())
    } else {
        Err(AppError::config(
            "DATABASE_URL must start with postgres://, postgresql:// or sqlite:",
        ))
    }
}

/// Required environment variable, or a config error naming it.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}
