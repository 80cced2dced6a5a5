//! Process configuration read from the environment at startup.

use std::time::Duration;

use crate::error::AppError;
use crate::middleware::cors::parse_origins;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_JWT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Runtime environment, from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeEnv {
    #[default]
    Development,
    Production,
    Test,
}

impl RuntimeEnv {
    /// Unknown values fall back to development.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => RuntimeEnv::Production,
            "test" => RuntimeEnv::Test,
            _ => RuntimeEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == RuntimeEnv::Production
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: RuntimeEnv,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub cors_origins: Vec<String>,
    /// `None` selects the in-memory media store.
    pub cloudinary: Option<CloudinaryConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Every missing required
    /// variable is reported in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut problems = Vec::new();

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            problems.push("JWT_SECRET is required".to_string());
            String::new()
        });

        let jwt_ttl = match var("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration(&raw).unwrap_or_else(|| {
                problems.push(format!("JWT_EXPIRES_IN is not a valid duration: '{raw}'"));
                DEFAULT_JWT_TTL
            }),
            None => DEFAULT_JWT_TTL,
        };

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                problems.push(format!("PORT must be a valid port number, got '{raw}'"));
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let cloudinary = match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_API_KEY"),
            var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            (None, None, None) => None,
            _ => {
                problems.push(
                    "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together"
                        .to_string(),
                );
                None
            }
        };

        if !problems.is_empty() {
            return Err(AppError::config(problems.join("; ")));
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            env: var("NODE_ENV")
                .map(|raw| RuntimeEnv::parse(&raw))
                .unwrap_or_default(),
            jwt_secret,
            jwt_ttl,
            cors_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            cloudinary,
        })
    }
}

/// `7d`, `12h`, `30m`, `45s` or bare seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let value: u64 = digits.parse().ok()?;
    let secs = match unit.trim() {
        "" | "s" => value,
        "m" => value.checked_mul(60)?,
        "h" => value.checked_mul(60 * 60)?,
        "d" => value.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    (secs > 0).then(|| Duration::from_secs(secs))
}
