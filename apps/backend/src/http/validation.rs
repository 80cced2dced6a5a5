//! Field-level input validation that accumulates a `{field: message}` map.
//!
//! Accessors return a usable placeholder on failure so callers can keep
//! collecting errors; the values are only meaningful once [`Validator::finish`]
//! returns `Ok`.

use lazy_regex::regex_is_match;
use time::Date;
use url::Url;

use crate::errors::FieldErrors;
use crate::serde_date::parse_date;

pub fn is_valid_email(raw: &str) -> bool {
    raw.len() <= 254 && regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", raw)
}

/// Absolute `http`/`https` URL with a host.
pub fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.get(field).is_some()
    }

    pub fn required_text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<String>,
        min: usize,
        max: usize,
    ) -> String {
        match trimmed(value) {
            None => {
                self.error(field, format!("{label} is required"));
                String::new()
            }
            Some(s) => {
                let len = s.chars().count();
                if len < min || len > max {
                    if min > 1 {
                        self.error(field, format!("{label} must be between {min} and {max} characters"));
                    } else {
                        self.error(field, format!("{label} cannot exceed {max} characters"));
                    }
                }
                s
            }
        }
    }

    /// Blank input becomes `None`.
    pub fn optional_text(
        &mut self,
        field: &str,
        label: &str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        let s = trimmed(value)?;
        if s.chars().count() > max {
            self.error(field, format!("{label} cannot exceed {max} characters"));
        }
        Some(s)
    }

    pub fn optional_url(&mut self, field: &str, label: &str, value: Option<String>) -> Option<String> {
        let s = trimmed(value)?;
        if !is_http_url(&s) {
            self.error(field, format!("{label} must be a valid URL"));
        }
        Some(s)
    }

    /// Required, lowercased.
    pub fn email(&mut self, field: &str, value: Option<String>) -> String {
        match trimmed(value) {
            None => {
                self.error(field, "Email is required");
                String::new()
            }
            Some(s) => {
                let s = s.to_lowercase();
                if !is_valid_email(&s) {
                    self.error(field, "Please provide a valid email");
                }
                s
            }
        }
    }

    pub fn int_in(
        &mut self,
        field: &str,
        label: &str,
        value: Option<i64>,
        min: i64,
        max: i64,
    ) -> Option<i64> {
        let v = value?;
        if v < min || v > max {
            self.error(field, format!("{label} must be between {min} and {max}"));
        }
        Some(v.clamp(min, max))
    }

    pub fn required_date(&mut self, field: &str, label: &str, value: Option<String>) -> Date {
        match trimmed(value) {
            None => {
                self.error(field, format!("{label} is required"));
                Date::MIN
            }
            Some(s) => parse_date(&s).unwrap_or_else(|| {
                self.error(field, format!("{label} must be a valid date"));
                Date::MIN
            }),
        }
    }

    pub fn optional_date(&mut self, field: &str, label: &str, value: Option<String>) -> Option<Date> {
        let s = trimmed(value)?;
        let parsed = parse_date(&s);
        if parsed.is_none() {
            self.error(field, format!("{label} must be a valid date"));
        }
        parsed
    }

    /// Missing input falls back to `default`.
    pub fn one_of(
        &mut self,
        field: &str,
        label: &str,
        value: Option<String>,
        allowed: &[&'static str],
        default: &'static str,
    ) -> String {
        match trimmed(value) {
            None => default.to_string(),
            Some(s) => {
                if !allowed.contains(&s.as_str()) {
                    self.error(field, format!("{label} must be one of: {}", allowed.join(", ")));
                }
                s
            }
        }
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        self.errors.into_result()
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}
