//! Error codes for the portfolio API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and appears verbatim as `code` in the
//! error envelope.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    /// Token was revoked by logout
    UnauthorizedRevokedJwt,
    /// Token is valid but its user no longer exists
    UnauthorizedUserNotFound,
    InvalidCredentials,
    Forbidden,
    /// Registration is closed once the admin account exists
    RegistrationClosed,

    // Request Validation
    ValidationError,
    BadRequest,
    InvalidJson,
    InvalidUpload,

    // Resource Not Found
    NotFound,
    UserNotFound,
    CategoryNotFound,
    SkillNotFound,
    ExperienceNotFound,
    EducationNotFound,
    ProjectNotFound,

    // Conflicts
    Conflict,
    UniqueEmail,
    DuplicateEntry,
    CategoryInUse,

    RateLimited,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    UploadFailed,
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::UnauthorizedRevokedJwt => "UNAUTHORIZED_REVOKED_JWT",
            Self::UnauthorizedUserNotFound => "UNAUTHORIZED_USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::RegistrationClosed => "REGISTRATION_CLOSED",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidUpload => "INVALID_UPLOAD",

            Self::NotFound => "NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::SkillNotFound => "SKILL_NOT_FOUND",
            Self::ExperienceNotFound => "EXPERIENCE_NOT_FOUND",
            Self::EducationNotFound => "EDUCATION_NOT_FOUND",
            Self::ProjectNotFound => "PROJECT_NOT_FOUND",

            Self::Conflict => "CONFLICT",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::DuplicateEntry => "DUPLICATE_ENTRY",
            Self::CategoryInUse => "CATEGORY_IN_USE",

            Self::RateLimited => "RATE_LIMITED",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::UploadFailed => "UPLOAD_FAILED",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
