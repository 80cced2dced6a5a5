//! Error handling for the portfolio backend.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, FieldErrors};
pub use error_code::ErrorCode;
