//! Input validation primitives.
//!
//! Ergonomic helpers for the common validation patterns in task assembly
//! and CLI parsing. These replace verbose ok_or_else +
//! Error::validation_invalid_argument chains.

use crate::error::{Error, Result};

/// Require an Option to contain a value.
pub fn require<T>(opt: Option<T>, field: &str, message: &str) -> Result<T> {
    opt.ok_or_else(|| Error::validation_invalid_argument(field, message, None, None))
}

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}
