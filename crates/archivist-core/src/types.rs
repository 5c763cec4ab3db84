//! Validated identifier types shared across the archivist crates.
//!
//! These newtypes reject malformed identifiers at construction time, so the
//! client and entity layers never have to re-check them.

use crate::error::ArchiveError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for work identifiers with validation.
///
/// Work IDs are the decimal identifiers that appear in `/works/{id}` URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkId(String);

impl WorkId {
    /// Create a new `WorkId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is not a non-empty run of decimal digits.
    pub fn new(id: impl Into<String>) -> Result<Self, ArchiveError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that a string is a plausible work ID: 1-16 decimal digits.
    fn validate(id: &str) -> Result<(), ArchiveError> {
        static WORK_ID_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            WORK_ID_REGEX.get_or_init(|| Regex::new(r"^[0-9]{1,16}$").expect("valid regex"));

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(ArchiveError::Validation(format!(
                "invalid work ID: must be 1-16 decimal digits, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for usernames with validation.
///
/// Usernames appear in `/users/{name}/profile` URLs and are restricted to
/// ASCII letters, digits and underscores, 1-40 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new `Username` from a string.
    ///
    /// # Errors
    /// Returns error if the name doesn't match the allowed charset.
    pub fn new(name: impl Into<String>) -> Result<Self, ArchiveError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate username format: ASCII alphanumeric plus underscore, 1-40 chars.
    fn validate(name: &str) -> Result<(), ArchiveError> {
        static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            USERNAME_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{1,40}$").expect("valid regex"));

        if regex.is_match(name) {
            Ok(())
        } else {
            Err(ArchiveError::Validation(format!(
                "invalid username: must be 1-40 ASCII letters, digits or underscores, got '{name}'"
            )))
        }
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_id_valid() {
        let id = WorkId::new("12345").expect("valid work ID");
        assert_eq!(id.as_str(), "12345");
        assert_eq!(id.to_string(), "12345");
    }

    #[test]
    fn test_work_id_invalid() {
        assert!(WorkId::new("").is_err());
        assert!(WorkId::new("12a45").is_err());
        assert!(WorkId::new("-123").is_err());
        assert!(WorkId::new("12345678901234567").is_err());
    }

    #[test]
    fn test_username_valid() {
        let name = Username::new("some_reader42").expect("valid username");
        assert_eq!(name.as_str(), "some_reader42");
    }

    #[test]
    fn test_username_invalid() {
        assert!(Username::new("").is_err());
        assert!(Username::new("has space").is_err());
        assert!(Username::new("semi;colon").is_err());
        assert!(Username::new("a".repeat(41)).is_err());
    }
}
