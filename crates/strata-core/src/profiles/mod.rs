//! Profiles: named configuration variants.
//!
//! A profile gates which documents apply. Documents may declare a
//! matching expression over profile names, and matched documents may
//! activate further profiles through directives.

pub mod activator;
pub mod expression;

pub use activator::{ActivationKind, ProfileActivator};
pub use expression::ProfileExpression;

use crate::error::{Result, StrataError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the reserved fallback profile used when nothing is active.
pub const DEFAULT_PROFILE: &str = "default";

/// Execution profile for configuration selection.
///
/// Common profiles: "default", "dev", "staging", "production".
/// Names may not be empty and may not contain `,`, `[` or `]`
/// (those characters belong to the list syntaxes), nor start with
/// the negation marker `!`.
///
/// # Example
///
/// ```
/// use strata_core::Profile;
///
/// let profile = Profile::new("production").unwrap();
/// assert_eq!(profile.as_str(), "production");
/// assert!(Profile::new("dev,prod").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(String);

impl Profile {
    /// Creates a new Profile, validating the name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StrataError::internal("profile name cannot be empty"));
        }
        if name.contains([',', '[', ']']) {
            return Err(StrataError::internal(format!(
                "profile name '{}' contains a reserved character",
                name
            )));
        }
        if name.starts_with('!') {
            return Err(StrataError::internal(format!(
                "profile name '{}' may not start with the negation marker",
                name
            )));
        }
        Ok(Self(name))
    }

    /// Returns the profile name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the reserved fallback profile.
    pub fn default_profile() -> Self {
        Self(DEFAULT_PROFILE.to_string())
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Splits a comma-separated profile list, trimming whitespace around
/// each name. Empty segments are rejected.
///
/// ```
/// use strata_core::profiles::parse_profile_list;
///
/// let profiles = parse_profile_list(" dev , healthcheck ").unwrap();
/// assert_eq!(profiles.len(), 2);
/// assert_eq!(profiles[0].as_str(), "dev");
/// ```
pub fn parse_profile_list(value: &str) -> Result<Vec<Profile>> {
    value
        .split(',')
        .map(|segment| Profile::new(segment.trim()))
        .collect()
}
