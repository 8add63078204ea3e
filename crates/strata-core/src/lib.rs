//! # Strata Core
//!
//! Domain types and resolution engine for Strata Config.
//!
//! This crate holds the pieces that exist after documents are parsed:
//! scalar values with origins, property sources, profiles (names,
//! expressions, the activation state machine) and the finalized
//! [`Environment`] that answers key lookups with defined precedence
//! and `${...}` placeholder resolution.
//!
//! ## Example
//!
//! ```
//! use strata_core::{Environment, Profile, PropertySource};
//!
//! let env = Environment::new(
//!     vec![
//!         PropertySource::new("command-line").with("server.port", "9090"),
//!         PropertySource::new("defaults").with("server.port", "8080"),
//!     ],
//!     vec![Profile::new("dev").unwrap()],
//!     Profile::default_profile(),
//! );
//!
//! assert_eq!(env.get_property("server.port").unwrap().as_deref(), Some("9090"));
//! ```

pub mod env;
pub mod error;
pub mod origin;
pub mod profiles;
pub mod source;
pub mod value;

// Re-exports
pub use env::Environment;
pub use error::{Result, StrataError};
pub use origin::{Origin, OriginTrackedValue};
pub use profiles::{ActivationKind, Profile, ProfileActivator, ProfileExpression};
pub use source::PropertySource;
pub use value::ConfigValue;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }
}
