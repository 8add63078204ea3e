//! The resolved environment: a finalized, read-only property source
//! chain.
//!
//! An [`Environment`] is built once per configuration load and never
//! mutates afterwards, so it can be shared across threads without
//! locking. Rebuilding (e.g. adding a profile after the fact) means
//! constructing a new environment, never editing a shared one.

mod placeholder;

use crate::error::Result;
use crate::origin::{Origin, OriginTrackedValue};
use crate::profiles::Profile;
use crate::source::PropertySource;

/// The finalized resolution context.
///
/// Property sources are held highest-precedence-first; a lookup scans
/// the chain in order and returns the first source that defines the
/// key, including explicit null/empty values (present, distinct from
/// absent).
///
/// # Example
///
/// ```
/// use strata_core::{Environment, Profile, PropertySource};
///
/// let env = Environment::new(
///     vec![
///         PropertySource::new("overrides").with("a", 4),
///         PropertySource::new("defaults").with("a", 1).with("b", 2),
///     ],
///     vec![Profile::new("dev").unwrap()],
///     Profile::default_profile(),
/// );
///
/// assert_eq!(env.get_property("a").unwrap().as_deref(), Some("4"));
/// assert_eq!(env.get_property("b").unwrap().as_deref(), Some("2"));
/// assert_eq!(env.get_property("c").unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    /// Sources ordered highest precedence first.
    sources: Vec<PropertySource>,
    /// Active profiles in first-activation order.
    active_profiles: Vec<Profile>,
    /// Default profile, used for matching only while nothing is active.
    default_profile: Profile,
}

impl Environment {
    /// Creates an environment from sources ordered highest precedence
    /// first.
    pub fn new(
        sources: Vec<PropertySource>,
        active_profiles: Vec<Profile>,
        default_profile: Profile,
    ) -> Self {
        Self {
            sources,
            active_profiles,
            default_profile,
        }
    }

    /// Resolves a key to its rendered string value.
    ///
    /// `${...}` placeholders inside string values are resolved
    /// recursively through this same chain. Resolution is lazy:
    /// an unresolvable or cyclic placeholder only fails when the key
    /// holding it is read.
    pub fn get_property(&self, key: &str) -> Result<Option<String>> {
        match self.get_raw(key) {
            None => Ok(None),
            Some(tracked) => {
                let rendered = tracked.render();
                let mut visited = vec![key.to_string()];
                placeholder::resolve(self, key, &rendered, &mut visited).map(Some)
            },
        }
    }

    /// Returns the raw tracked value for a key, without placeholder
    /// resolution.
    pub fn get_raw(&self, key: &str) -> Option<&OriginTrackedValue> {
        self.sources.iter().find_map(|source| source.get(key))
    }

    /// Returns true if any source defines the key.
    pub fn contains_property(&self, key: &str) -> bool {
        self.sources.iter().any(|source| source.contains(key))
    }

    /// Returns the origin of the winning value for a key, if the
    /// value was read from a document.
    pub fn origin(&self, key: &str) -> Option<&Origin> {
        self.get_raw(key).and_then(|tracked| tracked.origin.as_ref())
    }

    /// Active profiles in first-activation order.
    pub fn active_profiles(&self) -> &[Profile] {
        &self.active_profiles
    }

    /// The default profile configured for this build.
    pub fn default_profile(&self) -> &Profile {
        &self.default_profile
    }

    /// The underlying property sources, highest precedence first.
    pub fn property_sources(&self) -> &[PropertySource] {
        &self.sources
    }

    /// Display names of all sources, in precedence order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ConfigValue;

    fn env(sources: Vec<PropertySource>) -> Environment {
        Environment::new(sources, Vec::new(), Profile::default_profile())
    }

    #[test]
    fn test_first_present_wins() {
        let e = env(vec![
            PropertySource::new("high").with("key", "high"),
            PropertySource::new("low").with("key", "low").with("only", "low"),
        ]);

        assert_eq!(e.get_property("key").unwrap().as_deref(), Some("high"));
        assert_eq!(e.get_property("only").unwrap().as_deref(), Some("low"));
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let e = env(vec![PropertySource::new("s").with("key", 42)]);
        assert_eq!(e.get_property("key").unwrap(), e.get_property("key").unwrap());
    }

    #[test]
    fn test_null_is_present() {
        let e = env(vec![
            PropertySource::new("high").with("key", ConfigValue::Null),
            PropertySource::new("low").with("key", "shadowed"),
        ]);

        assert!(e.contains_property("key"));
        assert_eq!(e.get_property("key").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_absent_key() {
        let e = env(vec![PropertySource::new("s")]);
        assert_eq!(e.get_property("missing").unwrap(), None);
        assert!(!e.contains_property("missing"));
        assert!(e.origin("missing").is_none());
    }

    #[test]
    fn test_origin_of_winning_value() {
        let e = env(vec![
            PropertySource::new("app.yml").with_tracked("key", "v", Origin::new("app.yml", 4, 2)),
        ]);

        assert_eq!(e.origin("key").unwrap().to_string(), "app.yml:4:2");
    }

    #[test]
    fn test_source_names_enumerable() {
        let e = env(vec![
            PropertySource::new("command-line"),
            PropertySource::new("defaults"),
        ]);
        assert_eq!(e.source_names(), vec!["command-line", "defaults"]);
    }
}
