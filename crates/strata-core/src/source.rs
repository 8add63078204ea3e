use crate::origin::{Origin, OriginTrackedValue};
use crate::value::ConfigValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Represents one layer of configuration properties.
///
/// A property source is a named, ordered, flat mapping of dotted keys
/// to origin-tracked values. It usually corresponds to one parsed
/// document of one file, or to a synthetic layer (defaults, overrides,
/// command-line arguments). Key order is provenance order, never
/// sorted. Once constructed a source is immutable; building happens
/// through [`PropertySource::with`] / [`PropertySource::from_entries`]
/// before the source is handed to the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySource {
    /// Unique display name of this source, derived deterministically
    /// from its provenance.
    pub name: String,

    /// The properties contributed by this source.
    entries: IndexMap<String, OriginTrackedValue>,
}

impl PropertySource {
    /// Creates an empty PropertySource.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// Creates a PropertySource from already-flattened entries.
    pub fn from_entries(
        name: impl Into<String>,
        entries: IndexMap<String, OriginTrackedValue>,
    ) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Builder-style insertion of an untracked value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.entries
            .insert(key.into(), OriginTrackedValue::untracked(value));
        self
    }

    /// Builder-style insertion of a tracked value.
    pub fn with_tracked(
        mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
        origin: Origin,
    ) -> Self {
        self.entries
            .insert(key.into(), OriginTrackedValue::new(value, origin));
        self
    }

    /// Retrieves a value by its exact (flattened) key.
    pub fn get(&self, key: &str) -> Option<&OriginTrackedValue> {
        self.entries.get(key)
    }

    /// Returns true if this source defines the key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries in provenance order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OriginTrackedValue)> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the source contributes nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let source = PropertySource::new("defaults")
            .with("server.port", 8080)
            .with("server.host", "localhost");

        assert_eq!(source.len(), 2);
        assert_eq!(source.get("server.port").unwrap().value.as_i64(), Some(8080));
        assert!(source.contains("server.host"));
        assert!(!source.contains("server.missing"));
    }

    #[test]
    fn test_order_is_provenance_order() {
        let source = PropertySource::new("s").with("b", 1).with("a", 2).with("c", 3);

        let keys: Vec<&str> = source.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_tracked_entry() {
        let source = PropertySource::new("app.yml").with_tracked(
            "foo",
            "bar",
            Origin::new("app.yml", 1, 5),
        );

        let entry = source.get("foo").unwrap();
        assert_eq!(entry.render(), "bar");
        assert_eq!(entry.origin.as_ref().unwrap().to_string(), "app.yml:1:5");
    }
}
