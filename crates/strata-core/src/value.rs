use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar configuration value.
///
/// Documents are flattened at parse time (nested mappings become
/// dotted keys, sequences become `key[index]` entries), so the values
/// stored in a property source are always scalars. `OrderedFloat`
/// wraps floats so the enum can derive `Eq` and `Hash`.
///
/// # Example
///
/// ```
/// use strata_core::ConfigValue;
///
/// let val: ConfigValue = "hello".into();
/// assert_eq!(val.as_str(), Some("hello"));
///
/// let port: ConfigValue = 8080.into();
/// assert_eq!(port.as_i64(), Some(8080));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Null value. Present but empty: renders as `""`.
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (signed 64-bit)
    Integer(i64),
    /// Floating point value (wrapped in OrderedFloat for Eq support)
    Float(OrderedFloat<f64>),
    /// String value
    String(String),
}

impl ConfigValue {
    /// Returns true if the value is Null.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns the value as a bool if it matches.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an i64 if it matches.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as an f64 if it matches (Integer or Float).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(f.into_inner()),
            ConfigValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the value as a str if it matches.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as the string form used by property lookup.
    ///
    /// `Null` renders as the empty string: a present-but-empty value,
    /// distinct from an absent key.
    pub fn render(&self) -> String {
        match self {
            ConfigValue::Null => String::new(),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::Integer(i) => i.to_string(),
            ConfigValue::Float(f) => f.to_string(),
            ConfigValue::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

// ==========================================
// From Conversions for Ergonomics
// ==========================================

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Integer(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Integer(v as i64)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(OrderedFloat(v))
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::String(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::String(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        let v: ConfigValue = 42.into();
        assert_eq!(v, ConfigValue::Integer(42));
        assert_eq!(v.as_i64(), Some(42));
        assert_eq!(v.as_f64(), Some(42.0));

        let s: ConfigValue = "hello".into();
        assert_eq!(s.as_str(), Some("hello"));
    }

    #[test]
    fn test_render() {
        assert_eq!(ConfigValue::Null.render(), "");
        assert_eq!(ConfigValue::Bool(true).render(), "true");
        assert_eq!(ConfigValue::Integer(8080).render(), "8080");
        assert_eq!(ConfigValue::from("x").render(), "x");
    }

    #[test]
    fn test_null_is_present_but_empty() {
        let v = ConfigValue::Null;
        assert!(v.is_null());
        assert_eq!(v.render(), "");
        assert_ne!(v, ConfigValue::String(String::new()));
    }

    #[test]
    fn test_serde_serialization() {
        let v: ConfigValue = 10.into();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "10");

        let s: ConfigValue = "text".into();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"text\"");
    }
}
