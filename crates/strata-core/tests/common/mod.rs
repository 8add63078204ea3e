#![allow(dead_code)]
use strata_core::{Environment, Profile, PropertySource};

/// Helper to build a Profile, panicking on invalid names (intended
/// for tests).
pub fn profile(name: &str) -> Profile {
    Profile::new(name).expect("invalid test profile name")
}

/// Helper to build an Environment from sources listed highest
/// precedence first, with no active profiles.
pub fn environment(sources: Vec<PropertySource>) -> Environment {
    Environment::new(sources, Vec::new(), Profile::default_profile())
}

/// A small layered fixture: defaults below, overrides on top.
pub fn layered_fixture() -> Environment {
    environment(vec![
        PropertySource::new("overrides")
            .with("server.port", "9090")
            .with("banner", "${app.name} (${app.mode:standalone})"),
        PropertySource::new("defaults")
            .with("server.port", "8080")
            .with("server.host", "localhost")
            .with("app.name", "strata"),
    ])
}
