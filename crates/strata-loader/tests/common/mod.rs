#![allow(dead_code)]
use std::fs;
use std::path::Path;
use strata_loader::{ConfigLoader, LoaderConfig};
use tempfile::TempDir;

/// A temporary configuration tree plus the loader config pointing at
/// it. Files are declared relative to the fixture root and read
/// through `classpath:` locations.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create fixture dir"),
        }
    }

    /// Writes a file (creating parent directories) and returns self
    /// for chaining.
    pub fn file(self, path: &str, content: &str) -> Self {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture parents");
        }
        fs::write(full, content).expect("failed to write fixture file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A loader config scanning the fixture root as the only base
    /// location.
    pub fn config(&self) -> LoaderConfig {
        LoaderConfig {
            locations: vec!["classpath:/".into()],
            search_roots: vec![self.dir.path().to_path_buf()],
            ..LoaderConfig::default()
        }
    }

    /// Loads with a closure-adjusted config, panicking on failure.
    pub fn load_with(
        &self,
        adjust: impl FnOnce(&mut LoaderConfig),
    ) -> strata_loader::strata_core::Environment {
        let mut config = self.config();
        adjust(&mut config);
        ConfigLoader::new(config).load().expect("load failed")
    }

    /// Loads with the plain fixture config.
    pub fn load(&self) -> strata_loader::strata_core::Environment {
        self.load_with(|_| {})
    }
}

/// Shorthand for asserting a resolved property value.
pub fn assert_property(
    env: &strata_loader::strata_core::Environment,
    key: &str,
    expected: &str,
) {
    assert_eq!(
        env.get_property(key).expect("resolution failed").as_deref(),
        Some(expected),
        "unexpected value for '{}'",
        key
    );
}

/// Active profile names, in order.
pub fn active_names(env: &strata_loader::strata_core::Environment) -> Vec<String> {
    env.active_profiles()
        .iter()
        .map(|p| p.as_str().to_string())
        .collect()
}
