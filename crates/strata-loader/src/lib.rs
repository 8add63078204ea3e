//! # Strata Loader
//!
//! Document loading pipeline for Strata Config.
//!
//! This crate turns configured locations into a finalized
//! [`Environment`](strata_core::Environment): it parses YAML and
//! properties documents (with per-scalar origins), matches them
//! against the active profile set, collects profile activation
//! directives, and assembles the matched documents into a
//! precedence-ordered property source chain.
//!
//! ## Precedence
//!
//! Lowest to highest: programmatic defaults, base locations in listed
//! order, additional locations, the override layer, command-line
//! arguments. Within a location, profile-variant files sit above the
//! base files, in profile activation order; within a file, later
//! documents sit above earlier ones.
//!
//! ## Example
//!
//! ```no_run
//! use strata_loader::{ConfigLoader, LoaderConfig};
//!
//! let loader = ConfigLoader::new(LoaderConfig {
//!     args: std::env::args().skip(1).collect(),
//!     ..LoaderConfig::default()
//! });
//!
//! let env = loader.load()?;
//! if let Some(port) = env.get_property("server.port")? {
//!     println!("listening on {}", port);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod format;
pub mod loader;
pub mod location;

// Re-exports
pub use cli::COMMAND_LINE_SOURCE;
pub use document::Document;
pub use error::LoadError;
pub use format::{ConfigFormat, DocumentParser, FormatRegistry, PropertiesParser, YamlParser};
pub use loader::{ConfigLoader, DEFAULTS_SOURCE, LoaderConfig, OVERRIDES_SOURCE};
pub use location::{FileReader, Location};

// Re-export strata_core for consumers
pub use strata_core;
