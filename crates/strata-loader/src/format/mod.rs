//! Configuration document formats and the parser registry.
//!
//! Parsers are statically registered: the registry is an explicit map
//! from format to parser instance, built once at loader construction.
//! There is no dynamic discovery.

mod properties;
mod yaml;

pub use properties::PropertiesParser;
pub use yaml::YamlParser;

use crate::document::Document;
use crate::error::LoadError;
use std::path::Path;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// Structured indented mapping format (.yml, .yaml)
    Yaml,
    /// Line-oriented key=value format (.properties)
    Properties,
}

impl ConfigFormat {
    /// Detects the format from a file path based on extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Detects the format from a file extension string.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "properties" => Some(Self::Properties),
            _ => None,
        }
    }

    /// Returns all file extensions for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Yaml => &["yml", "yaml"],
            Self::Properties => &["properties"],
        }
    }

    /// Returns all supported formats.
    pub fn all() -> &'static [Self] {
        &[Self::Yaml, Self::Properties]
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yaml => write!(f, "YAML"),
            Self::Properties => write!(f, "Properties"),
        }
    }
}

/// A trait for parsing raw text into an ordered document sequence.
pub trait DocumentParser: Send + Sync {
    /// Parses the input into documents in textual order.
    ///
    /// `source_name` identifies the input for origins and error
    /// messages.
    fn parse(&self, input: &str, source_name: &str) -> Result<Vec<Document>, LoadError>;
}

/// Explicit format-to-parser map.
pub struct FormatRegistry {
    parsers: Vec<(ConfigFormat, Box<dyn DocumentParser>)>,
}

impl FormatRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registers a parser for a format. Last registration wins.
    pub fn register(&mut self, format: ConfigFormat, parser: Box<dyn DocumentParser>) {
        self.parsers.retain(|(f, _)| *f != format);
        self.parsers.push((format, parser));
    }

    /// Returns the parser registered for a format.
    pub fn parser_for(&self, format: ConfigFormat) -> Option<&dyn DocumentParser> {
        self.parsers
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, p)| p.as_ref())
    }

    /// Returns the format registered for a path's extension.
    pub fn format_for_path(&self, path: &Path) -> Option<ConfigFormat> {
        ConfigFormat::from_path(path).filter(|f| self.parser_for(*f).is_some())
    }

    /// All extensions with a registered parser, in registration order.
    pub fn extensions(&self) -> Vec<&'static str> {
        self.parsers
            .iter()
            .flat_map(|(f, _)| f.extensions().iter().copied())
            .collect()
    }
}

impl Default for FormatRegistry {
    /// The built-in registry: YAML and properties.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(ConfigFormat::Yaml, Box::new(YamlParser));
        registry.register(ConfigFormat::Properties, Box::new(PropertiesParser));
        registry
    }
}
