//! The configuration load pipeline.
//!
//! One [`ConfigLoader::load`] call runs the whole resolution to
//! completion, synchronously: parse documents from the configured
//! locations, match them against the growing active-profile set,
//! finalize the profiles, assemble the matched documents into a
//! precedence-ordered property source chain, and hand back the
//! finalized [`Environment`]. Each call builds its own activator, so
//! concurrent loads share no mutable state.

use crate::cli;
use crate::document::{ACTIVE_KEY, DEFAULT_KEY, Document};
use crate::error::LoadError;
use crate::format::{ConfigFormat, FormatRegistry};
use crate::location::{FileReader, Location, ResolvedFile};
use indexmap::IndexMap;
use std::path::PathBuf;
use strata_core::profiles::parse_profile_list;
use strata_core::{ActivationKind, Environment, Profile, ProfileActivator, PropertySource};
use tracing::debug;

/// Display name of the programmatic defaults property source.
pub const DEFAULTS_SOURCE: &str = "defaults";
/// Display name of the system/override property source.
pub const OVERRIDES_SOURCE: &str = "overrides";

/// Explicit loader configuration, passed by the host application.
///
/// There is no discovery: every input (locations, names, arguments,
/// defaults, profiles) arrives through this struct.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Base locations, lowest precedence first. Entries may be
    /// comma-separated lists. Trailing `/` marks a directory.
    pub locations: Vec<String>,
    /// Locations layered strictly above every base location.
    pub additional_locations: Vec<String>,
    /// Base file names probed in directory locations.
    pub names: Vec<String>,
    /// Command-line arguments (`--key=value`, `--key[0]=value`).
    pub args: Vec<String>,
    /// Explicit system/override properties, just below the command line.
    pub overrides: IndexMap<String, String>,
    /// Programmatic defaults, the lowest layer of all.
    pub defaults: IndexMap<String, String>,
    /// Profiles activated programmatically, before any load.
    pub profiles: Vec<String>,
    /// Default profile name used while nothing is active.
    pub default_profile: Option<String>,
    /// Fail when the single configured location does not exist.
    pub required: bool,
    /// Roots that `classpath:` locations resolve against.
    pub search_roots: Vec<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            locations: vec!["./".into(), "./config/".into()],
            additional_locations: Vec::new(),
            names: vec!["application".into()],
            args: Vec::new(),
            overrides: IndexMap::new(),
            defaults: IndexMap::new(),
            profiles: Vec::new(),
            default_profile: None,
            required: false,
            search_roots: vec![PathBuf::from(".")],
        }
    }
}

/// Loads configuration according to a [`LoaderConfig`].
pub struct ConfigLoader {
    config: LoaderConfig,
    registry: FormatRegistry,
}

impl ConfigLoader {
    /// Creates a loader with the built-in format registry.
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_registry(config, FormatRegistry::default())
    }

    /// Creates a loader with an explicit format registry.
    pub fn with_registry(config: LoaderConfig, registry: FormatRegistry) -> Self {
        Self { config, registry }
    }

    /// Runs the full load and returns the finalized environment.
    pub fn load(&self) -> Result<Environment, LoadError> {
        let locations = self.parse_locations()?;
        let command_line = cli::command_line_source(&self.config.args);
        let overrides = map_source(OVERRIDES_SOURCE, &self.config.overrides);
        let defaults = map_source(DEFAULTS_SOURCE, &self.config.defaults);

        let mut run = LoadRun {
            config: &self.config,
            registry: &self.registry,
            reader: FileReader::new(self.config.search_roots.clone()),
            activator: ProfileActivator::new(),
            default_overridden: false,
            collected: Vec::new(),
            found: vec![false; locations.len()],
        };

        run.seed_profiles(&command_line, &overrides)?;
        run.scan_base(&locations)?;
        run.scan_variants(&locations)?;
        run.check_required(&locations)?;

        run.activator.finalize()?;
        let (active, default_profile) = run.activator.into_parts()?;
        let final_matching = if active.is_empty() {
            vec![default_profile.clone()]
        } else {
            active.clone()
        };
        debug!(
            profiles = ?active.iter().map(Profile::as_str).collect::<Vec<_>>(),
            "active profiles finalized"
        );

        // Assembly, lowest precedence first; reversed at the end so
        // lookup scans highest first.
        run.collected
            .sort_by_key(|c| (c.location_index, c.stage));

        let mut sources = Vec::new();
        if !defaults.is_empty() {
            sources.push(defaults);
        }
        for collected in run.collected {
            if !collected.matched {
                continue;
            }
            if collected.doc.has_negation() && !collected.doc.matches(&final_matching) {
                debug!(
                    source = %collected.display,
                    document = collected.doc.index,
                    "document excluded by negation against final profiles"
                );
                continue;
            }
            sources.push(PropertySource::from_entries(
                collected.source_name(),
                collected.doc.entries,
            ));
        }
        if !overrides.is_empty() {
            sources.push(overrides);
        }
        if !command_line.is_empty() {
            sources.push(command_line);
        }
        sources.reverse();

        Ok(Environment::new(sources, active, default_profile))
    }

    /// Splits and parses the configured location strings, base first,
    /// additional after (which the lowest-first assembly order layers
    /// on top). Explicit file locations must have a registered format.
    fn parse_locations(&self) -> Result<Vec<Location>, LoadError> {
        let mut locations = Vec::new();
        for raw in self.config.locations.iter().chain(&self.config.additional_locations) {
            for part in raw.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let location = Location::parse(part);
                if !location.is_directory() {
                    let extension = location.extension().unwrap_or("");
                    if ConfigFormat::from_extension(extension)
                        .and_then(|f| self.registry.parser_for(f).map(|_| f))
                        .is_none()
                    {
                        return Err(LoadError::unsupported_format(part, extension));
                    }
                }
                locations.push(location);
            }
        }
        Ok(locations)
    }
}

fn map_source(name: &str, map: &IndexMap<String, String>) -> PropertySource {
    map.iter()
        .fold(PropertySource::new(name), |source, (key, value)| {
            source.with(key.as_str(), value.as_str())
        })
}

/// Reads a profile list directive (`key` comma-separated, or
/// `key[0]`, `key[1]`, ...) from a synthetic property source.
fn directive_profiles(source: &PropertySource, key: &str) -> Result<Vec<Profile>, LoadError> {
    if let Some(value) = source.get(key) {
        return Ok(parse_profile_list(&value.render())?);
    }
    let mut profiles = Vec::new();
    while let Some(value) = source.get(&format!("{}[{}]", key, profiles.len())) {
        profiles.push(Profile::new(value.render().trim())?);
    }
    Ok(profiles)
}

/// One document collected during the scan, with everything assembly
/// needs to place and name it.
struct Collected {
    doc: Document,
    matched: bool,
    location_index: usize,
    /// 0 for base files, `1 + profile rank` for profile variants, so
    /// variants sort above their location's base documents in final
    /// activation order.
    stage: usize,
    display: String,
    declared: String,
    multi: bool,
}

impl Collected {
    /// Deterministic display name for the assembled property source.
    fn source_name(&self) -> String {
        if self.multi {
            format!(
                "Resource config '{}' imported via location \"{}\" (document #{})",
                self.display, self.declared, self.doc.index
            )
        } else {
            format!(
                "Resource config '{}' imported via location \"{}\"",
                self.display, self.declared
            )
        }
    }
}

/// Mutable state of one load: the collecting activator plus every
/// document seen so far.
struct LoadRun<'a> {
    config: &'a LoaderConfig,
    registry: &'a FormatRegistry,
    reader: FileReader,
    activator: ProfileActivator,
    default_overridden: bool,
    collected: Vec<Collected>,
    found: Vec<bool>,
}

impl LoadRun<'_> {
    /// Applies profile state known before any document is read:
    /// the configured default, programmatic profiles, then the
    /// explicit override directive from the command line and the
    /// override layer.
    fn seed_profiles(
        &mut self,
        command_line: &PropertySource,
        overrides: &PropertySource,
    ) -> Result<(), LoadError> {
        let explicit_default = match directive_value(command_line, DEFAULT_KEY)
            .or_else(|| directive_value(overrides, DEFAULT_KEY))
        {
            Some(name) => Some(name),
            None => self.config.default_profile.clone(),
        };
        if let Some(name) = explicit_default {
            self.activator
                .set_default_profile(Profile::new(name.trim()).map_err(LoadError::Core)?)?;
            self.default_overridden = true;
        }

        for name in &self.config.profiles {
            self.activator
                .activate(Profile::new(name.as_str())?, ActivationKind::Programmatic)?;
        }
        for profile in directive_profiles(command_line, ACTIVE_KEY)?
            .into_iter()
            .chain(directive_profiles(overrides, ACTIVE_KEY)?)
        {
            self.activator.activate(profile, ActivationKind::Override)?;
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        if self.config.names.is_empty() {
            vec!["application".to_string()]
        } else {
            self.config.names.clone()
        }
    }

    /// Scans every location for base-name files, collecting directives
    /// forward-only: later documents see the set widened by earlier
    /// ones.
    fn scan_base(&mut self, locations: &[Location]) -> Result<(), LoadError> {
        for (index, location) in locations.iter().enumerate() {
            if location.is_directory() {
                for name in self.names() {
                    for ext in self.registry.extensions() {
                        let relative = format!("{}.{}", name, ext);
                        self.collect(location, index, 0, Some(&relative))?;
                    }
                }
            } else {
                self.collect(location, index, 0, None)?;
            }
        }
        Ok(())
    }

    /// Loads profile-variant files (`{name}-{profile}.{ext}`) for
    /// every matching profile, in activation order. Variants may
    /// activate further profiles; those are queued and processed
    /// once each.
    fn scan_variants(&mut self, locations: &[Location]) -> Result<(), LoadError> {
        let mut queue: Vec<Profile> = self.activator.matching_profiles();
        let mut position = 0;

        while position < queue.len() {
            let profile = queue[position].clone();
            let stage = 1 + position;

            for (index, location) in locations.iter().enumerate() {
                if location.is_directory() {
                    for name in self.names() {
                        for ext in self.registry.extensions() {
                            let relative = format!("{}-{}.{}", name, profile, ext);
                            self.collect(location, index, stage, Some(&relative))?;
                        }
                    }
                } else if let Some(variant) = location.variant(profile.as_str()) {
                    self.collect_variant(&variant, location, index, stage)?;
                }
            }

            for active in self.activator.active() {
                if !queue.contains(active) {
                    queue.push(active.clone());
                }
            }
            position += 1;
        }
        Ok(())
    }

    /// Reads and collects one candidate file of a location.
    fn collect(
        &mut self,
        location: &Location,
        location_index: usize,
        stage: usize,
        relative: Option<&str>,
    ) -> Result<(), LoadError> {
        let resolved = match relative {
            Some(relative) => self.reader.read_relative(location, relative)?,
            None => self.reader.read(location)?,
        };
        let Some(resolved) = resolved else {
            return Ok(());
        };

        let format = self
            .registry
            .format_for_path(std::path::Path::new(&resolved.display))
            .ok_or_else(|| {
                LoadError::unsupported_format(
                    location.declared(),
                    location.extension().unwrap_or(""),
                )
            })?;

        self.found[location_index] = true;
        self.collect_resolved(resolved, format, location_index, stage, location.declared())
    }

    /// Reads a profile variant of a concrete file location. The
    /// declared location in display names stays the configured one.
    fn collect_variant(
        &mut self,
        variant: &Location,
        declared: &Location,
        location_index: usize,
        stage: usize,
    ) -> Result<(), LoadError> {
        let Some(resolved) = self.reader.read(variant)? else {
            return Ok(());
        };
        let format = self
            .registry
            .format_for_path(std::path::Path::new(&resolved.display))
            .ok_or_else(|| {
                LoadError::unsupported_format(variant.declared(), variant.extension().unwrap_or(""))
            })?;

        self.found[location_index] = true;
        self.collect_resolved(resolved, format, location_index, stage, declared.declared())
    }

    /// Parses a resolved file and folds its documents into the run:
    /// match against the current set, apply directives from matched
    /// documents, remember everything for assembly.
    fn collect_resolved(
        &mut self,
        resolved: ResolvedFile,
        format: ConfigFormat,
        location_index: usize,
        stage: usize,
        declared: &str,
    ) -> Result<(), LoadError> {
        let parser = self
            .registry
            .parser_for(format)
            .ok_or_else(|| LoadError::unsupported_format(declared, ""))?;
        let documents = parser.parse(&resolved.content, &resolved.display)?;
        let multi = documents.len() > 1;

        for doc in documents {
            let matching = self.activator.matching_profiles();
            let matched = doc.matches(&matching);
            debug!(
                source = %resolved.display,
                document = %doc.parser_name(),
                matched,
                "scanned document"
            );

            if matched {
                for profile in doc.active.iter().chain(doc.include.iter()) {
                    if self
                        .activator
                        .activate(profile.clone(), ActivationKind::Document)?
                    {
                        debug!(profile = %profile, source = %resolved.display, "profile activated");
                    }
                }
                if let Some(default) = &doc.default_profile {
                    if !self.default_overridden {
                        self.activator.set_default_profile(default.clone())?;
                        self.default_overridden = true;
                    }
                }
            }

            self.collected.push(Collected {
                doc,
                matched,
                location_index,
                stage,
                display: resolved.display.clone(),
                declared: declared.to_string(),
                multi,
            });
        }
        Ok(())
    }

    /// A missing location is an error only when it is the single
    /// configured location and the loader was told it is required.
    fn check_required(&self, locations: &[Location]) -> Result<(), LoadError> {
        if self.config.required && locations.len() == 1 && !self.found[0] {
            return Err(LoadError::location_not_found(locations[0].declared()));
        }
        Ok(())
    }
}

fn directive_value(source: &PropertySource, key: &str) -> Option<String> {
    source.get(key).map(|value| value.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoaderConfig::default();
        assert_eq!(config.locations, vec!["./", "./config/"]);
        assert_eq!(config.names, vec!["application"]);
        assert!(!config.required);
    }

    #[test]
    fn test_comma_separated_locations_split_in_order() {
        let loader = ConfigLoader::new(LoaderConfig {
            locations: vec!["classpath:a/,classpath:b/".into()],
            additional_locations: vec!["classpath:c/".into()],
            ..LoaderConfig::default()
        });

        let locations = loader.parse_locations().unwrap();
        let declared: Vec<&str> = locations.iter().map(Location::declared).collect();
        assert_eq!(declared, vec!["classpath:a/", "classpath:b/", "classpath:c/"]);
    }

    #[test]
    fn test_explicit_location_with_unknown_extension_fails_fast() {
        let loader = ConfigLoader::new(LoaderConfig {
            locations: vec!["classpath:application.unknown".into()],
            ..LoaderConfig::default()
        });

        let err = loader.parse_locations().unwrap_err();
        assert!(err.is_unsupported_format());
        assert!(err.to_string().contains("application.unknown"));
    }

    #[test]
    fn test_unknown_directory_location_is_allowed() {
        // A trailing slash means convention scanning, which skips
        // silently whatever it does not recognize.
        let loader = ConfigLoader::new(LoaderConfig {
            locations: vec!["classpath:application.unknown/".into()],
            ..LoaderConfig::default()
        });

        assert!(loader.parse_locations().is_ok());
        assert!(loader.load().is_ok());
    }

    #[test]
    fn test_directive_profiles_comma_and_brackets() {
        let comma = PropertySource::new("s").with(ACTIVE_KEY, "dev, other");
        let names: Vec<String> = directive_profiles(&comma, ACTIVE_KEY)
            .unwrap()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["dev", "other"]);

        let brackets = PropertySource::new("s")
            .with("profiles.active[0]", "dev")
            .with("profiles.active[1]", "other");
        let names: Vec<String> = directive_profiles(&brackets, ACTIVE_KEY)
            .unwrap()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["dev", "other"]);
    }
}
