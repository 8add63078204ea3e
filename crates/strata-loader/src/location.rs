//! Configuration location strings and filesystem access.
//!
//! A location is either a directory to scan by convention (trailing
//! `/`) or one concrete file. Three spellings are accepted:
//! `file:relative/or/absolute`, `classpath:path` (resolved against the
//! loader's search roots), and a bare path treated as
//! filesystem-relative. Reads are scoped: open, read fully, close on
//! every exit path.

use crate::error::LoadError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Classpath,
    File,
    Bare,
}

/// One parsed location string.
#[derive(Debug, Clone)]
pub struct Location {
    declared: String,
    scheme: Scheme,
    /// Scheme-stripped path, without leading or trailing separators.
    path: String,
    directory: bool,
}

impl Location {
    /// Parses a location string. Never fails: unknown schemes are
    /// treated as bare paths.
    pub fn parse(raw: &str) -> Self {
        let declared = raw.to_string();
        let (scheme, rest) = if let Some(rest) = raw.strip_prefix("classpath:") {
            (Scheme::Classpath, rest)
        } else if let Some(rest) = raw.strip_prefix("file:") {
            (Scheme::File, rest)
        } else {
            (Scheme::Bare, raw)
        };

        let directory = rest.is_empty() || rest.ends_with('/');
        let path = rest.trim_start_matches('/').trim_end_matches('/').to_string();

        Self {
            declared,
            scheme,
            path,
            directory,
        }
    }

    /// The location string exactly as configured.
    pub fn declared(&self) -> &str {
        &self.declared
    }

    /// Returns true if this location is scanned by convention.
    pub fn is_directory(&self) -> bool {
        self.directory
    }

    /// Extension of a file location (directories have none).
    pub fn extension(&self) -> Option<&str> {
        if self.directory {
            return None;
        }
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
    }

    /// File name of a concrete file location, with the given profile
    /// inserted before the extension (`app.yml` -> `app-dev.yml`).
    pub fn file_variant(&self, profile: &str) -> Option<String> {
        if self.directory {
            return None;
        }
        let path = Path::new(&self.path);
        let stem = path.file_stem()?.to_str()?;
        let ext = path.extension()?.to_str()?;
        let parent = path.parent().and_then(|p| p.to_str()).unwrap_or("");
        let name = format!("{}-{}.{}", stem, profile, ext);
        Some(if parent.is_empty() {
            name
        } else {
            format!("{}/{}", parent, name)
        })
    }

    /// Profile variant of a concrete file location, as a location of
    /// its own (`file:conf/app.yml` -> `file:conf/app-dev.yml`).
    pub fn variant(&self, profile: &str) -> Option<Location> {
        let path = self.file_variant(profile)?;
        let declared = match self.scheme {
            Scheme::Classpath => format!("classpath:{}", path),
            Scheme::File => format!("file:{}", path),
            Scheme::Bare => path.clone(),
        };
        Some(Location {
            declared,
            scheme: self.scheme,
            path,
            directory: false,
        })
    }

    /// Deterministic display form of a path contained in (or equal
    /// to) this location, keeping the declared scheme.
    fn display_of(&self, relative: &str) -> String {
        let joined = join(&self.path, relative);
        match self.scheme {
            Scheme::Classpath => format!("classpath:{}", joined),
            Scheme::File => format!("file:{}", joined),
            Scheme::Bare => joined,
        }
    }

    /// Filesystem candidates for a contained path, in probe order.
    fn fs_candidates(&self, relative: &str, roots: &[PathBuf]) -> Vec<PathBuf> {
        let joined = join(&self.path, relative);
        match self.scheme {
            Scheme::Classpath => roots.iter().map(|root| root.join(&joined)).collect(),
            Scheme::File | Scheme::Bare => vec![PathBuf::from(joined)],
        }
    }
}

fn join(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", base, relative)
    }
}

/// A file resolved to its content and deterministic display name.
#[derive(Debug)]
pub struct ResolvedFile {
    /// Scheme-preserving display path, used in property source names.
    pub display: String,
    /// Full file content.
    pub content: String,
}

/// Reads files beneath locations, resolving `classpath:` locations
/// against the configured search roots.
#[derive(Debug)]
pub struct FileReader {
    roots: Vec<PathBuf>,
}

impl FileReader {
    /// Creates a reader with the given classpath search roots.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        let roots = if roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            roots
        };
        Self { roots }
    }

    /// Reads a file named `relative` beneath a directory location.
    /// Returns `None` if no candidate exists.
    pub fn read_relative(
        &self,
        location: &Location,
        relative: &str,
    ) -> Result<Option<ResolvedFile>, LoadError> {
        for candidate in location.fs_candidates(relative, &self.roots) {
            if let Some(content) = read_if_exists(&candidate)? {
                debug!(path = %candidate.display(), "loaded config file");
                return Ok(Some(ResolvedFile {
                    display: location.display_of(relative),
                    content,
                }));
            }
        }
        Ok(None)
    }

    /// Reads a concrete file location itself.
    pub fn read(&self, location: &Location) -> Result<Option<ResolvedFile>, LoadError> {
        self.read_relative(location, "")
    }
}

/// Scoped read: the handle is closed on all exit paths, including
/// errors. Missing files and directories-in-file-position report as
/// absent rather than failing.
fn read_if_exists(path: &Path) -> Result<Option<String>, LoadError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) if path.is_dir() => {
            debug!(path = %path.display(), ?err, "skipping directory in file position");
            Ok(None)
        },
        Err(err) => Err(err.into()),
    }
}
