//! Parsed configuration documents.
//!
//! A [`Document`] is the unit the load pipeline works with: the flat
//! entries of one document of one file, plus the profile directives
//! extracted from the reserved keys. Reserved keys never reach the
//! assembled property sources.

use crate::error::LoadError;
use crate::format::ConfigFormat;
use indexmap::IndexMap;
use strata_core::profiles::parse_profile_list;
use strata_core::{OriginTrackedValue, Profile, ProfileExpression};

/// Reserved key carrying a document's matching expression.
pub const PROFILES_KEY: &str = "profiles";
/// Reserved key activating profiles from a matched document.
pub const ACTIVE_KEY: &str = "profiles.active";
/// Reserved key including additional profiles from a matched document.
pub const INCLUDE_KEY: &str = "profiles.include";
/// Reserved key configuring the default profile name.
pub const DEFAULT_KEY: &str = "profiles.default";

/// One parsed configuration document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Flat entries, reserved keys stripped. Order is textual order.
    pub entries: IndexMap<String, OriginTrackedValue>,
    /// The document's matching expression, if it declared one.
    pub profile_expression: Option<ProfileExpression>,
    /// Profiles this document activates when matched.
    pub active: Vec<Profile>,
    /// Profiles this document includes when matched.
    pub include: Vec<Profile>,
    /// Default profile name declared by this document, if any.
    pub default_profile: Option<Profile>,
    /// Format the document was parsed from.
    pub format: ConfigFormat,
    /// Identifier of the containing source (file path or name).
    pub source_name: String,
    /// 0-based index of this document within its file.
    pub index: usize,
}

impl Document {
    /// Builds a document from freshly parsed entries, extracting and
    /// stripping the reserved directive keys.
    pub fn from_entries(
        mut entries: IndexMap<String, OriginTrackedValue>,
        format: ConfigFormat,
        source_name: impl Into<String>,
        index: usize,
    ) -> Result<Self, LoadError> {
        let profile_expression = extract_expression(&mut entries)?;
        let active = extract_profiles(&mut entries, ACTIVE_KEY)?;
        let include = extract_profiles(&mut entries, INCLUDE_KEY)?;
        let default_profile = match entries.shift_remove(DEFAULT_KEY) {
            Some(value) => Some(Profile::new(value.render().trim())?),
            None => None,
        };

        Ok(Self {
            entries,
            profile_expression,
            active,
            include,
            default_profile,
            format,
            source_name: source_name.into(),
            index,
        })
    }

    /// Deterministic parser-level display name:
    /// `"<format> [<profiles-or-(default)>]"`.
    pub fn parser_name(&self) -> String {
        let profiles = self
            .profile_expression
            .as_ref()
            .map_or("(default)", |expr| expr.as_str());
        format!("{} [{}]", self.format, profiles)
    }

    /// Returns true if the document matches the given active set.
    ///
    /// A document with no expression always matches.
    pub fn matches(&self, active: &[Profile]) -> bool {
        self.profile_expression
            .as_ref()
            .is_none_or(|expr| expr.matches(active))
    }

    /// Returns true if the matching expression negates any profile.
    pub fn has_negation(&self) -> bool {
        self.profile_expression
            .as_ref()
            .is_some_and(ProfileExpression::has_negation)
    }
}

/// Extracts the `profiles` matching expression: a scalar value, or a
/// bracket-indexed list treated as a disjunction of alternatives.
fn extract_expression(
    entries: &mut IndexMap<String, OriginTrackedValue>,
) -> Result<Option<ProfileExpression>, LoadError> {
    if let Some(value) = entries.shift_remove(PROFILES_KEY) {
        return Ok(Some(ProfileExpression::parse(value.render().trim())?));
    }

    let mut alternatives = Vec::new();
    while let Some(value) = entries.shift_remove(&format!("{}[{}]", PROFILES_KEY, alternatives.len()))
    {
        alternatives.push(ProfileExpression::parse(value.render().trim())?);
    }

    if alternatives.is_empty() {
        Ok(None)
    } else {
        Ok(Some(ProfileExpression::any(alternatives)?))
    }
}

/// Extracts a profile list directive: either a comma-separated scalar
/// or a bracket-indexed list.
fn extract_profiles(
    entries: &mut IndexMap<String, OriginTrackedValue>,
    key: &str,
) -> Result<Vec<Profile>, LoadError> {
    if let Some(value) = entries.shift_remove(key) {
        return Ok(parse_profile_list(&value.render())?);
    }

    let mut profiles = Vec::new();
    while let Some(value) = entries.shift_remove(&format!("{}[{}]", key, profiles.len())) {
        profiles.push(Profile::new(value.render().trim())?);
    }
    Ok(profiles)
}
