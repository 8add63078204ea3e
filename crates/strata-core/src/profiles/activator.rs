//! Profile activation state machine.
//!
//! One activator instance accompanies one environment build. It starts
//! in `Collecting` while sources are scanned for activation
//! directives, passes through `Resolving` while the collected
//! requests are merged, and ends `Finalized` with the active list
//! frozen. Two concurrent builds never share an activator.

use crate::error::{Result, StrataError};
use crate::profiles::Profile;

/// Where an activation request came from.
///
/// Requests are applied in precedence order by the caller:
/// programmatic first, then the explicit external override
/// (`profiles.active` from the command line or system layer), then
/// file-declared directives in document order. The resulting list
/// order is first-activation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKind {
    /// Set programmatically before any load.
    Programmatic,
    /// Supplied via the explicit external override property.
    Override,
    /// Declared by an `active`/`include` directive in a matched document.
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Collecting,
    Resolving,
    Finalized,
}

/// Collects profile activation requests and freezes the final list.
///
/// # Example
///
/// ```
/// use strata_core::{ActivationKind, Profile, ProfileActivator};
///
/// let mut activator = ProfileActivator::new();
/// activator.activate(Profile::new("x").unwrap(), ActivationKind::Programmatic).unwrap();
/// activator.activate(Profile::new("y").unwrap(), ActivationKind::Document).unwrap();
/// activator.finalize().unwrap();
///
/// let names: Vec<&str> = activator.active().iter().map(Profile::as_str).collect();
/// assert_eq!(names, vec!["x", "y"]);
/// ```
#[derive(Debug)]
pub struct ProfileActivator {
    state: State,
    active: Vec<Profile>,
    kinds: Vec<ActivationKind>,
    default_profile: Profile,
}

impl ProfileActivator {
    /// Creates a new activator with the reserved fallback default
    /// profile.
    pub fn new() -> Self {
        Self {
            state: State::Collecting,
            active: Vec::new(),
            kinds: Vec::new(),
            default_profile: Profile::default_profile(),
        }
    }

    /// Configures the default profile name.
    ///
    /// The default profile only participates in matching when the
    /// active list is empty after all activations; it is never
    /// reported as active.
    pub fn set_default_profile(&mut self, profile: Profile) -> Result<()> {
        if self.state != State::Collecting {
            return Err(StrataError::invalid_state(
                "default profile cannot change after collection ends",
            ));
        }
        self.default_profile = profile;
        Ok(())
    }

    /// Requests activation of a profile.
    ///
    /// Re-activating an already-active profile is a no-op; the list
    /// keeps first-activation order. Returns true if the profile was
    /// newly added.
    pub fn activate(&mut self, profile: Profile, kind: ActivationKind) -> Result<bool> {
        if self.state != State::Collecting {
            return Err(StrataError::invalid_state(format!(
                "activation of '{}' requested after the active set was finalized",
                profile
            )));
        }
        if self.is_active(profile.as_str()) {
            return Ok(false);
        }
        self.active.push(profile);
        self.kinds.push(kind);
        Ok(true)
    }

    /// Returns true if the named profile is currently active.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|p| p.as_str() == name)
    }

    /// The active list as collected so far (or frozen, once finalized).
    pub fn active(&self) -> &[Profile] {
        &self.active
    }

    /// The profile set documents are matched against.
    ///
    /// The active list, or the default profile alone while nothing is
    /// active.
    pub fn matching_profiles(&self) -> Vec<Profile> {
        if self.active.is_empty() {
            vec![self.default_profile.clone()]
        } else {
            self.active.clone()
        }
    }

    /// The configured default profile.
    pub fn default_profile(&self) -> &Profile {
        &self.default_profile
    }

    /// Freezes the active list. Idempotent calls are rejected.
    pub fn finalize(&mut self) -> Result<()> {
        if self.state != State::Collecting {
            return Err(StrataError::invalid_state("activator already finalized"));
        }
        self.state = State::Resolving;
        // Merging happened incrementally in activation order; the
        // resolving step only has to freeze the result.
        self.state = State::Finalized;
        Ok(())
    }

    /// Returns true once the active list is frozen.
    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    /// Consumes the activator, yielding the frozen list and the
    /// default profile.
    pub fn into_parts(self) -> Result<(Vec<Profile>, Profile)> {
        if self.state != State::Finalized {
            return Err(StrataError::invalid_state(
                "active set read before finalization",
            ));
        }
        Ok((self.active, self.default_profile))
    }
}

impl Default for ProfileActivator {
    fn default() -> Self {
        Self::new()
    }
}
