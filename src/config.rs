//! # Performance Options
//!
//! Configuration consumed by the timeline engine: the speed factor, the
//! ornament threshold passed through to chords, the cyclic role assignment
//! over voices and the assistant-only switch.
//!
//! Options are read from a small YAML document with kebab-case keys. Every
//! key is optional:
//!
//! ```yaml
//! speed-factor: 1.5
//! ornament-min-duration: 40
//! roles: [live-performer, assistant, none]
//! assistant-only: false
//! start-position: 0
//! ```
//!
//! `validate()` is the only place a speed factor is checked; the engine
//! assumes a positive factor once options have been validated.

use serde::{Deserialize, Serialize};

use crate::error::MomentsError;

/// What happens to a voice during a performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Silent: the voice appears in neither schedule
    None,
    /// Played automatically by the assistant
    Assistant,
    /// Played live by the human performer
    #[default]
    LivePerformer,
}

impl Role {
    /// Apply the assistant-only remap: live voices are handed to the assistant
    pub fn resolve(self, assistant_only: bool) -> Role {
        match self {
            Role::LivePerformer if assistant_only => Role::Assistant,
            other => other,
        }
    }
}

/// Roles over voices, reused cyclically when shorter than the voice list.
///
/// # Example
/// ```
/// use moments::{Role, RoleAssignment};
///
/// let roles = RoleAssignment::new(vec![Role::LivePerformer, Role::Assistant]);
/// assert_eq!(roles.role_for(0), Role::LivePerformer);
/// assert_eq!(roles.role_for(3), Role::Assistant);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleAssignment(Vec<Role>);

impl RoleAssignment {
    pub fn new(roles: Vec<Role>) -> Self {
        RoleAssignment(roles)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `roles[voice_index mod len]`; an empty assignment silences everything
    pub fn role_for(&self, voice_index: usize) -> Role {
        if self.0.is_empty() {
            return Role::None;
        }
        self.0[voice_index % self.0.len()]
    }

    /// True when the voice count is not a whole number of assignment cycles
    pub fn wraps_unevenly(&self, voice_count: usize) -> bool {
        !self.0.is_empty() && voice_count > self.0.len() && voice_count % self.0.len() != 0
    }
}

impl Default for RoleAssignment {
    fn default() -> Self {
        RoleAssignment(vec![Role::LivePerformer])
    }
}

/// Options for one build pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PerformanceOptions {
    /// Notated milliseconds are divided by this factor
    pub speed_factor: f64,
    /// Ornament threshold in ms, carried on every chord untouched
    pub ornament_min_duration: u32,
    pub roles: RoleAssignment,
    /// Hand every live-performer voice to the assistant
    pub assistant_only: bool,
    /// Notated position (ms) the performance starts from; earlier items are dropped
    pub start_position: u32,
}

impl Default for PerformanceOptions {
    fn default() -> Self {
        PerformanceOptions {
            speed_factor: 1.0,
            ornament_min_duration: 0,
            roles: RoleAssignment::default(),
            assistant_only: false,
            start_position: 0,
        }
    }
}

impl PerformanceOptions {
    /// Parse options from a YAML document
    pub fn from_yaml(source: &str) -> Result<Self, MomentsError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: PerformanceOptions = serde_yaml::from_str(source)?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), MomentsError> {
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(MomentsError::ConfigError(format!(
                "speed-factor must be a finite number greater than 0 (got {})",
                self.speed_factor
            )));
        }
        if self.roles.is_empty() {
            return Err(MomentsError::ConfigError(
                "roles must list at least one role".to_string(),
            ));
        }
        Ok(())
    }
}
