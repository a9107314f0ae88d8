//! Tunable parameters for path search and trail generation.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default distance between consecutive trail poses, in map units.
pub const DEFAULT_STEP_SIZE: f64 = 0.5;

/// Default upper bound on the number of poses in one trail.
pub const DEFAULT_MAX_TRAIL_POSES: usize = 100_000;

fn default_step_size() -> f64 {
    DEFAULT_STEP_SIZE
}

fn default_max_poses() -> usize {
    DEFAULT_MAX_TRAIL_POSES
}

/// Parameters controlling A* path search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of anchors to expand before giving up.
    ///
    /// `None` searches until the frontier is exhausted.
    #[serde(default)]
    pub max_expansions: Option<usize>,
}

/// Parameters controlling trail generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailParams {
    /// Distance between consecutive poses along the path.
    #[serde(default = "default_step_size")]
    pub step_size: f64,

    /// Largest number of poses a single trail may hold.
    ///
    /// Generation fails instead of allocating when the path length divided
    /// by `step_size` would exceed it.
    #[serde(default = "default_max_poses")]
    pub max_poses: usize,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            max_poses: DEFAULT_MAX_TRAIL_POSES,
        }
    }
}

/// Combined navigation settings, as loaded from a JSON document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Path search settings.
    #[serde(default)]
    pub search: SearchParams,

    /// Trail generation settings.
    #[serde(default)]
    pub trail: TrailParams,
}

impl NavigationConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this schema,
    /// or if a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the trail step size is not positive and finite,
    /// or if the pose limit or expansion budget is zero.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let step = self.trail.step_size;
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "trail.step_size must be positive and finite, got {step}"
            )));
        }
        if self.trail.max_poses == 0 {
            return Err(ConfigError::Invalid(
                "trail.max_poses must be at least 1".into(),
            ));
        }
        if self.search.max_expansions == Some(0) {
            return Err(ConfigError::Invalid(
                "search.max_expansions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::NavGraphError;

    #[test]
    fn empty_document_uses_defaults() {
        let config = NavigationConfig::from_json("{}").unwrap();
        assert_eq!(config, NavigationConfig::default());
        assert!((config.trail.step_size - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.search.max_expansions, None);
        assert_eq!(config.trail.max_poses, DEFAULT_MAX_TRAIL_POSES);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let json = r#"{"trail": {"step_size": 0.25}, "search": {"max_expansions": 64}}"#;
        let config = NavigationConfig::from_json(json).unwrap();
        assert!((config.trail.step_size - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.search.max_expansions, Some(64));
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = NavigationConfig::from_json(r#"{"trail": {"step_size": 0.0}}"#).unwrap_err();
        assert!(matches!(err, NavGraphError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn pose_limit_is_configurable() {
        let config = NavigationConfig::from_json(r#"{"trail": {"max_poses": 500}}"#).unwrap();
        assert_eq!(config.trail.max_poses, 500);
        assert!((config.trail.step_size - DEFAULT_STEP_SIZE).abs() < f64::EPSILON);

        let err = NavigationConfig::from_json(r#"{"trail": {"max_poses": 0}}"#).unwrap_err();
        assert!(matches!(err, NavGraphError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_budget() {
        let err = NavigationConfig::from_json(r#"{"search": {"max_expansions": 0}}"#).unwrap_err();
        assert!(matches!(err, NavGraphError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = NavigationConfig::from_json("{ trail: ").unwrap_err();
        assert!(matches!(err, NavGraphError::Serialization(_)));
    }
}
