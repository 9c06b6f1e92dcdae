//! Test configuration via `resilience.toml`
//!
//! Every field has a default, so an empty file (or no file at all) runs the
//! KV store plan with the stock timing.

use crate::error::{ConfigError, DelayError};
use crate::plan::{PlanProfile, TestPlan, RESET_DELAY_BASE_SECS, RESET_DELAY_JITTER_SECS};
use crate::types::BackendType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "resilience.toml";

/// Device-side test timeout, in seconds.
pub const DEFAULT_EVENT_TIMEOUT_SECS: f64 = 2400.0;

/// Pre-reset delay parameters, in seconds.
///
/// The delay before each reset is `base + U[0, jitter)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayParams {
    /// Fixed part of the delay
    pub base_secs: f64,
    /// Upper bound of the random part
    pub jitter_secs: f64,
}

impl Default for DelayParams {
    fn default() -> Self {
        DelayParams {
            base_secs: RESET_DELAY_BASE_SECS,
            jitter_secs: RESET_DELAY_JITTER_SECS,
        }
    }
}

impl DelayParams {
    /// Create delay parameters.
    pub fn new(base_secs: f64, jitter_secs: f64) -> Self {
        DelayParams {
            base_secs,
            jitter_secs,
        }
    }

    /// Validate delay parameters.
    pub fn validate(&self) -> Result<(), DelayError> {
        if !self.base_secs.is_finite() || self.base_secs < 0.0 {
            return Err(DelayError::InvalidBase(self.base_secs));
        }
        if !self.jitter_secs.is_finite() || self.jitter_secs < 0.0 {
            return Err(DelayError::InvalidJitter(self.jitter_secs));
        }
        Ok(())
    }

    /// Shortest possible delay.
    pub fn min(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_secs).unwrap_or(Duration::MAX)
    }

    /// Exclusive upper bound of the delay (equal to `min` without jitter).
    pub fn max(&self) -> Duration {
        Duration::try_from_secs_f64(self.base_secs + self.jitter_secs).unwrap_or(Duration::MAX)
    }
}

/// Resilience test configuration loaded from `resilience.toml`.
///
/// # Example
///
/// ```toml
/// profile = "kvstore"
/// reset_count = 6
/// backends = ["Internal", "File-System"]
/// delay_base_secs = 4.0
/// delay_jitter_secs = 2.0
/// seed = 42
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceConfig {
    /// Plan profile: `"kvstore"` (default) or `"storagelite"`.
    #[serde(default = "default_profile_str")]
    pub profile: String,
    /// Reset cycles per target; the profile default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_count: Option<u32>,
    /// Backends to cycle, in order (kvstore only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backends: Option<Vec<String>>,
    /// Fixed part of the pre-reset delay.
    #[serde(default = "default_delay_base")]
    pub delay_base_secs: f64,
    /// Random part of the pre-reset delay.
    #[serde(default = "default_delay_jitter")]
    pub delay_jitter_secs: f64,
    /// RNG seed for reproducible delays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Longest wait for the next device event.
    #[serde(default = "default_event_timeout")]
    pub event_timeout_secs: f64,
}

fn default_profile_str() -> String {
    PlanProfile::KvStore.name().to_string()
}

fn default_delay_base() -> f64 {
    RESET_DELAY_BASE_SECS
}

fn default_delay_jitter() -> f64 {
    RESET_DELAY_JITTER_SECS
}

fn default_event_timeout() -> f64 {
    DEFAULT_EVENT_TIMEOUT_SECS
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            profile: default_profile_str(),
            reset_count: None,
            backends: None,
            delay_base_secs: default_delay_base(),
            delay_jitter_secs: default_delay_jitter(),
            seed: None,
            event_timeout_secs: default_event_timeout(),
        }
    }
}

impl ResilienceConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# KV store resilience test configuration
#
# Plan profile: "kvstore" (default) or "storagelite"
#   "kvstore"     = format/init/verify/run/reset for every KV store backend
#   "storagelite" = format/init/run/reset for a single StorageLite target
profile = "kvstore"

# Reset cycles per target (default: 6 for kvstore, 10 for storagelite)
# reset_count = 6

# Backends exercised by the kvstore profile, in order
# backends = ["Internal", "TDB-External", "File-System"]

# Pause between "run" and the forced reset: base + uniform(0, jitter) seconds
delay_base_secs = 4.0
delay_jitter_secs = 2.0

# Seed for reproducible pre-reset delays (default: random)
# seed = 42

# Longest wait for the next device event, in seconds
event_timeout_secs = 2400.0
"#
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ResilienceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `true` if the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(true)
    }

    /// Check every field eagerly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_plan()?;
        self.delay_params().validate()?;
        self.event_timeout()?;
        Ok(())
    }

    /// Parse the profile string.
    pub fn plan_profile(&self) -> Result<PlanProfile, ConfigError> {
        PlanProfile::from_name(&self.profile)
            .ok_or_else(|| ConfigError::InvalidProfile(self.profile.clone()))
    }

    /// Build and validate the test plan described by this config.
    pub fn to_plan(&self) -> Result<TestPlan, ConfigError> {
        let mut plan = TestPlan::new(self.plan_profile()?);
        if let Some(reset_count) = self.reset_count {
            plan = plan.with_reset_count(reset_count);
        }
        if let Some(names) = &self.backends {
            let backends = names
                .iter()
                .map(|name| name.parse::<BackendType>())
                .collect::<Result<Vec<_>, _>>()?;
            plan = plan.with_backends(&backends)?;
        }
        plan.validate()?;
        Ok(plan)
    }

    /// Pre-reset delay parameters.
    pub fn delay_params(&self) -> DelayParams {
        DelayParams::new(self.delay_base_secs, self.delay_jitter_secs)
    }

    /// Idle window for event delivery.
    pub fn event_timeout(&self) -> Result<Duration, ConfigError> {
        let secs = self.event_timeout_secs;
        if secs <= 0.0 {
            return Err(ConfigError::InvalidTimeout(secs));
        }
        Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(secs))
    }
}
