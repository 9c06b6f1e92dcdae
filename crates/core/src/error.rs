//! Error types for the resilience test
//!
//! This module defines the error types shared by the driver and its tooling.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::{EventLabel, UnknownBackend};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Label received from the device is not part of the protocol vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown event label '{0}'")]
pub struct UnknownLabel(pub String);

/// The device emitted an event out of the expected order
///
/// This is the only protocol error. A crashed device, garbage on the
/// channel, and reordered events all surface as this one variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Protocol violation: expected '{expected}', got '{received}' \
     (target {target}, cycle {cycle})"
)]
pub struct ProtocolViolation {
    /// Label the cursor was waiting for
    pub expected: EventLabel,
    /// Label actually delivered
    pub received: EventLabel,
    /// Plan target (backend name or placeholder) in progress
    pub target: String,
    /// Reset cycle in progress
    pub cycle: u32,
}

/// Invalid test plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// At least one reset cycle per target is required
    #[error("Reset count must be at least 1")]
    ZeroResetCount,

    /// The plan has nothing to exercise
    #[error("Test plan has no targets")]
    NoTargets,

    /// Backend list was given for a profile with a fixed target
    #[error("Profile '{0}' does not accept a backend list")]
    BackendsNotSupported(&'static str),
}

/// Invalid pre-reset delay parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DelayError {
    /// Base delay is negative or not finite
    #[error("Delay base must be a finite, non-negative number of seconds, got {0}")]
    InvalidBase(f64),

    /// Jitter is negative or not finite
    #[error("Delay jitter must be a finite, non-negative number of seconds, got {0}")]
    InvalidJitter(f64),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Failed to access config file '{path}': {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Unknown profile name
    #[error("Invalid profile '{0}'. Expected \"kvstore\" or \"storagelite\".")]
    InvalidProfile(String),

    /// Unknown backend name in `backends`
    #[error(transparent)]
    InvalidBackend(#[from] UnknownBackend),

    /// Plan built from the config is invalid
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Delay parameters are invalid
    #[error(transparent)]
    Delay(#[from] DelayError),

    /// Event timeout is zero, negative or not finite
    #[error("Event timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),
}
