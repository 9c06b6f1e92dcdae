//! Driver error types
//!
//! Every way a run can end without `exit("pass")` maps to one variant here.
//! Only [`DriverError::ProtocolViolation`] comes from the device; the rest
//! describe the event source or a bad setup.

use resilience_core::{ConfigError, DelayError, EventLabel, PlanError, ProtocolViolation};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors raised while driving a resilience run
#[derive(Debug, Error)]
pub enum DriverError {
    /// Device emitted an event out of the expected order
    #[error(transparent)]
    ProtocolViolation(#[from] ProtocolViolation),

    /// Event delivered before `start()`
    #[error("Event delivered before the driver was started")]
    NotArmed,

    /// Event source ran dry before the plan completed
    #[error("Event stream ended while waiting for '{expected}'")]
    StreamEnded {
        /// Label the cursor was waiting for
        expected: EventLabel,
    },

    /// No event arrived within the idle window
    #[error("No event within {waited:?} while waiting for '{expected}'")]
    Timeout {
        /// Label the cursor was waiting for
        expected: EventLabel,
        /// Idle window that elapsed
        waited: Duration,
    },

    /// Invalid test plan
    #[error("Invalid test plan: {0}")]
    Plan(#[from] PlanError),

    /// Invalid delay parameters
    #[error("Invalid reset delay: {0}")]
    Delay(#[from] DelayError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl DriverError {
    /// The protocol violation behind this error, if any.
    pub fn violation(&self) -> Option<&ProtocolViolation> {
        match self {
            DriverError::ProtocolViolation(v) => Some(v),
            _ => None,
        }
    }
}
