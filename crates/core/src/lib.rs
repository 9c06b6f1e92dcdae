//! Core types for the KV store resilience test
//!
//! This crate defines the vocabulary shared by the driver and its tooling:
//! - BackendType: storage-engine variant under test
//! - Event / EventLabel: notifications emitted by the device
//! - Command: instructions sent to the device
//! - TestPlan / PlanProfile: ordered targets times reset cycles
//! - ResilienceConfig: `resilience.toml` configuration
//! - Error types: protocol, plan, delay and config errors

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod plan;
pub mod types;

pub use config::{DelayParams, ResilienceConfig, CONFIG_FILE_NAME, DEFAULT_EVENT_TIMEOUT_SECS};
pub use error::{ConfigError, DelayError, PlanError, ProtocolViolation, UnknownLabel};
pub use plan::{
    PlanProfile, PlanTarget, TestPlan, RESET_COUNT, RESET_DELAY_BASE_SECS,
    RESET_DELAY_JITTER_SECS, STORAGELITE_RESET_COUNT,
};
pub use types::{
    BackendType, Command, CommandArg, CommandName, Event, EventLabel, UnknownBackend,
    PASS_TOKEN, SYNC_TOKEN, VALUE_PLACEHOLDER,
};
