//! kvstore-resilience - host-side driver for KV storage reset-resilience tests
//!
//! Repeatedly formats a storage backend on the device under test, has it
//! write data, forces an abrupt reset, and verifies that committed data
//! survived, for every backend in the plan.
//!
//! # Quick Start
//!
//! ```ignore
//! use kvstore_resilience::{Driver, ResilienceConfig, Session, ThreadSleeper};
//!
//! let config = ResilienceConfig::from_file("resilience.toml".as_ref())?;
//! let driver = Driver::from_config(&config, my_link, ThreadSleeper)?;
//! let verdict = Session::new(driver).run_channel(&events, config.event_timeout()?)?;
//! ```
//!
//! # Architecture
//!
//! The device link, reset line and event parsing belong to the host test
//! framework and are reached through [`DeviceLink`] and an event source.
//! Only the protocol state machine and its tooling live here.

pub use resilience_driver::*;

pub use resilience_core::{
    BackendType, Command, CommandArg, CommandName, ConfigError, DelayError, DelayParams, Event,
    EventLabel, PlanError, PlanProfile, PlanTarget, ProtocolViolation, ResilienceConfig, TestPlan,
    UnknownBackend, UnknownLabel, CONFIG_FILE_NAME, DEFAULT_EVENT_TIMEOUT_SECS, PASS_TOKEN,
    RESET_COUNT, RESET_DELAY_BASE_SECS, RESET_DELAY_JITTER_SECS, STORAGELITE_RESET_COUNT,
    SYNC_TOKEN, VALUE_PLACEHOLDER,
};
