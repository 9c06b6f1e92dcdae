//! Host-side driver for the KV store resilience test
//!
//! This crate sequences the device through format, init, verify, write and
//! forced-reset steps, validating every event the device reports:
//!
//! - Driver: explicit state machine with a single cursor into the test plan
//! - DeviceLink / Sleeper: collaborator seams owned by the host framework
//! - ResetDelay: randomized pause between a write and the reset
//! - Session: event pump that maps the end of the event source to an outcome
//! - Testing: recording doubles and a reference script of a compliant run

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod delay;
pub mod driver;
pub mod error;
pub mod link;
pub mod session;
pub mod testing;

pub use delay::{NoopSleeper, ResetDelay, Sleeper, ThreadSleeper};
pub use driver::{Awaiting, Cursor, Driver, Progress, RunStatus};
pub use error::{DriverError, Result};
pub use link::{DeviceLink, LoggingLink};
pub use session::{Session, Verdict};
