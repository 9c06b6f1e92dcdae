//! End-to-end tests for the resilience driver.
//!
//! These tests run whole plans against a simulated device on its own thread,
//! fed through the same channel-based session the host framework uses.
//! Unit tests in crates/ cover the state machine step by step; these cover
//! the outcome of complete runs, healthy and faulty.

#[path = "../common/mod.rs"]
mod common;

mod config_files;
mod device_faults;
mod end_to_end;
