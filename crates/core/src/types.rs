//! Vocabulary shared between the host driver and the device under test
//!
//! - BackendType: storage-engine variant being exercised
//! - EventLabel / Event: notifications emitted by the device
//! - CommandName / CommandArg / Command: instructions sent to the device
//!
//! Every type renders to the exact token the device-side test application
//! expects on the key/value channel.

use crate::error::UnknownLabel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Synchronization token sent after every reset.
///
/// The device compares it byte-for-byte to reset its session identity,
/// so the (non-canonical) grouping must not be "fixed".
pub const SYNC_TOKEN: &str = "00000000-0000-000000000-000000000000";

/// Argument of the terminal `exit` command on success.
pub const PASS_TOKEN: &str = "pass";

/// Placeholder argument for commands whose value the device ignores.
pub const VALUE_PLACEHOLDER: &str = "0";

// ============================================================================
// Backend Type
// ============================================================================

/// Storage-engine variant under test
///
/// Declaration order is plan order: each backend is formatted and fully
/// cycled before the next one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BackendType {
    /// TDB on internal flash
    #[serde(rename = "Internal")]
    Internal,
    /// TDB on an external block device
    #[serde(rename = "TDB-External")]
    TdbExternal,
    /// File-system backed store
    #[serde(rename = "File-System")]
    FileSystem,
}

impl BackendType {
    /// All backends, in plan order.
    pub const ALL: [BackendType; 3] = [
        BackendType::Internal,
        BackendType::TdbExternal,
        BackendType::FileSystem,
    ];

    /// Name understood by the device-side `format`/`init` handlers.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Internal => "Internal",
            BackendType::TdbExternal => "TDB-External",
            BackendType::FileSystem => "File-System",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown backend type '{0}'. Expected \"Internal\", \"TDB-External\" or \"File-System\".")]
pub struct UnknownBackend(pub String);

impl FromStr for BackendType {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendType::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| UnknownBackend(s.to_string()))
    }
}

// ============================================================================
// Events
// ============================================================================

/// Label of an event emitted by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLabel {
    /// Test application booted and is ready for commands
    Start,
    /// `format` handler finished
    FormatDone,
    /// `init` handler finished
    InitDone,
    /// `verify` handler finished
    VerifyDone,
    /// Device came back from a forced reset
    ResetComplete,
}

impl EventLabel {
    /// Every label the driver understands.
    pub const ALL: [EventLabel; 5] = [
        EventLabel::Start,
        EventLabel::FormatDone,
        EventLabel::InitDone,
        EventLabel::VerifyDone,
        EventLabel::ResetComplete,
    ];

    /// Key as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLabel::Start => "start",
            EventLabel::FormatDone => "format_done",
            EventLabel::InitDone => "init_done",
            EventLabel::VerifyDone => "verify_done",
            EventLabel::ResetComplete => "reset_complete",
        }
    }
}

impl fmt::Display for EventLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventLabel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// A single notification delivered from the device boundary.
///
/// Only `label` participates in validation; `payload` and `timestamp` are
/// carried through for logging and transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event key
    pub label: EventLabel,
    /// Raw value sent alongside the key
    #[serde(default)]
    pub payload: String,
    /// Host-side receive time, in seconds
    #[serde(default)]
    pub timestamp: f64,
}

impl Event {
    /// Create an event with the given label, payload and timestamp.
    pub fn new(label: EventLabel, payload: impl Into<String>, timestamp: f64) -> Self {
        Event {
            label,
            payload: payload.into(),
            timestamp,
        }
    }

    /// Event with the payload the device actually sends (`1`) and no timestamp.
    pub fn bare(label: EventLabel) -> Self {
        Event::new(label, "1", 0.0)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Name of a command sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    /// Erase and reconfigure the storage backend
    Format,
    /// Mount the storage backend without erasing
    Init,
    /// Check that data written by earlier cycles is intact
    Verify,
    /// Start writing data tagged with a cycle index
    Run,
    /// Resynchronize the device session after a reset
    Sync,
    /// Conclude the test run
    Exit,
}

impl CommandName {
    /// Key as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Format => "format",
            CommandName::Init => "init",
            CommandName::Verify => "verify",
            CommandName::Run => "run",
            CommandName::Sync => "__sync",
            CommandName::Exit => "exit",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argument attached to a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandArg {
    /// Free-form token (backend name, sync token, `pass`)
    Text(String),
    /// Reset-cycle index
    Cycle(u32),
}

impl CommandArg {
    /// Text argument.
    pub fn text(value: impl Into<String>) -> Self {
        CommandArg::Text(value.into())
    }
}

impl fmt::Display for CommandArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandArg::Text(s) => f.write_str(s),
            CommandArg::Cycle(n) => write!(f, "{}", n),
        }
    }
}

impl From<BackendType> for CommandArg {
    fn from(backend: BackendType) -> Self {
        CommandArg::Text(backend.as_str().to_string())
    }
}

/// A named command with exactly one argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    /// Command key
    pub name: CommandName,
    /// Command value
    pub arg: CommandArg,
}

impl Command {
    /// `format(<target>)`
    pub fn format(arg: impl Into<CommandArg>) -> Self {
        Command {
            name: CommandName::Format,
            arg: arg.into(),
        }
    }

    /// `init(<target>)`
    pub fn init(arg: impl Into<CommandArg>) -> Self {
        Command {
            name: CommandName::Init,
            arg: arg.into(),
        }
    }

    /// `verify(<cycle>)`
    pub fn verify(cycle: u32) -> Self {
        Command {
            name: CommandName::Verify,
            arg: CommandArg::Cycle(cycle),
        }
    }

    /// `run(<arg>)`
    pub fn run(arg: impl Into<CommandArg>) -> Self {
        Command {
            name: CommandName::Run,
            arg: arg.into(),
        }
    }

    /// `__sync(<SYNC_TOKEN>)`
    pub fn sync() -> Self {
        Command {
            name: CommandName::Sync,
            arg: CommandArg::text(SYNC_TOKEN),
        }
    }

    /// `exit("pass")`
    pub fn exit_pass() -> Self {
        Command {
            name: CommandName::Exit,
            arg: CommandArg::text(PASS_TOKEN),
        }
    }
}

impl From<u32> for CommandArg {
    fn from(cycle: u32) -> Self {
        CommandArg::Cycle(cycle)
    }
}

impl From<&str> for CommandArg {
    fn from(value: &str) -> Self {
        CommandArg::text(value)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arg)
    }
}
