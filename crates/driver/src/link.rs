//! Device-side collaborators
//!
//! The host test framework owns the serial channel and the reset line; the
//! driver only calls into them through [`DeviceLink`].

use resilience_core::Command;
use tracing::info;

/// Outbound side of the device boundary
///
/// Both calls are fire-and-forget: the only acknowledgment is the event
/// stream that follows.
pub trait DeviceLink {
    /// Transmit a named command with its argument.
    fn send_command(&mut self, command: Command);

    /// Hard-reset the device under test.
    ///
    /// The device is expected to reboot, report `reset_complete`, and emit
    /// `start` once it has been resynchronized.
    fn trigger_reset(&mut self);
}

impl<L: DeviceLink + ?Sized> DeviceLink for &mut L {
    fn send_command(&mut self, command: Command) {
        (**self).send_command(command)
    }

    fn trigger_reset(&mut self) {
        (**self).trigger_reset()
    }
}

impl<L: DeviceLink + ?Sized> DeviceLink for Box<L> {
    fn send_command(&mut self, command: Command) {
        (**self).send_command(command)
    }

    fn trigger_reset(&mut self) {
        (**self).trigger_reset()
    }
}

/// Link with no device behind it; logs what would have been sent.
///
/// Used for offline replays of recorded transcripts.
#[derive(Debug, Default)]
pub struct LoggingLink {
    commands_sent: usize,
    resets: usize,
}

impl LoggingLink {
    /// Create a new logging link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands logged so far.
    pub fn commands_sent(&self) -> usize {
        self.commands_sent
    }

    /// Number of resets logged so far.
    pub fn resets(&self) -> usize {
        self.resets
    }
}

impl DeviceLink for LoggingLink {
    fn send_command(&mut self, command: Command) {
        self.commands_sent += 1;
        info!(target: "resilience::link", command = %command, "send");
    }

    fn trigger_reset(&mut self) {
        self.resets += 1;
        info!(target: "resilience::link", "reset");
    }
}
