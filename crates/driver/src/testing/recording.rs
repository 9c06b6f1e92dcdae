//! Recording test doubles
//!
//! Both doubles are cheap cloneable handles over shared state, so a test can
//! keep one clone while the driver owns the other.

use crate::delay::Sleeper;
use crate::link::DeviceLink;
use parking_lot::Mutex;
use resilience_core::Command;
use std::sync::Arc;
use std::time::Duration;

/// One call made on a [`DeviceLink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// `send_command`
    Command(Command),
    /// `trigger_reset`
    Reset,
}

/// Link that records every action in order
#[derive(Debug, Clone, Default)]
pub struct RecordingLink {
    actions: Arc<Mutex<Vec<LinkAction>>>,
}

impl RecordingLink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All actions so far.
    pub fn actions(&self) -> Vec<LinkAction> {
        self.actions.lock().clone()
    }

    /// Commands only, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.actions
            .lock()
            .iter()
            .filter_map(|action| match action {
                LinkAction::Command(cmd) => Some(cmd.clone()),
                LinkAction::Reset => None,
            })
            .collect()
    }

    /// Number of resets triggered.
    pub fn resets(&self) -> usize {
        self.actions
            .lock()
            .iter()
            .filter(|action| matches!(action, LinkAction::Reset))
            .count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.actions.lock().clear();
    }
}

impl DeviceLink for RecordingLink {
    fn send_command(&mut self, command: Command) {
        self.actions.lock().push(LinkAction::Command(command));
    }

    fn trigger_reset(&mut self) {
        self.actions.lock().push(LinkAction::Reset);
    }
}

/// Sleeper that records requested durations and returns immediately
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    durations: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested duration, in order.
    pub fn durations(&self) -> Vec<Duration> {
        self.durations.lock().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.durations.lock().push(duration);
    }
}
