//! Event pump
//!
//! Feeds device events into a [`Driver`] and turns the end of the event
//! source into an outcome: the run passes only if `exit("pass")` was sent.
//! Running out of events, or waiting too long for one, is a failure.

use crate::delay::Sleeper;
use crate::driver::{Driver, Progress, RunStatus};
use crate::error::{DriverError, Result};
use crate::link::DeviceLink;
use resilience_core::{Event, EventLabel};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{info, warn};

/// Summary of a passed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Events handed to the driver, including ignored ones
    pub events_delivered: usize,
    /// Events that arrived after the run had already passed
    pub events_ignored: usize,
    /// Forced resets over the whole run
    pub resets: u64,
    /// Targets that completed every reset cycle
    pub targets_completed: usize,
}

/// Owns a driver for the duration of one run
pub struct Session<L, S> {
    driver: Driver<L, S>,
    delivered: usize,
    ignored: usize,
}

impl<L: DeviceLink, S: Sleeper> Session<L, S> {
    /// Wrap a driver.
    pub fn new(driver: Driver<L, S>) -> Self {
        Session {
            driver,
            delivered: 0,
            ignored: 0,
        }
    }

    /// Run the plan against a finite event sequence.
    ///
    /// Every event is delivered, including those after the run passed (they
    /// are no-ops). Stops at the first protocol violation.
    pub fn run<I>(&mut self, events: I) -> Result<Verdict>
    where
        I: IntoIterator<Item = Event>,
    {
        self.begin();
        for event in events {
            self.deliver(&event)?;
        }
        self.conclude()
    }

    /// Run the plan against events arriving on a channel.
    ///
    /// Returns as soon as the run passes, without draining the channel.
    ///
    /// # Errors
    ///
    /// - [`DriverError::Timeout`] when no event arrives within `idle_timeout`
    /// - [`DriverError::StreamEnded`] when every sender hung up early
    /// - [`DriverError::ProtocolViolation`] on the first out-of-order event
    pub fn run_channel(&mut self, events: &Receiver<Event>, idle_timeout: Duration) -> Result<Verdict> {
        self.begin();
        while self.driver.status() == RunStatus::Running {
            match events.recv_timeout(idle_timeout) {
                Ok(event) => {
                    self.deliver(&event)?;
                }
                Err(RecvTimeoutError::Timeout) => {
                    let expected = self.expected();
                    warn!(
                        target: "resilience::session",
                        expected = %expected,
                        waited = ?idle_timeout,
                        "Timed out waiting for device"
                    );
                    return Err(DriverError::Timeout {
                        expected,
                        waited: idle_timeout,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.conclude()
    }

    fn begin(&mut self) {
        self.delivered = 0;
        self.ignored = 0;
        self.driver.restart();
    }

    fn deliver(&mut self, event: &Event) -> Result<()> {
        self.delivered += 1;
        if self.driver.on_event(event)? == Progress::Concluded {
            self.ignored += 1;
        }
        Ok(())
    }

    fn conclude(&self) -> Result<Verdict> {
        if self.driver.status() != RunStatus::Passed {
            let expected = self.expected();
            warn!(
                target: "resilience::session",
                expected = %expected,
                delivered = self.delivered,
                "Event stream ended before the plan completed"
            );
            return Err(DriverError::StreamEnded { expected });
        }
        let verdict = Verdict {
            events_delivered: self.delivered,
            events_ignored: self.ignored,
            resets: self.driver.resets_triggered(),
            targets_completed: self.driver.plan().targets().len(),
        };
        info!(
            target: "resilience::session",
            events = verdict.events_delivered,
            resets = verdict.resets,
            "Resilience run passed"
        );
        Ok(verdict)
    }

    fn expected(&self) -> EventLabel {
        self.driver.expected_label().unwrap_or(EventLabel::Start)
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &Driver<L, S> {
        &self.driver
    }

    /// Consume the session, returning the driver.
    pub fn into_driver(self) -> Driver<L, S> {
        self.driver
    }
}
