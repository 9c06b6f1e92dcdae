//! Resilience driver state machine
//!
//! The driver holds a single cursor into the test plan: which target is being
//! cycled, which reset cycle it is in, and which event must arrive next.
//! Each delivered event is compared against the cursor; a match advances it
//! and issues the next command(s), a mismatch fails the run permanently.
//!
//! # Choreography (per target)
//!
//! ```text
//! start ──> format(t) ──> format_done ──> init(t) ──> init_done
//!    ┌──────────────────────────────────────────────────────┘
//!    └─> [verify(c) ──> verify_done] ──> [run(..), delay] ──> reset
//!        ──> reset_complete ──> __sync(token) ──> start
//!        ──> next cycle: init(t) | next target: format(t') | exit(pass)
//! ```
//!
//! Bracketed steps depend on the plan profile and the cycle index.

use crate::delay::{ResetDelay, Sleeper};
use crate::error::{DriverError, Result};
use crate::link::DeviceLink;
use resilience_core::{
    Command, Event, EventLabel, PlanTarget, ProtocolViolation, ResilienceConfig, TestPlan,
};
use tracing::{debug, info, trace, warn};

/// What the cursor is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awaiting {
    /// First `start` after the driver was armed
    Boot,
    /// `format_done` for the current target
    FormatDone,
    /// `init_done` for the current cycle
    InitDone,
    /// `verify_done` for the current cycle
    VerifyDone,
    /// `reset_complete` after the forced reset
    ResetComplete,
    /// `start` after the post-reset resynchronization
    Restart,
}

impl Awaiting {
    /// Event label that satisfies this wait.
    pub fn label(&self) -> EventLabel {
        match self {
            Awaiting::Boot | Awaiting::Restart => EventLabel::Start,
            Awaiting::FormatDone => EventLabel::FormatDone,
            Awaiting::InitDone => EventLabel::InitDone,
            Awaiting::VerifyDone => EventLabel::VerifyDone,
            Awaiting::ResetComplete => EventLabel::ResetComplete,
        }
    }
}

/// Position in the test plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Index into the plan's targets
    pub target: usize,
    /// Reset cycle within the current target
    pub cycle: u32,
    /// Next expected event
    pub awaiting: Awaiting,
}

impl Cursor {
    fn initial() -> Self {
        Cursor {
            target: 0,
            cycle: 0,
            awaiting: Awaiting::Boot,
        }
    }

    fn awaiting(self, awaiting: Awaiting) -> Self {
        Cursor { awaiting, ..self }
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Armed(Cursor),
    Done,
    Failed(ProtocolViolation),
}

/// Coarse run status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Not started yet
    Idle,
    /// Waiting for device events
    Running,
    /// `exit("pass")` was sent
    Passed,
    /// A protocol violation halted the run
    Failed,
}

/// Result of a successfully validated event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Cursor advanced; more events are expected
    Continue,
    /// This event completed the plan and `exit("pass")` was sent
    Passed,
    /// The run had already passed; the event was ignored
    Concluded,
}

/// Drives one resilience run against a device
///
/// Event handling is synchronous and not reentrant: the caller must deliver
/// one event at a time. The only blocking call is the pre-reset delay.
pub struct Driver<L, S> {
    plan: TestPlan,
    link: L,
    sleeper: S,
    delay: ResetDelay,
    state: State,
    resets: u64,
}

impl<L: DeviceLink, S: Sleeper> Driver<L, S> {
    /// Create a driver for a validated plan.
    pub fn new(plan: TestPlan, link: L, sleeper: S, delay: ResetDelay) -> Result<Self> {
        plan.validate()?;
        Ok(Driver {
            plan,
            link,
            sleeper,
            delay,
            state: State::Idle,
            resets: 0,
        })
    }

    /// Create a driver from a loaded configuration.
    ///
    /// Delays are reproducible when the config carries a seed.
    pub fn from_config(config: &ResilienceConfig, link: L, sleeper: S) -> Result<Self> {
        let plan = config.to_plan()?;
        let params = config.delay_params();
        let delay = match config.seed {
            Some(seed) => ResetDelay::seeded(params, seed)?,
            None => ResetDelay::new(params)?,
        };
        Self::new(plan, link, sleeper, delay)
    }

    /// Arm the driver to expect the first `start`.
    ///
    /// No-op while a run is in progress. A finished or failed driver is
    /// re-armed for a fresh run.
    pub fn start(&mut self) {
        if let State::Armed(_) = self.state {
            debug!(target: "resilience::driver", "Driver already armed");
            return;
        }
        self.restart();
    }

    /// Arm the driver for a fresh run, discarding any run in progress.
    pub fn restart(&mut self) {
        info!(
            target: "resilience::driver",
            profile = %self.plan.profile(),
            targets = self.plan.targets().len(),
            reset_count = self.plan.reset_count(),
            "Driver armed"
        );
        self.state = State::Armed(Cursor::initial());
        self.resets = 0;
    }

    /// Deliver the next device event.
    ///
    /// # Errors
    ///
    /// - [`DriverError::NotArmed`] before [`start`](Self::start)
    /// - [`DriverError::ProtocolViolation`] when the label does not match the
    ///   cursor, and for every event after that
    pub fn on_event(&mut self, event: &Event) -> Result<Progress> {
        trace!(
            target: "resilience::driver",
            label = %event.label,
            payload = %event.payload,
            timestamp = event.timestamp,
            "Event received"
        );

        let cursor = match &self.state {
            State::Idle => return Err(DriverError::NotArmed),
            State::Done => {
                debug!(target: "resilience::driver", label = %event.label, "Event after completion ignored");
                return Ok(Progress::Concluded);
            }
            State::Failed(violation) => return Err(violation.clone().into()),
            State::Armed(cursor) => *cursor,
        };

        let expected = cursor.awaiting.label();
        if event.label != expected {
            let violation = ProtocolViolation {
                expected,
                received: event.label,
                target: self.target_at(cursor.target).to_string(),
                cycle: cursor.cycle,
            };
            warn!(
                target: "resilience::driver",
                expected = %expected,
                received = %event.label,
                target_name = %violation.target,
                cycle = cursor.cycle,
                "Protocol violation, halting run"
            );
            self.state = State::Failed(violation.clone());
            return Err(violation.into());
        }

        Ok(self.advance(cursor))
    }

    fn advance(&mut self, cursor: Cursor) -> Progress {
        let target = self.target_at(cursor.target);
        let next = match cursor.awaiting {
            Awaiting::Boot => {
                info!(target: "resilience::driver", target_name = %target, "Formatting target");
                self.send(self.plan.format_command(target));
                cursor.awaiting(Awaiting::FormatDone)
            }
            Awaiting::FormatDone => {
                self.send(self.plan.init_command(target));
                Cursor {
                    cycle: 0,
                    ..cursor.awaiting(Awaiting::InitDone)
                }
            }
            Awaiting::InitDone if self.plan.has_verify_phase() => {
                self.send(self.plan.verify_command(cursor.cycle));
                cursor.awaiting(Awaiting::VerifyDone)
            }
            Awaiting::InitDone | Awaiting::VerifyDone => {
                self.write_and_reset(cursor.cycle);
                cursor.awaiting(Awaiting::ResetComplete)
            }
            Awaiting::ResetComplete => {
                self.send(Command::sync());
                cursor.awaiting(Awaiting::Restart)
            }
            Awaiting::Restart => {
                if cursor.cycle + 1 < self.plan.reset_count() {
                    self.send(self.plan.init_command(target));
                    Cursor {
                        cycle: cursor.cycle + 1,
                        ..cursor.awaiting(Awaiting::InitDone)
                    }
                } else if let Some(next_target) = self.plan.target(cursor.target + 1) {
                    info!(target: "resilience::driver", target_name = %next_target, "Formatting target");
                    self.send(self.plan.format_command(next_target));
                    Cursor {
                        target: cursor.target + 1,
                        cycle: 0,
                        awaiting: Awaiting::FormatDone,
                    }
                } else {
                    self.send(Command::exit_pass());
                    info!(
                        target: "resilience::driver",
                        resets = self.resets,
                        "All targets survived every reset"
                    );
                    self.state = State::Done;
                    return Progress::Passed;
                }
            }
        };
        self.state = State::Armed(next);
        Progress::Continue
    }

    /// Optional write phase, then the unconditional reset.
    fn write_and_reset(&mut self, cycle: u32) {
        if self.plan.writes_on_cycle(cycle) {
            self.send(self.plan.run_command(cycle));
            let pause = self.delay.sample();
            debug!(target: "resilience::driver", ?pause, "Waiting before reset");
            self.sleeper.sleep(pause);
        }
        debug!(target: "resilience::driver", cycle, "Triggering reset");
        self.link.trigger_reset();
        self.resets += 1;
    }

    fn send(&mut self, command: Command) {
        debug!(target: "resilience::driver", command = %command, "Sending command");
        self.link.send_command(command);
    }
}

impl<L, S> Driver<L, S> {
    // The cursor never points past the plan: targets are only advanced after
    // checking `TestPlan::target`.
    fn target_at(&self, index: usize) -> PlanTarget {
        self.plan.targets()[index]
    }

    /// Coarse status of the run.
    pub fn status(&self) -> RunStatus {
        match self.state {
            State::Idle => RunStatus::Idle,
            State::Armed(_) => RunStatus::Running,
            State::Done => RunStatus::Passed,
            State::Failed(_) => RunStatus::Failed,
        }
    }

    /// Current cursor, while running.
    pub fn cursor(&self) -> Option<Cursor> {
        match self.state {
            State::Armed(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Label the driver is waiting for, while running.
    pub fn expected_label(&self) -> Option<EventLabel> {
        self.cursor().map(|c| c.awaiting.label())
    }

    /// Target currently being cycled, while running.
    pub fn current_target(&self) -> Option<PlanTarget> {
        self.cursor().map(|c| self.target_at(c.target))
    }

    /// The violation that halted the run, if any.
    pub fn violation(&self) -> Option<&ProtocolViolation> {
        match &self.state {
            State::Failed(violation) => Some(violation),
            _ => None,
        }
    }

    /// Resets triggered since the driver was armed.
    pub fn resets_triggered(&self) -> u64 {
        self.resets
    }

    /// The plan being executed.
    pub fn plan(&self) -> &TestPlan {
        &self.plan
    }

    /// The device link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutable access to the device link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Consume the driver, returning the device link.
    pub fn into_link(self) -> L {
        self.link
    }
}
