//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub use kvstore_resilience::testing::{LinkAction, RecordingLink, RecordingSleeper, ReferenceScript};
pub use kvstore_resilience::{
    BackendType, Command, CommandName, DelayParams, DeviceLink, Driver, DriverError, Event,
    EventLabel, NoopSleeper, Progress, ResetDelay, ResilienceConfig, RunStatus, Session,
    TestPlan, Verdict,
};

/// Idle window used by channel-fed sessions in tests.
pub const TEST_IDLE_TIMEOUT: Duration = Duration::from_millis(500);

// ============================================================================
// Simulated device
// ============================================================================

/// What the simulated device receives from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSignal {
    Command(Command),
    Reset,
}

/// Link that forwards everything to a simulated device thread.
pub struct ChannelLink {
    tx: Sender<DeviceSignal>,
}

impl DeviceLink for ChannelLink {
    fn send_command(&mut self, command: Command) {
        // Device thread already gone: nothing to deliver to
        let _ = self.tx.send(DeviceSignal::Command(command));
    }

    fn trigger_reset(&mut self) {
        let _ = self.tx.send(DeviceSignal::Reset);
    }
}

/// Misbehavior injected into the simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Well-behaved device
    None,
    /// Never emit the n-th (1-based) occurrence of `label`
    Drop { label: EventLabel, occurrence: usize },
    /// Emit `with` instead of the n-th (1-based) occurrence of `label`
    Substitute {
        label: EventLabel,
        occurrence: usize,
        with: EventLabel,
    },
}

/// Everything the simulated device saw.
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub signals: Vec<DeviceSignal>,
    pub exited_with: Option<String>,
}

impl DeviceLog {
    pub fn commands(&self) -> Vec<Command> {
        self.signals
            .iter()
            .filter_map(|s| match s {
                DeviceSignal::Command(c) => Some(c.clone()),
                DeviceSignal::Reset => None,
            })
            .collect()
    }

    pub fn resets(&self) -> usize {
        self.signals
            .iter()
            .filter(|s| matches!(s, DeviceSignal::Reset))
            .count()
    }
}

struct Emitter {
    tx: Sender<Event>,
    fault: Fault,
    seen: HashMap<EventLabel, usize>,
    clock: f64,
}

impl Emitter {
    fn emit(&mut self, label: EventLabel) {
        let count = self.seen.entry(label).or_insert(0);
        *count += 1;
        let occurrence = *count;
        let label = match self.fault {
            Fault::Drop {
                label: l,
                occurrence: n,
            } if l == label && n == occurrence => return,
            Fault::Substitute {
                label: l,
                occurrence: n,
                with,
            } if l == label && n == occurrence => with,
            _ => label,
        };
        self.clock += 0.01;
        let _ = self.tx.send(Event::new(label, "1", self.clock));
    }
}

/// Spawn a device that answers each command the way the firmware test
/// application does.
///
/// Returns the host-side link, the event stream, and a handle resolving to the
/// device log once the link is dropped or `exit` is received.
pub fn spawn_device(fault: Fault) -> (ChannelLink, Receiver<Event>, JoinHandle<DeviceLog>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<DeviceSignal>();
    let (ev_tx, ev_rx) = mpsc::channel::<Event>();

    let handle = thread::spawn(move || {
        let mut log = DeviceLog::default();
        let mut emitter = Emitter {
            tx: ev_tx,
            fault,
            seen: HashMap::new(),
            clock: 0.0,
        };
        emitter.emit(EventLabel::Start);

        for signal in cmd_rx {
            log.signals.push(signal.clone());
            match signal {
                DeviceSignal::Reset => emitter.emit(EventLabel::ResetComplete),
                DeviceSignal::Command(cmd) => match cmd.name {
                    CommandName::Format => emitter.emit(EventLabel::FormatDone),
                    CommandName::Init => emitter.emit(EventLabel::InitDone),
                    CommandName::Verify => emitter.emit(EventLabel::VerifyDone),
                    CommandName::Run => {}
                    CommandName::Sync => emitter.emit(EventLabel::Start),
                    CommandName::Exit => {
                        log.exited_with = Some(cmd.arg.to_string());
                        break;
                    }
                },
            }
        }
        log
    });

    (ChannelLink { tx: cmd_tx }, ev_rx, handle)
}

// ============================================================================
// Driver helpers
// ============================================================================

/// Delay source that never waits.
pub fn instant_delay() -> ResetDelay {
    ResetDelay::seeded(DelayParams::new(0.0, 0.0), 0).expect("valid delay params")
}

/// Driver over a recording link, armed and ready.
pub fn recording_driver(plan: TestPlan) -> (Driver<RecordingLink, RecordingSleeper>, RecordingLink, RecordingSleeper) {
    let link = RecordingLink::new();
    let sleeper = RecordingSleeper::new();
    let delay = ResetDelay::seeded(DelayParams::default(), 77).expect("valid delay params");
    let mut driver =
        Driver::new(plan, link.clone(), sleeper.clone(), delay).expect("valid test plan");
    driver.start();
    (driver, link, sleeper)
}

/// Run `plan` against a simulated device with the given fault.
pub fn run_against_device(plan: TestPlan, fault: Fault) -> (Result<Verdict, DriverError>, DeviceLog) {
    let (link, events, device) = spawn_device(fault);
    let driver = Driver::new(plan, link, NoopSleeper, instant_delay()).expect("valid test plan");
    let mut session = Session::new(driver);
    let result = session.run_channel(&events, TEST_IDLE_TIMEOUT);
    // Dropping the session drops the link, which lets a stalled device exit
    drop(session);
    let log = device.join().expect("device thread panicked");
    (result, log)
}
