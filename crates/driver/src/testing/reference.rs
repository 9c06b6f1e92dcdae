//! Reference model of a compliant run
//!
//! Derives, independently of the driver's state machine, the event sequence
//! a well-behaved device produces for a plan and the link actions the host
//! must perform in response to each event.

use super::recording::LinkAction;
use resilience_core::{Command, Event, EventLabel, TestPlan};

/// One device event and the actions it must trigger
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    /// Event emitted by the device
    pub event: Event,
    /// Link actions the driver performs after validating it
    pub actions: Vec<LinkAction>,
    /// Whether a pre-reset delay precedes the reset in `actions`
    pub delayed: bool,
}

impl ScriptStep {
    fn new(label: EventLabel, actions: Vec<LinkAction>) -> Self {
        ScriptStep {
            event: Event::bare(label),
            actions,
            delayed: false,
        }
    }
}

/// Full compliant run for a plan
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceScript {
    steps: Vec<ScriptStep>,
}

impl ReferenceScript {
    /// Build the script for `plan`.
    pub fn for_plan(plan: &TestPlan) -> Self {
        let cmd = LinkAction::Command;
        let mut steps = Vec::new();
        let mut pending_start = EventLabel::Start;

        for target in plan.targets() {
            steps.push(ScriptStep::new(
                pending_start,
                vec![cmd(plan.format_command(*target))],
            ));
            let mut pending = EventLabel::FormatDone;

            for cycle in 0..plan.reset_count() {
                steps.push(ScriptStep::new(
                    pending,
                    vec![cmd(plan.init_command(*target))],
                ));

                let mut reset_actions = Vec::new();
                if plan.has_verify_phase() {
                    steps.push(ScriptStep::new(
                        EventLabel::InitDone,
                        vec![cmd(plan.verify_command(cycle))],
                    ));
                    pending = EventLabel::VerifyDone;
                } else {
                    pending = EventLabel::InitDone;
                }
                let delayed = plan.writes_on_cycle(cycle);
                if delayed {
                    reset_actions.push(cmd(plan.run_command(cycle)));
                }
                reset_actions.push(LinkAction::Reset);
                steps.push(ScriptStep {
                    delayed,
                    ..ScriptStep::new(pending, reset_actions)
                });

                steps.push(ScriptStep::new(
                    EventLabel::ResetComplete,
                    vec![cmd(Command::sync())],
                ));
                pending = EventLabel::Start;
            }
            pending_start = pending;
        }

        steps.push(ScriptStep::new(
            pending_start,
            vec![cmd(Command::exit_pass())],
        ));
        ReferenceScript { steps }
    }

    /// Steps in order.
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Compliant device events, in order.
    pub fn events(&self) -> Vec<Event> {
        self.steps.iter().map(|s| s.event.clone()).collect()
    }

    /// Expected link actions, in order.
    pub fn actions(&self) -> Vec<LinkAction> {
        self.steps
            .iter()
            .flat_map(|s| s.actions.iter().cloned())
            .collect()
    }

    /// Expected commands, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                LinkAction::Command(c) => Some(c),
                LinkAction::Reset => None,
            })
            .collect()
    }

    /// Number of pre-reset delays over the run.
    pub fn delays(&self) -> usize {
        self.steps.iter().filter(|s| s.delayed).count()
    }

    /// Number of resets over the run.
    pub fn resets(&self) -> usize {
        self.actions()
            .iter()
            .filter(|a| matches!(a, LinkAction::Reset))
            .count()
    }
}
