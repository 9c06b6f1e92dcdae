//! Healthy runs
//!
//! A well-behaved device must take every plan to `exit("pass")`.

use crate::common::*;

#[test]
fn kvstore_plan_passes_against_device() {
    let plan = TestPlan::kvstore();
    let script = ReferenceScript::for_plan(&plan);

    let (result, log) = run_against_device(plan, Fault::None);
    let verdict = result.unwrap();

    assert_eq!(verdict.resets, 18);
    assert_eq!(verdict.targets_completed, 3);
    assert_eq!(log.commands(), script.commands());
    assert_eq!(log.resets(), 18);
    assert_eq!(log.exited_with.as_deref(), Some("pass"));
}

#[test]
fn storagelite_plan_passes_against_device() {
    let (result, log) = run_against_device(TestPlan::storagelite(), Fault::None);
    let verdict = result.unwrap();

    assert_eq!(verdict.resets, 10);
    assert_eq!(log.resets(), 10);
    let runs = log
        .commands()
        .iter()
        .filter(|c| c.name == CommandName::Run)
        .count();
    assert_eq!(runs, 10);
}

#[test]
fn every_reset_is_followed_by_sync_token() {
    let (result, log) = run_against_device(TestPlan::kvstore().with_reset_count(3), Fault::None);
    result.unwrap();

    for (i, signal) in log.signals.iter().enumerate() {
        if *signal == DeviceSignal::Reset {
            assert_eq!(
                log.signals[i + 1],
                DeviceSignal::Command(Command::sync()),
                "reset at {} not followed by __sync",
                i
            );
        }
    }
}

#[test]
fn verify_indices_restart_per_backend() {
    let (result, log) = run_against_device(TestPlan::kvstore(), Fault::None);
    result.unwrap();

    let verifies: Vec<Command> = log
        .commands()
        .into_iter()
        .filter(|c| c.name == CommandName::Verify)
        .collect();
    let per_backend: Vec<Command> = (0..6).map(Command::verify).collect();
    assert_eq!(verifies.len(), 18);
    for chunk in verifies.chunks(6) {
        assert_eq!(chunk, per_backend.as_slice());
    }
}

#[test]
fn iterator_session_reports_trailing_events() {
    let plan = TestPlan::kvstore().with_reset_count(1);
    let mut events = ReferenceScript::for_plan(&plan).events();
    events.push(Event::bare(EventLabel::Start));

    let (driver, link, _) = recording_driver(plan);
    let verdict = Session::new(driver).run(events).unwrap();

    assert_eq!(verdict.events_ignored, 1);
    assert_eq!(link.commands().last(), Some(&Command::exit_pass()));
}

#[test]
fn facade_error_module_is_the_driver_one() {
    let violation = kvstore_resilience::ProtocolViolation {
        expected: EventLabel::InitDone,
        received: EventLabel::Start,
        target: "Internal".to_string(),
        cycle: 0,
    };
    let err: kvstore_resilience::error::DriverError = violation.clone().into();
    assert_eq!(err.violation(), Some(&violation));
}
