//! Faulty devices
//!
//! Any missing or out-of-order event must fail the run without `exit("pass")`
//! reaching the device.

use crate::common::*;

#[test]
fn missing_verify_done_times_out() {
    let fault = Fault::Drop {
        label: EventLabel::VerifyDone,
        occurrence: 4,
    };
    let (result, log) = run_against_device(TestPlan::kvstore(), fault);

    match result {
        Err(DriverError::Timeout { expected, .. }) => {
            assert_eq!(expected, EventLabel::VerifyDone)
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(log.exited_with.is_none());
    // Cycle 3 of the first backend never reached its write
    assert_eq!(log.resets(), 3);
}

#[test]
fn lost_reset_complete_times_out() {
    let fault = Fault::Drop {
        label: EventLabel::ResetComplete,
        occurrence: 1,
    };
    let (result, log) = run_against_device(TestPlan::storagelite(), fault);

    assert!(matches!(
        result,
        Err(DriverError::Timeout {
            expected: EventLabel::ResetComplete,
            ..
        })
    ));
    assert!(!log.commands().contains(&Command::sync()));
}

#[test]
fn device_skipping_verify_fails_immediately() {
    // Device answers the second verify with a reset_complete
    let fault = Fault::Substitute {
        label: EventLabel::VerifyDone,
        occurrence: 2,
        with: EventLabel::ResetComplete,
    };
    let (result, log) = run_against_device(TestPlan::kvstore(), fault);

    let err = result.unwrap_err();
    let violation = err.violation().expect("protocol violation");
    assert_eq!(violation.expected, EventLabel::VerifyDone);
    assert_eq!(violation.received, EventLabel::ResetComplete);
    assert_eq!(violation.target, "Internal");
    assert_eq!(violation.cycle, 1);
    assert!(log.exited_with.is_none());
}

#[test]
fn unexpected_reboot_fails() {
    // Device reboots on its own while it should be formatting the second backend
    let fault = Fault::Substitute {
        label: EventLabel::FormatDone,
        occurrence: 2,
        with: EventLabel::Start,
    };
    let (result, _) = run_against_device(TestPlan::kvstore().with_reset_count(2), fault);

    let err = result.unwrap_err();
    let violation = err.violation().expect("protocol violation");
    assert_eq!(violation.expected, EventLabel::FormatDone);
    assert_eq!(violation.target, "TDB-External");
}

#[test]
fn failure_leaves_driver_inert() {
    let (mut driver, link, _) = recording_driver(TestPlan::kvstore());
    for label in [
        EventLabel::Start,
        EventLabel::FormatDone,
        EventLabel::InitDone,
        EventLabel::ResetComplete,
    ] {
        let _ = driver.on_event(&Event::bare(label));
    }
    assert_eq!(driver.status(), RunStatus::Failed);
    let sent = link.actions();

    for event in ReferenceScript::for_plan(&TestPlan::kvstore()).events() {
        assert!(matches!(
            driver.on_event(&event),
            Err(DriverError::ProtocolViolation(_))
        ));
    }
    assert_eq!(link.actions(), sent);
}

#[test]
fn stream_ending_early_fails() {
    let plan = TestPlan::kvstore();
    let events = ReferenceScript::for_plan(&plan).events();
    let cut = events.len() - 1;

    let (driver, link, _) = recording_driver(plan);
    let err = Session::new(driver)
        .run(events.into_iter().take(cut))
        .unwrap_err();

    assert!(matches!(
        err,
        DriverError::StreamEnded {
            expected: EventLabel::Start
        }
    ));
    assert!(!link.commands().contains(&Command::exit_pass()));
}
