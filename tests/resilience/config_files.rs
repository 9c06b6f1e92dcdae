//! Configuration-driven runs
//!
//! Plans and delays built from `resilience.toml` files.

use crate::common::*;
use kvstore_resilience::{PlanTarget, CONFIG_FILE_NAME};
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn default_config_file_runs_kvstore_plan() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    ResilienceConfig::write_default_if_missing(&path).unwrap();

    let config = ResilienceConfig::from_file(&path).unwrap();
    let plan = config.to_plan().unwrap();
    assert_eq!(plan, TestPlan::kvstore());
}

#[test]
fn config_subset_runs_against_device() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
profile = "kvstore"
reset_count = 2
backends = ["File-System"]
delay_base_secs = 0.0
delay_jitter_secs = 0.0
"#,
    );
    let config = ResilienceConfig::from_file(&path).unwrap();
    assert_eq!(
        config.to_plan().unwrap().targets(),
        &[PlanTarget::Backend(BackendType::FileSystem)]
    );

    let (link, events, device) = spawn_device(Fault::None);
    let driver = Driver::from_config(&config, link, NoopSleeper).unwrap();
    let verdict = Session::new(driver)
        .run_channel(&events, TEST_IDLE_TIMEOUT)
        .unwrap();
    let log = device.join().unwrap();

    assert_eq!(verdict.resets, 2);
    assert_eq!(log.commands()[0], Command::format(BackendType::FileSystem));
}

#[test]
fn seeded_config_reproduces_delays() {
    let config = ResilienceConfig::from_toml_str("seed = 1234\nreset_count = 4").unwrap();
    let plan = config.to_plan().unwrap();
    let events = ReferenceScript::for_plan(&plan).events();

    let run = || {
        let sleeper = RecordingSleeper::new();
        let driver = Driver::from_config(&config, RecordingLink::new(), sleeper.clone()).unwrap();
        Session::new(driver).run(events.clone()).unwrap();
        sleeper.durations()
    };

    let first = run();
    let second = run();
    assert_eq!(first.len(), 9);
    assert_eq!(first, second);
    let params = config.delay_params();
    assert!(first.iter().all(|d| *d >= params.min() && *d < params.max()));
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "profile = \"kvstore\"\nbackends = [\"NVMe\"]\n");
    let err = ResilienceConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("NVMe"));
}
