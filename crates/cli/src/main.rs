//! Resilience CLI: offline tooling around the resilience driver.
//!
//! - `resilience plan`: print the exchange of a passing run for the configured plan
//! - `resilience replay <transcript>`: validate a recorded device transcript
//! - `resilience init-config [path]`: write the default config file
//!
//! Diagnostics go to stderr through `tracing` (`RUST_LOG` overrides the
//! default `info` level); results go to stdout.

mod commands;
mod format;
mod transcript;

use std::path::{Path, PathBuf};
use std::process;

use resilience_core::{ResilienceConfig, CONFIG_FILE_NAME};
use resilience_driver::{Driver, LoggingLink, NoopSleeper, Session};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_failure, format_plan, format_verdict, OutputMode};
use transcript::read_transcript_file;

fn main() {
    let matches = build_cli().get_matches();
    init_logging();

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let exit_code = match matches.subcommand() {
        Some(("init-config", sub)) => {
            let path = sub
                .get_one::<String>("path")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            run_init_config(&path, mode)
        }
        Some((name, sub)) => match load_config(matches.get_one::<String>("config")) {
            Ok(config) => match name {
                "plan" => run_plan(&config, mode),
                "replay" => match sub.get_one::<String>("transcript") {
                    Some(path) => run_replay(Path::new(path), &config, mode),
                    None => report(&format_error("missing transcript path", mode)),
                },
                other => report(&format_error(&format!("unknown command '{}'", other), mode)),
            },
            Err(e) => report(&format_error(&e, mode)),
        },
        None => 0,
    };
    process::exit(exit_code);
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config named by `--config`, else `./resilience.toml` if it
/// exists, else built-in defaults.
fn load_config(explicit: Option<&String>) -> Result<ResilienceConfig, String> {
    let path = match explicit {
        Some(p) => PathBuf::from(p),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if !local.exists() {
                debug!(target: "resilience::cli", "No config file, using defaults");
                return Ok(ResilienceConfig::default());
            }
            local
        }
    };
    debug!(target: "resilience::cli", path = %path.display(), "Loading config");
    ResilienceConfig::from_file(&path).map_err(|e| e.to_string())
}

fn run_plan(config: &ResilienceConfig, mode: OutputMode) -> i32 {
    match config.to_plan() {
        Ok(plan) => {
            println!("{}", format_plan(&plan, config, mode));
            0
        }
        Err(e) => report(&format_error(&e.to_string(), mode)),
    }
}

fn run_replay(path: &Path, config: &ResilienceConfig, mode: OutputMode) -> i32 {
    let events = match read_transcript_file(path) {
        Ok(events) => events,
        Err(e) => return report(&format_error(&e, mode)),
    };
    info!(
        target: "resilience::cli",
        path = %path.display(),
        events = events.len(),
        "Replaying transcript"
    );

    // Recorded timing already contains the real delays
    let driver = match Driver::from_config(config, LoggingLink::new(), NoopSleeper) {
        Ok(driver) => driver,
        Err(e) => return report(&format_error(&e.to_string(), mode)),
    };
    let mut session = Session::new(driver);
    match session.run(events) {
        Ok(verdict) => {
            println!("{}", format_verdict(&verdict, mode));
            0
        }
        Err(e) => {
            println!("{}", format_failure(&e, mode));
            1
        }
    }
}

fn run_init_config(path: &Path, mode: OutputMode) -> i32 {
    match ResilienceConfig::write_default_if_missing(path) {
        Ok(true) => {
            println!("Wrote {}", path.display());
            0
        }
        Ok(false) => report(&format_error(
            &format!("{} already exists, not overwriting", path.display()),
            mode,
        )),
        Err(e) => report(&format_error(&e.to_string(), mode)),
    }
}

fn report(message: &str) -> i32 {
    eprintln!("{}", message);
    1
}
