//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("resilience")
        .about("Host-side driver for KV storage reset-resilience tests")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Config file (default: ./resilience.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_plan())
        .subcommand(build_replay())
        .subcommand(build_init_config())
}

fn build_plan() -> Command {
    Command::new("plan").about("Print the event/command exchange of a passing run")
}

fn build_replay() -> Command {
    Command::new("replay")
        .about("Replay a recorded JSON-lines event transcript against the driver")
        .arg(
            Arg::new("transcript")
                .required(true)
                .value_name("TRANSCRIPT")
                .help("Path to the transcript, one event object per line"),
        )
}

fn build_init_config() -> Command {
    Command::new("init-config")
        .about("Write the default commented config file")
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .default_value(resilience_core::CONFIG_FILE_NAME)
                .help("Where to write the config"),
        )
}
