pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "fleetbot",
    about = "Fleetbot operator CLI",
    long_about = "Inspect fleetbot configuration, check catalog readiness, and run chat actions locally.",
    after_help = "Examples:\n  fleetbot doctor --json\n  fleetbot config\n  fleetbot ask action_filter_by_specs show me an automatic"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and check that the vehicle catalog answers")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run one chat action against the configured catalog and print its reply")]
    Ask {
        #[arg(help = "Action name, e.g. action_recommend_by_feature")]
        action: String,
        #[arg(required = true, num_args = 1.., help = "User message passed to the action")]
        utterance: Vec<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
        Command::Ask { action, utterance } => commands::ask::run(&action, &utterance.join(" ")),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
