use std::process::ExitCode;

fn main() -> ExitCode {
    fleetbot_cli::run()
}
