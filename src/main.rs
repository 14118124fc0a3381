//! Crayola - command-line playback for animated pixel-sprite scenes

use std::process::ExitCode;

use crayola::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run()
}
