//! Agenda - personal task planner for the terminal

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = agenda_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
