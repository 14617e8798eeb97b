//! buildgraph - component package graphs for build generators

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = buildgraph::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
