//! lend - in-memory lending desk for small libraries

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = lendbook::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
