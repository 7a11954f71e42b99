use std::process::ExitCode;

fn main() -> ExitCode {
    match staffd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed when bootstrap itself failed.
            eprintln!("staffd: {error}");
            ExitCode::FAILURE
        }
    }
}
