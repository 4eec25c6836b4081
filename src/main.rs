use colored::Colorize;
use harness_reporter::{cli, infra::logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(cli::run());
    // A stdin read parked on a blocking thread would otherwise keep the process
    // alive after `done` until the writer closes the pipe.
    runtime.shutdown_background();

    match result {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
