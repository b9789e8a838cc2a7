// Entrypoint for the CLI application.
// - Keeps `main` small: set up diagnostics, run the command, map the
//   outcome to an exit code.
// - Diagnostics go to stderr and are controlled with `RUST_LOG`.

use blog_tool::cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match cli::run(std::env::args().collect()) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
