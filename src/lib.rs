// Library root
// -----------
// The binary (`main.rs`) only sets up logging and hands the arguments to
// `cli::run`; everything else lives here so it can be tested.
//
// Module responsibilities:
// - `config`: the per-user JSON configuration and its first-run flow.
// - `push`: resolving overrides, encoding the file and judging the answer.
// - `api`: the GitHub Contents API client.
// - `ui`: terminal prompts and the upload spinner.
// - `cli`: argument parsing and subcommand dispatch.
// - `error`: error types shared by the modules above.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod push;
pub mod ui;
