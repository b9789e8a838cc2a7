// Command line surface: clap definitions, Go `flag` style argument
// normalization and the dispatch from a parsed command to the config
// store or the push command.

use crate::api::{ContentsApi, GithubClient};
use crate::config::ConfigStore;
use crate::push::{self, PushArgs};
use crate::ui::{Prompter, TerminalPrompter};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "blog-tool",
    version,
    about = "Upload a file to a GitHub repository",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show, recreate or delete the stored configuration
    Config(ConfigArgs),
    /// Upload a file through the GitHub Contents API
    Push(PushFlags),
    /// Print usage for every subcommand
    Help,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Show current configs
    #[arg(long)]
    pub show: bool,
    /// `new` recreates the config interactively, `delete` removes it
    #[arg(value_enum)]
    pub action: Option<ConfigAction>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    New,
    Delete,
}

#[derive(Args, Debug)]
pub struct PushFlags {
    /// Use specified repo
    #[arg(short = 'r', value_name = "REPO")]
    pub repo: Option<String>,
    /// Use specified username
    #[arg(short = 'u', value_name = "USER")]
    pub username: Option<String>,
    /// Use specified token
    #[arg(short = 't', value_name = "TOKEN")]
    pub token: Option<String>,
    /// Use specified path
    #[arg(long = "path", value_name = "PATH")]
    pub path: Option<String>,
    /// Use specified branch
    #[arg(short = 'b', value_name = "BRANCH")]
    pub branch: Option<String>,
    /// Use specified sha
    #[arg(long = "sha", value_name = "SHA")]
    pub sha: Option<String>,
    /// Use specified message
    #[arg(short = 'm', value_name = "MESSAGE")]
    pub message: Option<String>,
    /// File to upload
    pub filename: PathBuf,
}

impl From<PushFlags> for PushArgs {
    fn from(flags: PushFlags) -> Self {
        PushArgs {
            repository: flags.repo,
            username: flags.username,
            token: flags.token,
            remote_path: flags.path,
            branch: flags.branch,
            sha: flags.sha,
            message: flags.message,
            file: flags.filename,
        }
    }
}

/// Process outcome; only two exit codes exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

const LONG_FLAGS: [&str; 4] = ["path", "sha", "show", "help"];
const VALUE_FLAGS: [&str; 7] = ["r", "u", "t", "b", "m", "path", "sha"];

/// Rewrite Go style flags into what clap expects: `-path x` becomes
/// `--path x` and `-r=x` becomes `-r x`. Values and positionals are left
/// alone, as is everything after `--`.
pub fn normalize_args<I>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut expect_value = false;
    let mut passthrough = false;

    for (i, arg) in argv.into_iter().enumerate() {
        if i == 0 || passthrough || expect_value || arg == "-" || !arg.starts_with('-') {
            expect_value = false;
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let flag = arg.trim_start_matches('-');
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        if LONG_FLAGS.contains(&name) {
            out.push(match value {
                Some(value) => format!("--{name}={value}"),
                None => format!("--{name}"),
            });
        } else if name.chars().count() == 1 {
            out.push(format!("-{name}"));
            if let Some(value) = value {
                out.push(value.to_string());
            }
        } else {
            // Unknown; let clap report it.
            out.push(arg);
            continue;
        }
        expect_value = value.is_none() && VALUE_FLAGS.contains(&name);
    }
    out
}

/// Print the help of the named subcommands.
pub fn print_usage(names: &[&str]) -> Result<()> {
    let mut cmd = Cli::command();
    cmd.build();
    for name in names {
        if let Some(sub) = cmd.find_subcommand_mut(name) {
            sub.print_help().context("Failed to print usage")?;
            println!();
        }
    }
    Ok(())
}

/// Entry point used by `main`: parse `argv` and run the command against the
/// user's real config file, terminal and GitHub.
pub fn run(argv: Vec<String>) -> Result<Outcome> {
    if let Some(sub) = argv.get(1).map(String::as_str) {
        if matches!(sub, "config" | "push") && argv.len() < 3 {
            println!("insufficient parameters supplied.");
            print_usage(&[sub])?;
            return Ok(Outcome::Failure);
        }
    }

    let cli = match Cli::try_parse_from(normalize_args(argv)) {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too and are not failures.
            let outcome = if err.use_stderr() {
                Outcome::Failure
            } else {
                Outcome::Success
            };
            err.print().context("Failed to print usage")?;
            return Ok(outcome);
        }
    };

    let store = ConfigStore::open_default();
    let mut prompter = TerminalPrompter;
    execute(cli.command, &store, &mut prompter, GithubClient::from_env)
}

/// Run a parsed command. `connect` is only called by `push`.
pub fn execute<A, F>(
    command: Option<Commands>,
    store: &ConfigStore,
    prompter: &mut dyn Prompter,
    connect: F,
) -> Result<Outcome>
where
    A: ContentsApi,
    F: FnOnce() -> Result<A>,
{
    match command {
        None => {
            println!("{}", store.show(prompter)?);
            print_usage(&["push", "config"])?;
            Ok(Outcome::Success)
        }
        Some(Commands::Help) => {
            print_usage(&["push", "config"])?;
            Ok(Outcome::Success)
        }
        Some(Commands::Config(args)) => run_config(args, store, prompter),
        Some(Commands::Push(flags)) => {
            let config = store.load(prompter)?;
            let api = connect()?;
            let args = PushArgs::from(flags);
            debug!(file = %args.file.display(), "pushing");
            match push::run(&args, &config, &api) {
                Ok(()) => {
                    println!("success");
                    Ok(Outcome::Success)
                }
                Err(err) => {
                    println!("{err}");
                    Ok(Outcome::Failure)
                }
            }
        }
    }
}

fn run_config(args: ConfigArgs, store: &ConfigStore, prompter: &mut dyn Prompter) -> Result<Outcome> {
    if args.show {
        println!("{}", store.show(prompter)?);
        return Ok(Outcome::Success);
    }
    match args.action {
        Some(ConfigAction::New) => {
            store.reset(true, prompter)?;
            Ok(Outcome::Success)
        }
        Some(ConfigAction::Delete) => {
            store.reset(false, prompter)?;
            Ok(Outcome::Success)
        }
        None => {
            print_usage(&["config"])?;
            Ok(Outcome::Failure)
        }
    }
}
