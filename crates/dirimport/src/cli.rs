//! Command-line entry point: argument parsing and the two host modes.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::info;

use crate::LogTarget;
use crate::app::controller::CapturingController;
use crate::app::entries::DirectoryEntryList;
use crate::app::submission::SubmissionWorkflow;
use crate::domain::errors::SubmitError;
use crate::infra::config::Config;
use crate::infra::output::{OutputTarget, write_document};
use crate::ui::app::{UiApp, UiOutcome};

/// Exit status used when the directory list is empty in headless mode.
const EXIT_EMPTY_DIRECTORY_LIST: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "dirimport",
    author,
    version,
    about = "Collect local directories to import and hand them to an importer",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory to prefill; repeat for several rows
    #[arg(short, long = "dir", value_name = "PATH")]
    pub dirs: Vec<String>,

    /// Write the request document here instead of stdout ("-" for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Submit the --dir values directly without opening the form
    #[arg(long)]
    pub no_tui: bool,

    /// Extra config file layered over the global and workspace ones
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Settings resolved from the CLI and the layered config.
struct RunSettings {
    output: OutputTarget,
    compact: bool,
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    if let Some(Commands::Completions { shell }) = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "dirimport", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref())?;

    let log_target = match cli.log_file.or_else(|| config.defaults.log_file.clone()) {
        Some(path) => LogTarget::File(path),
        None if cli.no_tui => LogTarget::Stderr,
        None => LogTarget::Discard,
    };
    crate::init(log_target)?;

    let settings = RunSettings {
        output: OutputTarget::from_path(cli.output.or_else(|| config.defaults.output.clone())),
        compact: cli.compact || config.defaults.compact(),
    };

    let entries = if cli.dirs.is_empty() {
        DirectoryEntryList::with_rows(config.defaults.initial_rows())
    } else {
        DirectoryEntryList::with_values(cli.dirs)
    };

    if cli.no_tui {
        run_headless(&config, entries, &settings)
    } else {
        run_interactive(&config, entries, &settings)
    }
}

fn run_headless(
    config: &Config,
    entries: DirectoryEntryList,
    settings: &RunSettings,
) -> Result<ExitCode> {
    let mut workflow = SubmissionWorkflow::new(CapturingController::new());
    match workflow.submit(&entries) {
        Ok(_) => {
            let request = workflow
                .into_controller()
                .take()
                .context("submission produced no request")?;
            write_document(&request, &settings.output, settings.compact)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(SubmitError::EmptyDirectoryList) => {
            eprintln!("{}", config.labels.empty_directory_warning());
            Ok(ExitCode::from(EXIT_EMPTY_DIRECTORY_LIST))
        }
        Err(err) => Err(anyhow!(err)),
    }
}

fn run_interactive(
    config: &Config,
    entries: DirectoryEntryList,
    settings: &RunSettings,
) -> Result<ExitCode> {
    let mut app = UiApp::new(config, entries, CapturingController::new())?;
    match app.run()? {
        UiOutcome::Submitted { directories } => {
            let request = app
                .into_controller()
                .take()
                .context("submitted form produced no request")?;
            write_document(&request, &settings.output, settings.compact)?;
            info!(directories, "directory import request handed off");
            Ok(ExitCode::SUCCESS)
        }
        UiOutcome::Cancelled => {
            eprintln!("cancelled: no directories submitted");
            Ok(ExitCode::FAILURE)
        }
    }
}
