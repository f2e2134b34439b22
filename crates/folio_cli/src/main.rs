//! `folio` command-line driver.
//!
//! # Responsibility
//! - Load a page fixture, install the interactions and optionally replay a
//!   scripted session against it.
//! - Print a deterministic plain-text summary of the resulting page state.

mod session;

use clap::Parser;
use folio_core::{install, FixtureError, InstallError, PageFixture};
use log::{error, info};
use session::{PageSummary, SessionError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

/// Replay visitor interactions against a rendered portfolio page.
#[derive(Parser, Debug)]
#[command(name = "folio", version)]
#[command(about = "Replay visitor interactions against a portfolio page fixture")]
struct Args {
    /// Page fixture (JSON).
    fixture: PathBuf,

    /// Session script: a JSON array of steps.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// trace|debug|info|warn|error (defaults to debug in debug builds).
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug)]
enum CliError {
    Logging(String),
    Fixture(FixtureError),
    Output(serde_json::Error),
    Install(InstallError),
    Session(SessionError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging: {message}"),
            Self::Fixture(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to encode summary: {err}"),
            Self::Install(err) => write!(f, "{err}"),
            Self::Session(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Fixture(err) => Some(err),
            Self::Output(err) => Some(err),
            Self::Install(err) => Some(err),
            Self::Session(err) => Some(err),
        }
    }
}

impl From<FixtureError> for CliError {
    fn from(value: FixtureError) -> Self {
        Self::Fixture(value)
    }
}

impl From<InstallError> for CliError {
    fn from(value: InstallError) -> Self {
        Self::Install(value)
    }
}

impl From<SessionError> for CliError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_run module=cli status=error reason={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    init_cli_logging(args)?;

    let fixture = PageFixture::from_path(&args.fixture)?;
    let (mut page, config) = fixture.build()?;
    let _disposer = install(&mut page, config)?;

    let steps = match &args.script {
        Some(path) => session::load_steps(path)?,
        None => vec![session::Step::Load],
    };
    session::replay(&mut page, &steps)?;
    info!(
        "event=cli_run module=cli status=ok steps={} time_ms={}",
        steps.len(),
        page.now_ms()
    );
    let summary = PageSummary::capture(&page);
    if args.json {
        serde_json::to_string_pretty(&summary).map_err(CliError::Output)
    } else {
        Ok(summary.to_string())
    }
}

/// `--log-level`, or the build's default level when omitted.
fn log_level(args: &Args) -> &str {
    args.log_level
        .as_deref()
        .unwrap_or(folio_core::default_log_level())
}

fn init_cli_logging(args: &Args) -> Result<(), CliError> {
    let level = log_level(args);
    match &args.log_dir {
        Some(dir) => folio_core::init_logging(level, dir),
        None => folio_core::init_stderr_logging(level),
    }
    .map_err(CliError::Logging)
}
