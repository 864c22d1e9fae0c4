// astroreport - build an MPC submission from newly measured astrometry

mod error;
mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use error::CliError;
use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "astroreport")]
#[command(about = "Collect new astrometry that has not been reported yet into an MPC submission file")]
#[command(version)]
#[command(after_help = "\
Examples:
  astroreport reported/ measured/ submission.txt
  astroreport reported/ measured/ repl.txt --replacement --start-date 2014-05-01
  astroreport reported/ measured/ out.txt --config report.toml --json
  astroreport reported/ measured/ out.txt --obs 'A. Observer' --obs 'B. Observer'")]
pub struct Cli {
    /// Directory of previously reported observations (searched recursively)
    pub existing_dir: PathBuf,

    /// Directory of newly measured observations (searched recursively)
    pub new_dir: PathBuf,

    /// Submission file to write
    pub report_file: PathBuf,

    /// Alias index file [default: <parent of EXISTING_DIR>/idx/file.idx]
    #[arg(long, value_name = "PATH")]
    pub idx_filename: Option<PathBuf>,

    /// Regex a file name must contain to be read from EXISTING_DIR [default: .*\.ast]
    #[arg(long, value_name = "REGEX")]
    pub existing_name_regex: Option<String>,

    /// Regex a file name must contain to be read from NEW_DIR [default: .*\.ast]
    #[arg(long, value_name = "REGEX")]
    pub new_name_regex: Option<String>,

    /// Only report observations after this date (exclusive; date, datetime or MJD)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// Only report observations before this date (exclusive; date, datetime or MJD)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Report replacements of earlier measurements instead of new observations
    #[arg(long)]
    pub replacement: bool,

    /// Match tolerance in arc-seconds [default: 0.2]
    #[arg(long, value_name = "ARCSEC")]
    pub tolerance: Option<f64>,

    /// Observatory code for the COD header line [default: 568]
    #[arg(long, value_name = "CODE")]
    pub cod: Option<String>,

    /// Observer name for the OBS header line (repeatable)
    #[arg(long = "obs", value_name = "NAME")]
    pub observers: Vec<String>,

    /// TOML config file; flags override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match report::cmd_report(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
