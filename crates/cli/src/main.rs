// codefinder CLI - match a list of product codes against a reference price list

mod exit_codes;
mod matching;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use codefinder_io::IoError;
use codefinder_match::MatchError;

use exit_codes::{io_exit_code, match_exit_code, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "codefinder")]
#[command(about = "Look up product codes in a reference price list (exact or partial match)")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Log more detail to stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the codes of a primary list against a reference list
    #[command(after_help = "\
Examples:
  codefinder match website.csv prices.csv --mode exact
  codefinder match website.csv prices.csv --mode partial --avoid '-R, -G, -inner' -o filtered.csv
  codefinder match website.csv prices.csv --mode exact --json
  codefinder match website.csv prices.csv --mode exact --ragged mirror --missing N/A")]
    Match {
        /// Primary list: one code per row, first column only
        primary: PathBuf,

        /// Reference list: code in the first column, attributes after it
        reference: PathBuf,

        /// How codes are compared
        #[arg(long, short = 'm')]
        mode: ModeArg,

        /// Comma-separated substrings removed from each code before comparison, in order
        #[arg(long, short = 'a', default_value = "")]
        avoid: String,

        /// Placeholder for the attribute columns of unmatched codes
        #[arg(long, default_value = codefinder_match::MISSING)]
        missing: String,

        /// Reference rows of differing width: reject (strict) or keep each row's width (mirror)
        #[arg(long, default_value = "strict")]
        ragged: RaggedArg,

        /// CSV delimiter for both inputs (when omitted: comma for the primary list, sniffed for the reference)
        #[arg(long)]
        delimiter: Option<char>,

        /// Write the result CSV to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print a JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Spread matching across all CPU cores
        #[arg(long)]
        parallel: bool,

        /// Suppress the summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Run a .codefinder.toml job file
    #[command(after_help = "\
Examples:
  codefinder run weekly.codefinder.toml
  codefinder run weekly.codefinder.toml --json
  codefinder run weekly.codefinder.toml --output other.csv")]
    Run {
        /// Path to the job file; list paths inside it are relative to its directory
        job: PathBuf,

        /// Write the result CSV here, overriding files.output
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print a JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Suppress the summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a job file without running it
    Validate {
        /// Path to the job file
        job: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Exact,
    Partial,
}

#[derive(Clone, Copy, ValueEnum)]
enum RaggedArg {
    Strict,
    Mirror,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: codefinder <command> [options]");
            eprintln!("       codefinder --help for more information");
            Ok(())
        }
        Some(Commands::Match {
            primary,
            reference,
            mode,
            avoid,
            missing,
            ragged,
            delimiter,
            output,
            json,
            parallel,
            quiet,
        }) => {
            let mode = match mode {
                ModeArg::Exact => codefinder_match::MatchMode::Exact,
                ModeArg::Partial => codefinder_match::MatchMode::Partial,
            };
            let ragged = match ragged {
                RaggedArg::Strict => codefinder_match::WidthPolicy::Strict,
                RaggedArg::Mirror => codefinder_match::WidthPolicy::Mirror,
            };
            matching::cmd_match(matching::MatchArgs {
                primary,
                reference,
                mode,
                avoid,
                missing,
                ragged,
                delimiter,
                output,
                json,
                parallel,
                quiet,
            })
        }
        Some(Commands::Run { job, output, json, quiet }) => matching::cmd_run(job, output, json, quiet),
        Some(Commands::Validate { job }) => matching::cmd_validate(job),
    };

    match result {
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

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("CODEFINDER_COMMIT"), ")",
        "\nengine:  codefinder-match ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("CODEFINDER_TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the proper exit code.
    pub fn engine(err: MatchError) -> Self {
        let hint = match &err {
            MatchError::RaggedRow { .. } => Some(
                "pass --ragged mirror (or set ragged = \"mirror\" in the job file) to accept rows of differing width"
                    .to_string(),
            ),
            MatchError::EmptyReference => {
                Some("the reference list needs at least one non-blank row".to_string())
            }
            _ => None,
        };
        Self { code: match_exit_code(&err), message: err.to_string(), hint }
    }

    /// Create error from an I/O error with the proper exit code.
    pub fn io(err: IoError) -> Self {
        let hint = match &err {
            IoError::PermissionDenied { .. } => Some(
                "the file may be open in another program (e.g. a spreadsheet); close it and run again"
                    .to_string(),
            ),
            _ => None,
        };
        Self { code: io_exit_code(&err), message: err.to_string(), hint }
    }
}
