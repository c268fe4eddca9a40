//! `codefinder match`, `run` and `validate`: load lists, match, persist.

use std::io;
use std::path::{Path, PathBuf};

use codefinder_io::csv::{load_query_codes, load_reference_rows, write_result, write_result_csv};
use codefinder_match::config::{AvoidSpec, FilesConfig};
use codefinder_match::{MatchConfig, MatchError, MatchMode, MatchReport, WidthPolicy};
use codefinder_match::model::MatchInput;

use crate::exit_codes::EXIT_IO;
use crate::CliError;

pub struct MatchArgs {
    pub primary: PathBuf,
    pub reference: PathBuf,
    pub mode: MatchMode,
    pub avoid: String,
    pub missing: String,
    pub ragged: WidthPolicy,
    pub delimiter: Option<char>,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub parallel: bool,
    pub quiet: bool,
}

/// Where the result goes once matching is done.
struct Sink<'a> {
    output: Option<&'a Path>,
    json: bool,
    quiet: bool,
}

pub fn cmd_match(args: MatchArgs) -> Result<(), CliError> {
    let delimiter = parse_delimiter(args.delimiter)?;

    let config = MatchConfig {
        name: format!("{} vs {}", file_label(&args.primary), file_label(&args.reference)),
        mode: args.mode,
        avoid: Some(AvoidSpec::Raw(args.avoid)),
        missing: args.missing,
        ragged: args.ragged,
        parallel: args.parallel,
        files: FilesConfig {
            primary: args.primary.display().to_string(),
            reference: args.reference.display().to_string(),
            output: args.output.as_ref().map(|p| p.display().to_string()),
        },
    };
    // Flag values go through the same checks as a job file, but are usage errors here
    config.validate().map_err(|e| match e {
        MatchError::ConfigValidation(msg) => CliError::usage(msg),
        other => CliError::engine(other),
    })?;

    let report = execute(&config, &args.primary, &args.reference, delimiter)?;
    emit(
        &report,
        Sink {
            output: args.output.as_deref(),
            json: args.json,
            quiet: args.quiet,
        },
    )
}

pub fn cmd_run(
    job_path: PathBuf,
    output: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_job(&job_path)?;

    // Resolve file paths relative to the job file's directory
    let base_dir = job_path.parent().unwrap_or_else(|| Path::new("."));
    let primary = base_dir.join(&config.files.primary);
    let reference = base_dir.join(&config.files.reference);
    let output = output.or_else(|| config.files.output.as_ref().map(|o| base_dir.join(o)));

    let report = execute(&config, &primary, &reference, None)?;
    emit(
        &report,
        Sink {
            output: output.as_deref(),
            json,
            quiet,
        },
    )
}

pub fn cmd_validate(job_path: PathBuf) -> Result<(), CliError> {
    let config = load_job(&job_path)?;
    let avoid = config.avoid_tokens();
    eprintln!(
        "valid: job '{}' ({} mode, {} avoid token(s), ragged {})",
        config.name,
        config.mode,
        avoid.len(),
        config.ragged,
    );
    Ok(())
}

fn load_job(job_path: &Path) -> Result<MatchConfig, CliError> {
    let job_str = std::fs::read_to_string(job_path).map_err(|e| CliError {
        code: EXIT_IO,
        message: format!("cannot read job file {}: {e}", job_path.display()),
        hint: None,
    })?;
    MatchConfig::from_toml(&job_str).map_err(CliError::engine)
}

fn execute(
    config: &MatchConfig,
    primary: &Path,
    reference: &Path,
    delimiter: Option<u8>,
) -> Result<MatchReport, CliError> {
    let queries = load_query_codes(primary, delimiter).map_err(CliError::io)?;
    let reference_rows = load_reference_rows(reference, delimiter).map_err(CliError::io)?;

    if queries.is_empty() {
        log::warn!("{} has no codes; the result will be empty", primary.display());
    }

    codefinder_match::run(
        config,
        MatchInput {
            queries,
            reference: reference_rows,
        },
    )
    .map_err(CliError::engine)
}

fn emit(report: &MatchReport, sink: Sink<'_>) -> Result<(), CliError> {
    if let Some(path) = sink.output {
        write_result_csv(path, &report.table).map_err(CliError::io)?;
        if !sink.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if sink.json {
        let json_str = serde_json::to_string_pretty(report).map_err(|e| CliError {
            code: crate::exit_codes::EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json_str}");
    } else if sink.output.is_none() {
        let stdout = io::stdout();
        write_result(stdout.lock(), &report.table).map_err(CliError::io)?;
    }

    if !sink.quiet {
        // Human summary to stderr
        let s = &report.table.summary;
        eprintln!(
            "{} match: {} code(s) against {}-column reference, {} matched, {} missing",
            report.meta.mode, s.queries, s.row_width, s.matched, s.missing,
        );
        if let Some(preview) = report.table.preview() {
            eprintln!("first row: {preview}");
        }
    }

    Ok(())
}

fn parse_delimiter(delimiter: Option<char>) -> Result<Option<u8>, CliError> {
    match delimiter {
        None => Ok(None),
        Some(c) if c.is_ascii() => Ok(Some(c as u8)),
        Some(c) => Err(CliError::usage(format!(
            "delimiter must be a single ASCII character, got {c:?}"
        ))),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
