//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                   |
//! |------|-----------|-----------------------------------------------|
//! | 0    | Universal | Success (unmatched codes are not an error)    |
//! | 1    | Universal | General error (unspecified)                   |
//! | 2    | Universal | CLI usage error (bad args)                    |
//! | 3    | io        | Cannot read an input or write the output      |
//! | 4    | job       | Job file cannot be parsed or is invalid       |
//! | 5    | reference | Reference list empty or ragged                |
//! | 6    | io        | Output file locked (open in another program)  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use codefinder_io::IoError;
use codefinder_match::MatchError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, e.g. a multi-byte delimiter.
pub const EXIT_USAGE: u8 = 2;

/// An input list could not be read or parsed, or the output could not be written.
pub const EXIT_IO: u8 = 3;

/// Job file (`.codefinder.toml`) failed to parse or validate.
pub const EXIT_INVALID_JOB: u8 = 4;

/// Reference list is empty, has an empty row, or is ragged under `--ragged strict`.
pub const EXIT_INVALID_REFERENCE: u8 = 5;

/// Output file could not be opened for writing (permission denied).
pub const EXIT_OUTPUT_LOCKED: u8 = 6;

/// Map an engine error to its exit code.
pub fn match_exit_code(err: &MatchError) -> u8 {
    match err {
        MatchError::ConfigParse(_) | MatchError::ConfigValidation(_) => EXIT_INVALID_JOB,
        MatchError::EmptyReference | MatchError::EmptyRow { .. } | MatchError::RaggedRow { .. } => {
            EXIT_INVALID_REFERENCE
        }
    }
}

/// Map an I/O error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::PermissionDenied { .. } => EXIT_OUTPUT_LOCKED,
        IoError::Read { .. } | IoError::Parse { .. } | IoError::Write { .. } => EXIT_IO,
    }
}
