use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Read { path: PathBuf, message: String },
    /// File is not valid CSV.
    Parse { path: PathBuf, message: String },
    /// Output file is locked or read-only (typically open in a spreadsheet app).
    PermissionDenied { path: PathBuf },
    /// Output could not be written.
    Write { path: PathBuf, message: String },
}

impl IoError {
    pub(crate) fn read(path: &Path, err: std::io::Error) -> Self {
        Self::Read { path: path.to_path_buf(), message: err.to_string() }
    }

    pub(crate) fn parse(path: &Path, err: csv::Error) -> Self {
        Self::Parse { path: path.to_path_buf(), message: err.to_string() }
    }

    pub(crate) fn write(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path: path.to_path_buf() }
        } else {
            Self::Write { path: path.to_path_buf(), message: err.to_string() }
        }
    }

    /// Writer errors carry no path; `write_result_csv` fills it in.
    pub(crate) fn from_csv_write(err: csv::Error) -> Self {
        Self::Write { path: PathBuf::new(), message: err.to_string() }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "cannot parse {} as CSV: {message}", path.display())
            }
            Self::PermissionDenied { path } => {
                write!(f, "permission denied writing {}", path.display())
            }
            Self::Write { path, message } if path.as_os_str().is_empty() => {
                write!(f, "write error: {message}")
            }
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for IoError {}
