use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Job config validation error (empty name, missing file, etc.).
    ConfigValidation(String),
    /// Reference table has no rows, so the output row width is unknown.
    EmptyReference,
    /// A reference row with zero fields.
    EmptyRow { row: usize },
    /// Reference row width differs from row 0 under the strict width policy.
    RaggedRow { row: usize, width: usize, expected: usize },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::EmptyReference => write!(f, "reference list is empty: at least one row is required"),
            Self::EmptyRow { row } => write!(f, "reference row {}: row has no fields", row + 1),
            Self::RaggedRow { row, width, expected } => write!(
                f,
                "reference row {}: has {width} field(s), expected {expected} (width of row 1)",
                row + 1
            ),
        }
    }
}

impl std::error::Error for MatchError {}
