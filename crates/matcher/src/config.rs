use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::normalize::AvoidTokens;
use crate::MISSING;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// A `.codefinder.toml` job: which lists to match, and how.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    pub name: String,
    pub mode: MatchMode,
    #[serde(default)]
    pub avoid: Option<AvoidSpec>,
    #[serde(default = "default_missing")]
    pub missing: String,
    #[serde(default)]
    pub ragged: WidthPolicy,
    /// Spread queries across worker threads.
    #[serde(default)]
    pub parallel: bool,
    pub files: FilesConfig,
}

fn default_missing() -> String {
    MISSING.to_string()
}

// ---------------------------------------------------------------------------
// Mode + width policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Trimmed reference code equals the normalized query, case-sensitive.
    Exact,
    /// Normalized query is a case-insensitive substring of the reference code.
    Partial,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Partial => write!(f, "partial"),
        }
    }
}

/// How reference tables with rows of differing width are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthPolicy {
    /// Every reference row must have the width of row 0.
    Strict,
    /// Matched output rows mirror their own reference row's width.
    /// Missing rows still use the width of row 0.
    Mirror,
}

impl Default for WidthPolicy {
    fn default() -> Self {
        Self::Strict
    }
}

impl std::fmt::Display for WidthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Mirror => write!(f, "mirror"),
        }
    }
}

// ---------------------------------------------------------------------------
// Avoid tokens + files
// ---------------------------------------------------------------------------

/// Avoid tokens as written in a job file: `"-R, -G"` or `["-R", "-G"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AvoidSpec {
    Raw(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub primary: String,
    pub reference: String,
    #[serde(default)]
    pub output: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.name.trim().is_empty() {
            return Err(MatchError::ConfigValidation("name must not be empty".into()));
        }

        if self.files.primary.trim().is_empty() {
            return Err(MatchError::ConfigValidation(
                "files.primary must not be empty".into(),
            ));
        }
        if self.files.reference.trim().is_empty() {
            return Err(MatchError::ConfigValidation(
                "files.reference must not be empty".into(),
            ));
        }
        if let Some(output) = &self.files.output {
            if output.trim().is_empty() {
                return Err(MatchError::ConfigValidation(
                    "files.output must not be empty when set".into(),
                ));
            }
        }

        if self.missing.is_empty() {
            return Err(MatchError::ConfigValidation(
                "missing sentinel must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Resolved avoid tokens, in the order they are applied.
    pub fn avoid_tokens(&self) -> AvoidTokens {
        match &self.avoid {
            None => AvoidTokens::default(),
            Some(AvoidSpec::Raw(raw)) => AvoidTokens::parse(raw),
            Some(AvoidSpec::List(list)) => AvoidTokens::from_list(list.iter().cloned()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
