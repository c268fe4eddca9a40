use serde::Serialize;

use crate::config::{MatchMode, WidthPolicy};

// ---------------------------------------------------------------------------
// Per-query result
// ---------------------------------------------------------------------------

/// One output row plus how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRow {
    /// The query code exactly as supplied (untrimmed).
    pub query: String,
    /// Normalized search string the reference codes were compared against.
    pub candidate: String,
    /// Index of the first reference row that matched, if any.
    pub reference_index: Option<usize>,
    /// Output row: `[query] + attributes`, or `[query] + sentinels`.
    pub fields: Vec<String>,
}

impl MatchedRow {
    pub fn is_match(&self) -> bool {
        self.reference_index.is_some()
    }
}

// ---------------------------------------------------------------------------
// Result table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub queries: usize,
    pub matched: usize,
    pub missing: usize,
    pub row_width: usize,
}

/// Output of one matching run: one row per query code, in query order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    pub rows: Vec<MatchedRow>,
    pub summary: MatchSummary,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output rows as plain field sequences, ready for a CSV writer.
    pub fn records(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(|r| r.fields.as_slice())
    }

    pub fn into_records(self) -> Vec<Vec<String>> {
        self.rows.into_iter().map(|r| r.fields).collect()
    }

    /// First output row joined with `", "`, or `None` for an empty run.
    pub fn preview(&self) -> Option<String> {
        self.rows.first().map(|r| r.fields.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Report (JSON output)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub job_name: String,
    pub mode: MatchMode,
    pub width_policy: WidthPolicy,
    pub avoid_tokens: Vec<String>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub meta: MatchMeta,
    #[serde(flatten)]
    pub table: ResultTable,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Pre-loaded lists for one run.
#[derive(Debug, Clone, Default)]
pub struct MatchInput {
    /// Query codes from the primary list, in order.
    pub queries: Vec<String>,
    /// Reference rows from the secondary list; field 0 is the code.
    pub reference: Vec<Vec<String>>,
}
