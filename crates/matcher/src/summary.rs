use crate::model::{MatchSummary, MatchedRow};

/// Compute summary statistics from matched rows.
pub fn summarize(rows: &[MatchedRow], row_width: usize) -> MatchSummary {
    let matched = rows.iter().filter(|r| r.is_match()).count();

    MatchSummary {
        queries: rows.len(),
        matched,
        missing: rows.len() - matched,
        row_width,
    }
}
