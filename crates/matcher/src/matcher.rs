use rayon::prelude::*;

use crate::config::{MatchMode, WidthPolicy};
use crate::error::MatchError;
use crate::model::{MatchedRow, ResultTable};
use crate::normalize::{normalize_query, AvoidTokens};
use crate::summary::summarize;
use crate::MISSING;

// ---------------------------------------------------------------------------
// Reference table
// ---------------------------------------------------------------------------

/// Comparison keys for one reference row.
#[derive(Debug, Clone)]
struct RefKey {
    trimmed: String,
    folded: String,
}

/// Validated, read-only reference rows. Field 0 of each row is its code.
///
/// `row_width` is fixed at construction from row 0 and sizes every
/// missing row, independent of how the rows were loaded.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    rows: Vec<Vec<String>>,
    /// One entry per row; `None` when field 0 is empty, which makes the
    /// row ineligible in every mode.
    keys: Vec<Option<RefKey>>,
    row_width: usize,
}

impl ReferenceTable {
    pub fn new(rows: Vec<Vec<String>>, policy: WidthPolicy) -> Result<Self, MatchError> {
        let row_width = match rows.first() {
            None => return Err(MatchError::EmptyReference),
            Some(first) => first.len(),
        };

        let mut keys = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.is_empty() {
                return Err(MatchError::EmptyRow { row: i });
            }
            if policy == WidthPolicy::Strict && row.len() != row_width {
                return Err(MatchError::RaggedRow {
                    row: i,
                    width: row.len(),
                    expected: row_width,
                });
            }

            let code = &row[0];
            keys.push(if code.is_empty() {
                None
            } else {
                let trimmed = code.trim().to_string();
                let folded = trimmed.to_lowercase();
                Some(RefKey { trimmed, folded })
            });
        }

        log::debug!(
            "reference table: {} row(s), width {row_width}, policy {policy}",
            rows.len()
        );

        Ok(Self {
            rows,
            keys,
            row_width,
        })
    }

    pub fn row_width(&self) -> usize {
        self.row_width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// Looks query codes up in a [`ReferenceTable`].
///
/// Duplicate policy: the reference rows are scanned in order and the first
/// row that satisfies the mode is authoritative. Later rows with the same
/// code are never consulted.
#[derive(Debug, Clone)]
pub struct Matcher {
    mode: MatchMode,
    avoid: AvoidTokens,
    missing: String,
}

impl Matcher {
    pub fn new(mode: MatchMode, avoid: AvoidTokens) -> Self {
        Self {
            mode,
            avoid,
            missing: MISSING.to_string(),
        }
    }

    /// Override the placeholder used for unmatched attribute columns.
    pub fn with_missing(mut self, missing: impl Into<String>) -> Self {
        self.missing = missing.into();
        self
    }

    /// Index of the first reference row whose code satisfies the mode.
    pub fn find_first(&self, candidate: &str, table: &ReferenceTable) -> Option<usize> {
        match self.mode {
            MatchMode::Exact => table
                .keys
                .iter()
                .position(|k| k.as_ref().is_some_and(|k| k.trimmed == candidate)),
            MatchMode::Partial => {
                let needle = candidate.to_lowercase();
                table
                    .keys
                    .iter()
                    .position(|k| k.as_ref().is_some_and(|k| k.folded.contains(&needle)))
            }
        }
    }

    /// Match a single query code.
    pub fn match_one(&self, query: &str, table: &ReferenceTable) -> MatchedRow {
        let candidate = normalize_query(query, &self.avoid);
        let reference_index = self.find_first(&candidate, table);

        let mut fields = Vec::with_capacity(table.row_width.max(1));
        fields.push(query.to_string());
        match reference_index {
            Some(idx) => fields.extend(table.rows[idx][1..].iter().cloned()),
            None => fields.extend(
                std::iter::repeat(self.missing.clone()).take(table.row_width.saturating_sub(1)),
            ),
        }

        log::trace!(
            "query {query:?} -> candidate {candidate:?} -> {}",
            reference_index.map_or_else(|| "missing".to_string(), |i| format!("row {i}"))
        );

        MatchedRow {
            query: query.to_string(),
            candidate,
            reference_index,
            fields,
        }
    }

    /// Match every query code, one output row per query, in query order.
    pub fn match_codes<S: AsRef<str>>(&self, queries: &[S], table: &ReferenceTable) -> ResultTable {
        let rows: Vec<MatchedRow> = queries
            .iter()
            .map(|q| self.match_one(q.as_ref(), table))
            .collect();
        self.finish(rows, table)
    }

    /// Same output as [`Matcher::match_codes`], with queries spread across
    /// the rayon pool. The reference table is shared read-only.
    pub fn match_codes_parallel<S: AsRef<str> + Sync>(
        &self,
        queries: &[S],
        table: &ReferenceTable,
    ) -> ResultTable {
        let rows: Vec<MatchedRow> = queries
            .par_iter()
            .map(|q| self.match_one(q.as_ref(), table))
            .collect();
        self.finish(rows, table)
    }

    fn finish(&self, rows: Vec<MatchedRow>, table: &ReferenceTable) -> ResultTable {
        let summary = summarize(&rows, table.row_width);
        log::debug!(
            "{} match: {} queries, {} matched, {} missing",
            self.mode,
            summary.queries,
            summary.matched,
            summary.missing
        );
        ResultTable { rows, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn table(data: &[&[&str]]) -> ReferenceTable {
        ReferenceTable::new(rows(data), WidthPolicy::Strict).unwrap()
    }

    fn fields(result: &ResultTable) -> Vec<Vec<String>> {
        result.clone().into_records()
    }

    #[test]
    fn exact_keeps_original_query_text() {
        let t = table(&[&["ABC", "1.00"], &["XYZ", "2.00"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&["ABC", " XYZ "], &t);
        assert_eq!(fields(&out), rows(&[&["ABC", "1.00"], &[" XYZ ", "2.00"]]));
        assert_eq!(out.rows[1].candidate, "XYZ");
    }

    #[test]
    fn exact_is_case_sensitive() {
        let t = table(&[&["ABC", "1.00"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&["abc"], &t);
        assert_eq!(fields(&out), rows(&[&["abc", "MISSING"]]));
    }

    #[test]
    fn exact_compares_trimmed_reference_code() {
        let t = table(&[&["  ABC ", "1.00"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&["ABC"], &t);
        assert_eq!(out.rows[0].reference_index, Some(0));
    }

    #[test]
    fn partial_is_case_insensitive_substring() {
        let t = table(&[&["SomeABCPart", "9.99"]]);
        let m = Matcher::new(MatchMode::Partial, AvoidTokens::parse("-R"));
        let out = m.match_codes(&["abc-R"], &t);
        assert_eq!(out.rows[0].candidate, "abc");
        assert_eq!(fields(&out), rows(&[&["abc-R", "9.99"]]));
    }

    #[test]
    fn partial_is_directional() {
        // Reference code must contain the candidate, not the other way round.
        let t = table(&[&["AB", "1.00"]]);
        let m = Matcher::new(MatchMode::Partial, AvoidTokens::default());
        let out = m.match_codes(&["ABC"], &t);
        assert!(!out.rows[0].is_match());
    }

    #[test]
    fn no_match_fills_sentinels() {
        let t = table(&[&["ABC", "1.00", "Widget"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&["ZZZ"], &t);
        assert_eq!(fields(&out), rows(&[&["ZZZ", "MISSING", "MISSING"]]));
    }

    #[test]
    fn custom_sentinel() {
        let t = table(&[&["ABC", "1.00"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default()).with_missing("N/A");
        let out = m.match_codes(&["ZZZ"], &t);
        assert_eq!(fields(&out), rows(&[&["ZZZ", "N/A"]]));
    }

    #[test]
    fn first_match_wins() {
        let t = table(&[&["ABC", "first"], &["ABC", "second"], &["XABCX", "third"]]);
        let exact = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        assert_eq!(fields(&exact.match_codes(&["ABC"], &t))[0][1], "first");

        let partial = Matcher::new(MatchMode::Partial, AvoidTokens::default());
        let out = partial.match_codes(&["abc"], &t);
        assert_eq!(out.rows[0].reference_index, Some(0));
    }

    #[test]
    fn empty_reference_code_is_never_eligible() {
        let t = table(&[&["", "skip"], &["ABC", "take"]]);
        let m = Matcher::new(MatchMode::Partial, AvoidTokens::default());
        // An empty candidate is a substring of everything, but row 0 is ineligible.
        let out = m.match_codes(&[""], &t);
        assert_eq!(out.rows[0].reference_index, Some(1));
    }

    #[test]
    fn blank_query_partial_takes_first_eligible_row() {
        let t = table(&[&["", "skip"], &["XYZ", "first"], &["ABC", "second"]]);
        let m = Matcher::new(MatchMode::Partial, AvoidTokens::default());
        let out = m.match_codes(&["", "   "], &t);
        assert_eq!(out.rows[0].reference_index, Some(1));
        assert_eq!(fields(&out), rows(&[&["", "first"], &["   ", "first"]]));
    }

    #[test]
    fn blank_query_exact_only_hits_whitespace_code() {
        let t = table(&[&["ABC", "1.00"], &["  ", "blank"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&[""], &t);
        assert_eq!(fields(&out), rows(&[&["", "blank"]]));
    }

    #[test]
    fn tokens_applied_in_order() {
        let t = table(&[&["A-G", "hit"], &["A", "wrong"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::from_list(["-R", "-RG"]));
        let out = m.match_codes(&["A-R-G"], &t);
        assert_eq!(out.rows[0].candidate, "A-G");
        assert_eq!(fields(&out), rows(&[&["A-R-G", "hit"]]));
    }

    #[test]
    fn empty_queries_give_empty_result() {
        let t = table(&[&["ABC", "1.00"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes::<&str>(&[], &t);
        assert!(out.is_empty());
        assert_eq!(out.preview(), None);
        assert_eq!(out.summary.queries, 0);
    }

    #[test]
    fn single_column_reference() {
        let t = table(&[&["ABC"], &["DEF"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&["DEF", "ZZZ"], &t);
        assert_eq!(fields(&out), rows(&[&["DEF"], &["ZZZ"]]));
        assert_eq!(out.summary.matched, 1);
    }

    #[test]
    fn empty_reference_rejected() {
        let err = ReferenceTable::new(Vec::new(), WidthPolicy::Strict).unwrap_err();
        assert_eq!(err, MatchError::EmptyReference);
    }

    #[test]
    fn zero_field_row_rejected() {
        let err = ReferenceTable::new(vec![vec!["A".into()], vec![]], WidthPolicy::Mirror).unwrap_err();
        assert_eq!(err, MatchError::EmptyRow { row: 1 });
    }

    #[test]
    fn strict_rejects_ragged_rows() {
        let err = ReferenceTable::new(rows(&[&["A", "1"], &["B", "2", "extra"]]), WidthPolicy::Strict)
            .unwrap_err();
        assert_eq!(err, MatchError::RaggedRow { row: 1, width: 3, expected: 2 });
    }

    #[test]
    fn mirror_follows_matched_row_width() {
        let t = ReferenceTable::new(
            rows(&[&["A", "1"], &["B", "2", "extra"], &["C"]]),
            WidthPolicy::Mirror,
        )
        .unwrap();
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&["B", "C", "Z"], &t);
        assert_eq!(
            fields(&out),
            rows(&[&["B", "2", "extra"], &["C"], &["Z", "MISSING"]])
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let t = table(&[&["ABC-1", "1"], &["abc-2", "2"], &["XYZ", "3"]]);
        let m = Matcher::new(MatchMode::Partial, AvoidTokens::parse("-R"));
        let queries: Vec<String> = (0..200)
            .map(|i| match i % 4 {
                0 => "abc-R".to_string(),
                1 => "xyz".to_string(),
                2 => format!("none{i}"),
                _ => "-2".to_string(),
            })
            .collect();
        assert_eq!(m.match_codes(&queries, &t), m.match_codes_parallel(&queries, &t));
    }

    #[test]
    fn preview_joins_first_row() {
        let t = table(&[&["ABC", "1.00", "Widget"]]);
        let m = Matcher::new(MatchMode::Exact, AvoidTokens::default());
        let out = m.match_codes(&["ABC", "ZZZ"], &t);
        assert_eq!(out.preview().as_deref(), Some("ABC, 1.00, Widget"));
    }
}
