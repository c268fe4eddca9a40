use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::matcher::{Matcher, ReferenceTable};
use crate::model::{MatchInput, MatchMeta, MatchReport};

/// Run one matching job. Returns the result table plus run metadata.
///
/// The input is consumed: the reference rows move into the validated
/// [`ReferenceTable`], the queries are only read.
pub fn run(config: &MatchConfig, input: MatchInput) -> Result<MatchReport, MatchError> {
    let MatchInput { queries, reference } = input;
    let table = ReferenceTable::new(reference, config.ragged)?;

    let avoid = config.avoid_tokens();
    let avoid_list = avoid.as_slice().to_vec();
    let matcher = Matcher::new(config.mode, avoid).with_missing(config.missing.clone());

    log::info!(
        "job '{}': {} mode, {} quer(ies) against {} reference row(s) of width {}, {} avoid token(s)",
        config.name,
        config.mode,
        queries.len(),
        table.len(),
        table.row_width(),
        avoid_list.len(),
    );

    let result = if config.parallel {
        matcher.match_codes_parallel(&queries, &table)
    } else {
        matcher.match_codes(&queries, &table)
    };

    Ok(MatchReport {
        meta: MatchMeta {
            job_name: config.name.clone(),
            mode: config.mode,
            width_policy: config.ragged,
            avoid_tokens: avoid_list,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        table: result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilesConfig, MatchMode, WidthPolicy};
    use crate::normalize::AvoidTokens;

    fn config(mode: MatchMode, avoid: &str) -> MatchConfig {
        MatchConfig {
            name: "test".into(),
            mode,
            avoid: Some(crate::config::AvoidSpec::Raw(avoid.into())),
            missing: crate::MISSING.into(),
            ragged: WidthPolicy::Strict,
            parallel: false,
            files: FilesConfig {
                primary: "a.csv".into(),
                reference: "b.csv".into(),
                output: None,
            },
        }
    }

    fn input(queries: &[&str], reference: &[&[&str]]) -> MatchInput {
        MatchInput {
            queries: queries.iter().map(|s| s.to_string()).collect(),
            reference: reference
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn run_fills_meta_and_summary() {
        let report = run(
            &config(MatchMode::Partial, "-R, -G"),
            input(&["abc-R", "zzz"], &[&["SomeABCPart", "9.99"]]),
        )
        .unwrap();
        assert_eq!(report.meta.job_name, "test");
        assert_eq!(report.meta.mode, MatchMode::Partial);
        assert_eq!(report.meta.avoid_tokens, vec!["-R", "-G"]);
        assert_eq!(report.meta.engine_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(report.table.summary.matched, 1);
        assert_eq!(report.table.summary.missing, 1);
        assert_eq!(
            report.table.into_records(),
            vec![vec!["abc-R", "9.99"], vec!["zzz", "MISSING"]]
        );
    }

    #[test]
    fn run_rejects_empty_reference() {
        let err = run(&config(MatchMode::Exact, ""), input(&["A"], &[])).unwrap_err();
        assert_eq!(err, MatchError::EmptyReference);
    }

    #[test]
    fn run_parallel_same_rows() {
        let mut cfg = config(MatchMode::Exact, "");
        let data = input(&["A", "B", "C", "A"], &[&["A", "1"], &["C", "3"]]);
        let sequential = run(&cfg, data.clone()).unwrap();
        cfg.parallel = true;
        let parallel = run(&cfg, data).unwrap();
        assert_eq!(sequential.table, parallel.table);
    }

    #[test]
    fn run_matches_direct_matcher() {
        let data = input(&["abc-R"], &[&["ABC", "1"]]);
        let report = run(&config(MatchMode::Partial, "-R"), data.clone()).unwrap();
        let table = ReferenceTable::new(data.reference, WidthPolicy::Strict).unwrap();
        let direct = Matcher::new(MatchMode::Partial, AvoidTokens::parse("-R"))
            .match_codes(&data.queries, &table);
        assert_eq!(report.table, direct);
    }

    #[test]
    fn report_serializes_flat() {
        let report = run(&config(MatchMode::Exact, ""), input(&["A"], &[&["A", "1"]])).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["meta"]["mode"], "exact");
        assert_eq!(json["summary"]["matched"], 1);
        assert_eq!(json["rows"][0]["fields"][1], "1");
        assert_eq!(json["rows"][0]["reference_index"], 0);
    }
}
