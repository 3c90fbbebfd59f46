//! Report assembly and rendering.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{self, BinningOptions};
use crate::models::{Report, ReportMetadata, ResultRecord, Section};
use chrono::Utc;
use std::time::Instant;

/// What goes into a report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Source description recorded in the metadata.
    pub source: String,
    pub table: String,
    pub home_top: usize,
    pub stats_top: usize,
    pub binning: BinningOptions,
    /// Restrict rendering to one section.
    pub section: Option<Section>,
}

/// Run every aggregation over the records and bundle the results.
///
/// The recorded duration runs from `started` to the end of aggregation,
/// so it covers fetching when the caller started the clock before it.
pub fn build_report(
    records: &[ResultRecord],
    options: &ReportOptions,
    started: Instant,
) -> Report {
    let status_counts = analysis::status_counts(records);
    let status_shares = analysis::status_shares(&status_counts);
    let solvers = analysis::solver_stats(records);
    let distribution = analysis::distribution(records, &solvers, options.binning);
    let headline = analysis::headline(records);
    let top_solvers = analysis::rank_solvers(&solvers, Some(options.home_top));
    let ranking = analysis::rank_solvers(&solvers, Some(options.stats_top));

    Report {
        metadata: ReportMetadata {
            source: options.source.clone(),
            table: options.table.clone(),
            generated_at: Utc::now(),
            records: records.len(),
            duration_seconds: started.elapsed().as_secs_f64(),
        },
        section: options.section,
        headline,
        top_solvers,
        ranking,
        status_counts,
        status_shares,
        solvers,
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rate;
    use serde_json::json;
    use std::time::Duration;

    fn options() -> ReportOptions {
        ReportOptions {
            source: "results.json".to_string(),
            table: "results".to_string(),
            home_top: 1,
            stats_top: 15,
            binning: BinningOptions::default(),
            section: None,
        }
    }

    #[test]
    fn test_build_report() {
        let records: Vec<ResultRecord> = serde_json::from_value(json!([
            {"solver_id": "A", "status": "SAT", "time": 2, "variables": 10},
            {"solver_id": "A", "status": "UNSAT", "time": 3, "variables": 20},
            {"solver_id": "A", "status": "UNKNOWN", "time": 1},
            {"solver_id": "B", "status": "SAT", "time": 1, "clauses": 40}
        ]))
        .unwrap();

        let report = build_report(&records, &options(), Instant::now());

        assert_eq!(report.metadata.records, 4);
        assert_eq!(report.headline.success_rate, Rate::Percent(50));
        assert_eq!(report.status_counts.get("SAT"), Some(&2));
        assert_eq!(report.solvers.len(), 2);
        assert_eq!(report.top_solvers.len(), 1);
        assert_eq!(report.top_solvers[0].id, "A");
        assert_eq!(report.ranking.len(), 2);
        assert_eq!(report.distribution.points.len(), 3);
        assert_eq!(report.distribution.size_extent, Some((10, 40)));
    }

    #[test]
    fn test_build_report_empty_table() {
        let report = build_report(&[], &options(), Instant::now());

        assert_eq!(report.headline.success_rate, Rate::InsufficientData);
        assert!(report.status_counts.is_empty());
        assert!(report.ranking.is_empty());
        assert!(report.distribution.points.is_empty());
    }

    #[test]
    fn test_duration_includes_time_before_aggregation() {
        let started = Instant::now();
        std::thread::sleep(Duration::from_millis(20));

        let report = build_report(&[], &options(), started);

        assert!(report.metadata.duration_seconds >= 0.02);
    }
}
