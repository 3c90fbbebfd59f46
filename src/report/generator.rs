//! Markdown and JSON report generation.
//!
//! The Markdown layout mirrors the dashboard: an overview with the status
//! breakdown and the top solvers (home section), then the full ranking and
//! the size/time distribution (stats section).

use crate::models::{
    Distribution, Headline, RankingEntry, Report, ReportMetadata, Section, Status, StatusShare,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# SAT Benchmark Results\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));

    if report.shows(Section::Home) {
        output.push_str(&generate_overview_section(
            &report.headline,
            &report.status_shares,
        ));
        output.push_str(&generate_ranking_section(
            "Top Solvers",
            &report.top_solvers,
            false,
        ));
    }

    if report.shows(Section::Stats) {
        output.push_str(&generate_ranking_section(
            "Solver Ranking",
            &report.ranking,
            true,
        ));
        output.push_str(&generate_distribution_section(&report.distribution));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!("- **Table:** `{}`\n", metadata.table));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.records));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");

    if report.shows(Section::Home) {
        toc.push_str("- [Overview](#overview)\n");
        toc.push_str("- [Top Solvers](#top-solvers)\n");
    }
    if report.shows(Section::Stats) {
        toc.push_str("- [Solver Ranking](#solver-ranking)\n");
        toc.push_str("- [Size vs Time](#size-vs-time)\n");
    }

    toc.push('\n');

    toc
}

/// Generate the overview: headline numbers and status breakdown.
fn generate_overview_section(headline: &Headline, shares: &[StatusShare]) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str(&format!("- **Problems:** {}\n", headline.total));
    section.push_str(&format!(
        "- **Success rate (SAT):** {}\n\n",
        headline.success_rate
    ));

    if shares.is_empty() {
        section.push_str("No status information in the results table.\n\n");
        return section;
    }

    section.push_str("### Status Breakdown\n\n");
    section.push_str("| Status | Count | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for share in shares {
        section.push_str(&format!(
            "| {} {} | {} | {}% |\n",
            Status::from(share.status.as_str()).emoji(),
            share.status,
            share.count,
            share.percentage
        ));
    }
    section.push('\n');

    section
}

/// Generate a ranking table. The detailed form adds rates and scores.
fn generate_ranking_section(title: &str, entries: &[RankingEntry], detailed: bool) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title));

    if entries.is_empty() {
        section.push_str("No solvers to rank.\n\n");
        return section;
    }

    if detailed {
        section.push_str("| Rank | Solver | Solved | Solve Rate | Avg Time | Score |\n");
        section.push_str("|:---:|:---|:---:|:---:|:---:|---:|\n");
        for entry in entries {
            section.push_str(&format!(
                "| #{} | {} | {}/{} | {:.1}% | {:.2}s | {:.2} |\n",
                entry.rank,
                entry.name,
                entry.solved,
                entry.attempts,
                entry.solve_rate,
                entry.avg_time,
                entry.score
            ));
        }
    } else {
        section.push_str("| Rank | Solver | Solved |\n");
        section.push_str("|:---:|:---|:---:|\n");
        for entry in entries {
            section.push_str(&format!(
                "| #{} | {} | {} |\n",
                entry.rank, entry.name, entry.solved
            ));
        }
    }
    section.push('\n');

    section
}

/// Generate the size/time distribution section.
fn generate_distribution_section(distribution: &Distribution) -> String {
    let mut section = String::new();

    section.push_str("## Size vs Time\n\n");

    let (Some((size_lo, size_hi)), Some((time_lo, time_hi))) =
        (distribution.size_extent, distribution.time_extent)
    else {
        section.push_str("No records carry both a run time and a problem size.\n\n");
        return section;
    };

    section.push_str(&format!("- **Points:** {}\n", distribution.points.len()));
    section.push_str(&format!("- **Size range:** {} - {}\n", size_lo, size_hi));
    section.push_str(&format!(
        "- **Time range:** {:.2}s - {:.2}s\n\n",
        time_lo, time_hi
    ));

    if distribution.trend.is_empty() {
        section.push_str("Not enough data per size bucket to draw a trend.\n\n");
        return section;
    }

    section.push_str("### Median Time Trend\n\n");
    section.push_str("| Size (bucket center) | Median Time |\n");
    section.push_str("|---:|---:|\n");
    for point in &distribution.trend {
        section.push_str(&format!("| {:.0} | {:.2}s |\n", point.size, point.time));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by satboard*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::BinningOptions;
    use crate::models::{Rate, ResultRecord, TrendPoint};
    use crate::report::{build_report, ReportOptions};
    use serde_json::json;

    fn create_test_report(section: Option<Section>) -> Report {
        let records: Vec<ResultRecord> = serde_json::from_value(json!([
            {"solver_id": "A", "name": "kissat", "status": "SAT", "time": 2, "variables": 10},
            {"solver_id": "A", "status": "UNSAT", "time": 3, "variables": 20},
            {"solver_id": "A", "status": "UNKNOWN", "time": 1},
            {"solver_id": "B", "status": "SAT", "time": 1, "clauses": 40}
        ]))
        .unwrap();

        let options = ReportOptions {
            source: "https://example.org/results.json".to_string(),
            table: "results".to_string(),
            home_top: 5,
            stats_top: 15,
            binning: BinningOptions::default(),
            section,
        };

        build_report(&records, &options, std::time::Instant::now())
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(None);
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# SAT Benchmark Results"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Overview"));
        assert!(markdown.contains("## Top Solvers"));
        assert!(markdown.contains("## Solver Ranking"));
        assert!(markdown.contains("## Size vs Time"));
        assert!(markdown.contains("kissat"));
        assert!(markdown.contains("| #1 | kissat | 2/3 | 66.7% | 2.50s | 1995.00 |"));
    }

    #[test]
    fn test_section_filtering() {
        let home = generate_markdown_report(&create_test_report(Some(Section::Home)));
        assert!(home.contains("## Overview"));
        assert!(!home.contains("## Solver Ranking"));

        let stats = generate_markdown_report(&create_test_report(Some(Section::Stats)));
        assert!(!stats.contains("## Overview"));
        assert!(stats.contains("## Size vs Time"));
    }

    #[test]
    fn test_generate_overview_section() {
        let headline = Headline {
            total: 3,
            success_rate: Rate::Percent(67),
        };
        let shares = vec![
            StatusShare {
                status: "SAT".to_string(),
                count: 2,
                percentage: 67,
            },
            StatusShare {
                status: "UNSAT".to_string(),
                count: 1,
                percentage: 33,
            },
        ];

        let section = generate_overview_section(&headline, &shares);

        assert!(section.contains("**Problems:** 3"));
        assert!(section.contains("67%"));
        assert!(section.contains("| 🟢 SAT | 2 | 67% |"));

        let empty = Headline {
            total: 0,
            success_rate: Rate::InsufficientData,
        };
        let section = generate_overview_section(&empty, &[]);
        assert!(section.contains("insufficient data"));
    }

    #[test]
    fn test_generate_distribution_section() {
        let empty = generate_distribution_section(&Distribution::default());
        assert!(empty.contains("No records carry"));

        let mut distribution = create_test_report(None).distribution;
        assert!(generate_distribution_section(&distribution).contains("Not enough data"));

        distribution.trend = vec![TrendPoint {
            size: 25.0,
            time: 1.5,
        }];
        let section = generate_distribution_section(&distribution);
        assert!(section.contains("| 25 | 1.50s |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(None);
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"status_counts\""));
        assert!(json.contains("\"ranking\""));
        assert!(json.contains("\"distribution\""));
        assert!(json.contains("\"insufficient_data\"") || json.contains("\"percent\""));
    }
}
