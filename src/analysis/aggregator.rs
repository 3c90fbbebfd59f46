//! Result aggregation and solver statistics.
//!
//! This module groups result records by status and by solver identity,
//! and orders solvers by their ranking score.

use crate::models::{
    Headline, RankingEntry, Rate, ResultRecord, SolverStats, SolverStatsMap, Status,
    StatusCounts, StatusShare,
};
use std::cmp::Ordering;

/// Count records per status label. Records without a status are skipped.
pub fn status_counts(records: &[ResultRecord]) -> StatusCounts {
    let mut counts = StatusCounts::new();

    for label in records.iter().filter_map(ResultRecord::status_label) {
        *counts.entry(label.to_string()).or_default() += 1;
    }

    counts
}

/// Turn status counts into rounded percentage shares, largest first.
pub fn status_shares(counts: &StatusCounts) -> Vec<StatusShare> {
    let total: usize = counts.values().sum();

    let mut shares: Vec<StatusShare> = counts
        .iter()
        .map(|(status, &count)| StatusShare {
            status: status.clone(),
            count,
            percentage: percent(count, total),
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));
    shares
}

/// Total record count and the share of SAT outcomes.
pub fn headline(records: &[ResultRecord]) -> Headline {
    let total = records.len();
    let sat = records
        .iter()
        .filter(|r| r.status() == Some(Status::Sat))
        .count();

    let success_rate = if total == 0 {
        Rate::InsufficientData
    } else {
        Rate::Percent(percent(sat, total))
    };

    Headline {
        total,
        success_rate,
    }
}

/// Aggregate attempts, solved count and solving time per solver.
///
/// The display name is taken from the first record seen for each identity.
pub fn solver_stats(records: &[ResultRecord]) -> SolverStatsMap {
    let mut stats = SolverStatsMap::new();

    for record in records {
        let identity = record.resolve_identity();
        let entry = stats
            .entry(identity.id)
            .or_insert_with(|| SolverStats::new(identity.name));

        entry.attempts += 1;
        if record.status().is_some_and(|s| s.is_solved()) {
            entry.solved += 1;
            entry.total_time += record.time_secs().unwrap_or(0.0);
        }
    }

    stats
}

/// Rank solvers by score, highest first, keeping at most `top` entries.
///
/// Equal scores are ordered by identity ascending.
pub fn rank_solvers(stats: &SolverStatsMap, top: Option<usize>) -> Vec<RankingEntry> {
    let mut ordered: Vec<(&String, &SolverStats)> = stats.iter().collect();
    ordered.sort_by(|(id_a, a), (id_b, b)| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(Ordering::Equal)
            .then_with(|| id_a.cmp(id_b))
    });

    if let Some(n) = top {
        ordered.truncate(n);
    }

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, (id, s))| RankingEntry {
            rank: i + 1,
            id: id.clone(),
            name: s.name.clone(),
            attempts: s.attempts,
            solved: s.solved,
            total_time: s.total_time,
            solve_rate: s.solve_rate(),
            avg_time: s.avg_time(),
            score: s.score(),
        })
        .collect()
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}
