//! Size-versus-time distribution.
//!
//! Projects records that carry both a positive run time and a positive
//! problem size onto the size/time plane, then summarises the population
//! with a median-time trend over equal-width size buckets.

use crate::models::{
    Distribution, ResultRecord, ScatterPoint, SolverStatsMap, TrendPoint, UNKNOWN_STATUS,
};
use std::cmp::Ordering;

/// Settings for the trend computation.
#[derive(Debug, Clone, Copy)]
pub struct BinningOptions {
    /// Number of equal-width buckets over the observed size range.
    pub bins: usize,
    /// A bucket needs strictly more qualifying members than this.
    pub min_members: usize,
}

impl Default for BinningOptions {
    fn default() -> Self {
        Self {
            bins: 20,
            min_members: 5,
        }
    }
}

/// Select and project the records usable for size/time analysis.
///
/// `solvers` supplies display names and per-solver record counts; it should
/// be the statistics of the same record slice.
pub fn scatter_points(records: &[ResultRecord], solvers: &SolverStatsMap) -> Vec<ScatterPoint> {
    records
        .iter()
        .filter_map(|record| {
            let time = record.time_secs().filter(|t| *t > 0.0)?;
            let size = record.size()?;
            let identity = record.resolve_identity();
            let solver = solvers.get(&identity.id);

            Some(ScatterPoint {
                time,
                size,
                status: record
                    .status_label()
                    .unwrap_or(UNKNOWN_STATUS)
                    .to_string(),
                solver_name: solver.map_or(identity.name, |s| s.name.clone()),
                solver_attempts: solver.map_or(1, |s| s.attempts),
                solver_id: identity.id,
            })
        })
        .collect()
}

/// Median time per size bucket, skipping sparse buckets.
///
/// Buckets are half-open `[start, end)` except the last, which also holds
/// the maximum size. Members labelled UNKNOWN do not count.
pub fn trend(points: &[ScatterPoint], options: BinningOptions) -> Vec<TrendPoint> {
    let Some((min, max)) = size_extent(points) else {
        return Vec::new();
    };
    if options.bins == 0 {
        return Vec::new();
    }

    let mut sorted: Vec<&ScatterPoint> = points
        .iter()
        .filter(|p| p.status != UNKNOWN_STATUS)
        .collect();
    sorted.sort_by_key(|p| p.size);

    let (min, max) = (min as f64, max as f64);
    if max == min {
        let times: Vec<f64> = sorted.iter().map(|p| p.time).collect();
        return dense_median(times, options.min_members)
            .map(|time| vec![TrendPoint { size: min, time }])
            .unwrap_or_default();
    }

    let width = (max - min) / options.bins as f64;
    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); options.bins];
    for point in sorted {
        let offset = ((point.size as f64 - min) / width).floor() as usize;
        buckets[offset.min(options.bins - 1)].push(point.time);
    }

    buckets
        .into_iter()
        .enumerate()
        .filter_map(|(i, times)| {
            let start = min + i as f64 * width;
            let time = dense_median(times, options.min_members)?;
            Some(TrendPoint {
                size: start + width / 2.0,
                time,
            })
        })
        .collect()
}

/// Build the full distribution: points, extents and trend.
pub fn distribution(
    records: &[ResultRecord],
    solvers: &SolverStatsMap,
    options: BinningOptions,
) -> Distribution {
    let points = scatter_points(records, solvers);
    let trend = trend(&points, options);

    Distribution {
        size_extent: size_extent(&points),
        time_extent: time_extent(&points),
        trend,
        points,
    }
}

/// Smallest and largest size among the points.
pub fn size_extent(points: &[ScatterPoint]) -> Option<(u64, u64)> {
    let min = points.iter().map(|p| p.size).min()?;
    let max = points.iter().map(|p| p.size).max()?;
    Some((min, max))
}

/// Shortest and longest time among the points.
pub fn time_extent(points: &[ScatterPoint]) -> Option<(f64, f64)> {
    points.iter().map(|p| p.time).fold(None, |acc, t| match acc {
        None => Some((t, t)),
        Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
    })
}

/// Median of the values; even counts average the two middle values.
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn dense_median(values: Vec<f64>, min_members: usize) -> Option<f64> {
    if values.len() > min_members {
        median(values)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::solver_stats;
    use serde_json::{json, Value};

    fn records(value: Value) -> Vec<ResultRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn point(size: u64, time: f64, status: &str) -> ScatterPoint {
        ScatterPoint {
            time,
            size,
            status: status.to_string(),
            solver_id: "s".to_string(),
            solver_name: "s".to_string(),
            solver_attempts: 1,
        }
    }

    #[test]
    fn test_scatter_points_filtering() {
        let recs = records(json!([
            {"solver_id": "A", "status": "SAT", "time": "1.5", "variables": 100},
            {"solver_id": "A", "time": 2, "nb_clauses": "300"},
            {"solver_id": "A", "status": "SAT", "time": 0, "variables": 100},
            {"solver_id": "A", "status": "SAT", "time": "oops", "variables": 100},
            {"solver_id": "B", "status": "UNSAT", "time": 3}
        ]));
        let stats = solver_stats(&recs);

        let points = scatter_points(&recs, &stats);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].size, 100);
        assert_eq!(points[0].time, 1.5);
        assert_eq!(points[0].status, "SAT");
        assert_eq!(points[0].solver_attempts, 4);
        assert_eq!(points[0].solver_name, "Solver A");
        assert_eq!(points[1].size, 300);
        assert_eq!(points[1].status, UNKNOWN_STATUS);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), None);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_trend_drops_sparse_buckets() {
        // Range [0, 1000] split into 20 buckets of width 50.
        let mut points = vec![point(0, 1.0, "SAT"), point(1000, 1.0, "SAT")];
        // Bucket [100, 150): exactly five members.
        for t in [1.0, 2.0, 3.0, 4.0, 5.0] {
            points.push(point(110, t, "SAT"));
        }
        // Bucket [500, 550): six members.
        for t in [6.0, 1.0, 5.0, 2.0, 4.0, 3.0] {
            points.push(point(520, t, "UNSAT"));
        }

        let trend = trend(&points, BinningOptions::default());

        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].size, 525.0);
        assert_eq!(trend[0].time, 3.5);
    }

    #[test]
    fn test_trend_ignores_unknown_members() {
        let mut points = vec![point(0, 1.0, "SAT"), point(1000, 1.0, "SAT")];
        for t in [1.0, 2.0, 3.0, 4.0, 5.0] {
            points.push(point(700, t, "SAT"));
        }
        points.push(point(700, 100.0, UNKNOWN_STATUS));

        assert!(trend(&points, BinningOptions::default()).is_empty());
    }

    #[test]
    fn test_trend_last_bucket_holds_maximum() {
        let mut points: Vec<_> = (0..6).map(|i| point(1000, i as f64, "SAT")).collect();
        points.push(point(0, 1.0, "SAT"));

        let trend = trend(&points, BinningOptions::default());

        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].size, 975.0);
        assert_eq!(trend[0].time, 2.5);
    }

    #[test]
    fn test_trend_degenerate_range() {
        let points: Vec<_> = (1..=6).map(|i| point(42, i as f64, "SAT")).collect();

        let trend = trend(&points, BinningOptions::default());

        assert_eq!(trend, vec![TrendPoint { size: 42.0, time: 3.5 }]);
    }

    #[test]
    fn test_extents() {
        let points = vec![
            point(10, 2.0, "SAT"),
            point(5, 9.0, "SAT"),
            point(7, 0.5, "UNSAT"),
        ];
        assert_eq!(size_extent(&points), Some((5, 10)));
        assert_eq!(time_extent(&points), Some((0.5, 9.0)));
        assert_eq!(size_extent(&[]), None);
        assert_eq!(time_extent(&[]), None);
    }

    #[test]
    fn test_distribution_empty() {
        let dist = distribution(&[], &SolverStatsMap::new(), BinningOptions::default());
        assert!(dist.points.is_empty());
        assert!(dist.trend.is_empty());
        assert_eq!(dist.size_extent, None);
    }
}
