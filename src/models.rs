//! Data models for the results aggregator.
//!
//! This module contains the core data structures used throughout
//! the application: raw result records as they appear in the input
//! document, and the derived statistics produced by the analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Identity used when a record carries neither `solver_id` nor `name`.
pub const UNKNOWN_SOLVER: &str = "Unknown";

/// Label given to records without a status when they are projected for display.
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

/// Outcome classification of a benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Sat,
    Unsat,
    Unknown,
    Unsupported,
    /// Any label outside the known set, kept verbatim.
    Other(String),
}

impl Status {
    /// Whether this outcome counts as solved (SAT or UNSAT).
    pub fn is_solved(&self) -> bool {
        matches!(self, Status::Sat | Status::Unsat)
    }

    /// Returns an emoji representation of the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            Status::Sat => "🟢",
            Status::Unsat => "🔵",
            Status::Unknown => "⚪",
            Status::Unsupported => "🟠",
            Status::Other(_) => "⚫",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Sat => write!(f, "SAT"),
            Status::Unsat => write!(f, "UNSAT"),
            Status::Unknown => write!(f, "UNKNOWN"),
            Status::Unsupported => write!(f, "UNSUPPORTED"),
            Status::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        // Labels are matched exactly; "sat" is not "SAT".
        match s {
            "SAT" => Status::Sat,
            "UNSAT" => Status::Unsat,
            "UNKNOWN" => Status::Unknown,
            "UNSUPPORTED" => Status::Unsupported,
            other => Status::Other(other.to_string()),
        }
    }
}

/// One benchmark run, as found in the `data` array of the results table.
///
/// Every field is optional and may hold a number or a string; accessors
/// degrade malformed values to "absent" instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_vars: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clauses: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_clauses: Option<Value>,
}

impl ResultRecord {
    /// The raw status label, if present and non-empty.
    pub fn status_label(&self) -> Option<&str> {
        match self.status.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// The classified status, if present.
    pub fn status(&self) -> Option<Status> {
        self.status_label().map(Status::from)
    }

    /// Run time in seconds, if it parses to a finite number.
    pub fn time_secs(&self) -> Option<f64> {
        self.time.as_ref().and_then(parse_number)
    }

    /// Problem size: the first of variables, nb_vars, clauses, nb_clauses
    /// that parses to a positive integer.
    pub fn size(&self) -> Option<u64> {
        [&self.variables, &self.nb_vars, &self.clauses, &self.nb_clauses]
            .into_iter()
            .filter_map(|field| field.as_ref().and_then(parse_number))
            .map(f64::trunc)
            .find(|n| *n > 0.0)
            .map(|n| n as u64)
    }

    /// Resolve the grouping identity and the display name of the solver.
    ///
    /// Identity is the first non-empty of `solver_id` and `name`, falling back
    /// to [`UNKNOWN_SOLVER`]. The display name prefers `name`, then
    /// `"Solver <solver_id>"`, then the identity itself.
    pub fn resolve_identity(&self) -> SolverIdentity {
        let solver_id = self.solver_id.as_ref().and_then(text_value);
        let name = self.name.as_ref().and_then(text_value);

        let id = solver_id
            .clone()
            .or_else(|| name.clone())
            .unwrap_or_else(|| UNKNOWN_SOLVER.to_string());

        let display = match (name, solver_id) {
            (Some(name), _) => name,
            (None, Some(solver_id)) => format!("Solver {}", solver_id),
            (None, None) => id.clone(),
        };

        SolverIdentity { id, name: display }
    }
}

/// A resolved solver identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolverIdentity {
    /// Grouping key.
    pub id: String,
    /// Display label.
    pub name: String,
}

/// Parse a JSON number or numeric string. Non-finite and non-numeric
/// values are treated as absent.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Render a string or number as identity text; empty strings are absent.
///
/// Integral floats render without a fraction, so `7.0` and `"7"` share
/// an identity.
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", f as i64))
            }
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

/// Mapping from status label to occurrence count.
pub type StatusCounts = BTreeMap<String, usize>;

/// One slice of the status breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusShare {
    pub status: String,
    pub count: usize,
    /// Share of all counted records, rounded to the nearest integer.
    pub percentage: u32,
}

/// A rate that may not be computable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Rate {
    Percent(u32),
    InsufficientData,
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Percent(p) => write!(f, "{}%", p),
            Rate::InsufficientData => write!(f, "n/a (insufficient data)"),
        }
    }
}

/// Top-line numbers for the overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    /// Number of records in the results table.
    pub total: usize,
    /// SAT records over all records.
    pub success_rate: Rate,
}

/// Aggregate statistics for one solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    pub name: String,
    pub attempts: usize,
    pub solved: usize,
    /// Sum of run times over solved records, in seconds.
    pub total_time: f64,
}

impl SolverStats {
    pub fn new(name: String) -> Self {
        Self {
            name,
            attempts: 0,
            solved: 0,
            total_time: 0.0,
        }
    }

    /// Percentage of attempts that were solved.
    pub fn solve_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.solved as f64 / self.attempts as f64 * 100.0
    }

    /// Mean time of solved runs, or 0 when nothing was solved.
    pub fn avg_time(&self) -> f64 {
        if self.solved > 0 {
            self.total_time / self.solved as f64
        } else {
            0.0
        }
    }

    /// Ranking score: `solved * 1000 - total_time`.
    ///
    /// A heuristic where the solve count dominates and cumulative time only
    /// separates solvers with equal counts.
    pub fn score(&self) -> f64 {
        self.solved as f64 * 1000.0 - self.total_time
    }
}

/// Mapping from solver identity to its statistics.
pub type SolverStatsMap = BTreeMap<String, SolverStats>;

/// A solver's position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub attempts: usize,
    pub solved: usize,
    pub total_time: f64,
    pub solve_rate: f64,
    pub avg_time: f64,
    pub score: f64,
}

/// A record projected onto the size/time plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub time: f64,
    pub size: u64,
    pub status: String,
    pub solver_id: String,
    pub solver_name: String,
    /// Number of records this solver has in the whole table.
    pub solver_attempts: usize,
}

/// Median time of one populated size bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Bucket midpoint.
    pub size: f64,
    pub time: f64,
}

/// Size-vs-time dataset with its trend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Distribution {
    pub points: Vec<ScatterPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_extent: Option<(u64, u64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_extent: Option<(f64, f64)>,
    pub trend: Vec<TrendPoint>,
}

/// Dashboard view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Overview and top solvers
    #[default]
    Home,
    /// Full ranking and size/time distribution
    Stats,
}

/// Navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// A menu entry was picked.
    Select(Section),
    /// The "advanced statistics" shortcut on the overview.
    OpenAdvancedStats,
}

/// Pure navigation reducer.
pub fn navigate(_current: Section, action: NavAction) -> Section {
    match action {
        NavAction::Select(section) => section,
        NavAction::OpenAdvancedStats => Section::Stats,
    }
}

/// Metadata about the generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// URL or path the document was read from.
    pub source: String,
    /// Name of the table that was aggregated.
    pub table: String,
    pub generated_at: DateTime<Utc>,
    pub records: usize,
    pub duration_seconds: f64,
}

/// The complete aggregation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Sections to render; `None` means all of them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    pub headline: Headline,
    pub status_counts: StatusCounts,
    pub status_shares: Vec<StatusShare>,
    pub solvers: SolverStatsMap,
    /// Short ranking shown on the home section.
    pub top_solvers: Vec<RankingEntry>,
    /// Longer ranking shown on the stats section.
    pub ranking: Vec<RankingEntry>,
    pub distribution: Distribution,
}

impl Report {
    /// Whether the given section should be rendered.
    pub fn shows(&self, section: Section) -> bool {
        self.section.map_or(true, |s| s == section)
    }
}
