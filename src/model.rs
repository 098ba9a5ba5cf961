/// Core data types for the charging queue estimation service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies beyond the
/// serde/chrono derives — only types.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Session types
// ---------------------------------------------------------------------------

/// A single charging session from the session-log export.
///
/// Corresponds to one CSV row, with `Start_Date` + `Start Time` combined
/// into one timestamp. Fields that failed to parse are `None` rather than
/// dropping the row: a malformed timestamp or duration degrades the site's
/// rate estimate, it does not abort the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargingSession {
    pub address: String,
    pub started_at: Option<NaiveDateTime>,
    pub duration_hours: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

// ---------------------------------------------------------------------------
// Rate types
// ---------------------------------------------------------------------------

/// Empirical per-site rates derived from the session log.
///
/// `None` means "undefined": fewer than two timestamped arrivals for the
/// arrival rate, or a missing/non-positive duration anywhere in the group
/// for the service rate. Undefined rates flow through to an `Undefined`
/// assessment instead of being coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteRates {
    /// λ — vehicle arrivals per hour.
    pub arrival_per_hour: Option<f64>,
    /// μ — sessions one charger completes per hour.
    pub service_per_hour: Option<f64>,
}

// ---------------------------------------------------------------------------
// Queue assessment types
// ---------------------------------------------------------------------------

/// Steady-state M/M/c metrics for one site, valid only when the system is
/// stable (utilization below 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueMetrics {
    /// ρ — offered load per charger, λ/(cμ).
    pub utilization: f64,
    /// Lq — expected vehicles waiting (not charging).
    pub queue_length: f64,
    /// Wq — expected wait in hours before a charger frees up.
    pub wait_hours: f64,
    /// P0 — probability of an empty site. `None` in the no-offered-load
    /// short-circuit (λ, μ, or c is zero), where the quantity has no
    /// meaningful value.
    pub idle_probability: Option<f64>,
}

/// Outcome of one queue-model evaluation for one site.
///
/// The three variants are the three things a report must never confuse:
/// a computed steady state, an overloaded site where Lq and Wq are
/// mathematically unbounded, and a site whose rates could not be estimated
/// from the data at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueueAssessment {
    /// ρ < 1 — the steady-state formulas apply. Also carries the
    /// degenerate zero tuple for sites with no offered load.
    Stable(QueueMetrics),
    /// ρ ≥ 1 — demand meets or exceeds capacity; queue length and wait
    /// grow without bound and are never reported as finite numbers.
    Unstable { utilization: f64 },
    /// λ or μ is undefined for this site.
    Undefined,
}

impl QueueAssessment {
    /// Finite expected wait, when one exists.
    pub fn wait_hours(&self) -> Option<f64> {
        match self {
            QueueAssessment::Stable(m) => Some(m.wait_hours),
            _ => None,
        }
    }

    /// Whether this site's wait exceeds `threshold_hours`.
    ///
    /// An unstable site exceeds any threshold (its wait is unbounded).
    /// An undefined site never does — there is nothing to compare.
    pub fn exceeds_wait(&self, threshold_hours: f64) -> bool {
        match self {
            QueueAssessment::Stable(m) => m.wait_hours > threshold_hours,
            QueueAssessment::Unstable { .. } => true,
            QueueAssessment::Undefined => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation pass types
// ---------------------------------------------------------------------------

/// Everything the pipeline knows about one site after one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteEvaluation {
    pub address: String,
    pub rates: SiteRates,
    /// Charger count used for this evaluation.
    pub chargers: u32,
    pub assessment: QueueAssessment,
}

/// A site that could not be evaluated in a pass. Failures are isolated:
/// one bad site never aborts the others, and the accumulated list is
/// reported alongside the successful metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteFailure {
    pub address: String,
    pub reason: String,
}

/// One full evaluation pass over every site in the dataset — the baseline
/// pass and the capacity what-if pass each produce one of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationPass {
    pub sites: BTreeMap<String, SiteEvaluation>,
    pub failures: Vec<SiteFailure>,
}

/// Record of a capacity what-if applied to one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityChange {
    pub address: String,
    pub chargers_before: u32,
    pub chargers_after: u32,
    pub assessment_after: QueueAssessment,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while evaluating a single site or record.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A CSV row's timestamp or duration could not be parsed.
    MalformedRecord(String),
    /// The site appears in the session log but not in the charger
    /// inventory. Evaluation is undefined without a charger count —
    /// the operator must add the site rather than let the model guess.
    SiteNotConfigured(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::MalformedRecord(detail) => write!(f, "Malformed record: {}", detail),
            EvalError::SiteNotConfigured(address) => {
                write!(f, "No charger count configured for site: {}", address)
            }
        }
    }
}

impl std::error::Error for EvalError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
