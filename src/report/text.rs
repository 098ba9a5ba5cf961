/// Console report for an evaluation pass.
///
/// Every metric line is one of three things, and the wording keeps them
/// apart: a computed value, "undefined" where the data could not support
/// an estimate, or "unstable" where demand meets or exceeds capacity.
/// Numbers print with four decimals, matching the report this service has
/// always produced.

use std::fmt::Write;

use crate::model::{CapacityChange, EvaluationPass, QueueAssessment, SiteEvaluation};

const BANNER: &str = "═══════════════════════════════════════════════════════════";

/// Renders the per-site report for one pass.
pub fn render_pass_report(title: &str, pass: &EvaluationPass) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "📊 {}", title);
    let _ = writeln!(out, "{}", BANNER);

    if pass.sites.is_empty() {
        let _ = writeln!(out, "\nNo sites evaluated.");
    }
    for evaluation in pass.sites.values() {
        let _ = writeln!(out, "\n{}", render_site_block(evaluation));
    }

    if !pass.failures.is_empty() {
        let _ = writeln!(out, "\nFailures:");
        for failure in &pass.failures {
            let _ = writeln!(out, "  ✗ {}: {}", failure.address, failure.reason);
        }
    }

    let _ = writeln!(out, "{}", BANNER);
    out
}

fn render_site_block(evaluation: &SiteEvaluation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} chargers)",
        evaluation.address, evaluation.chargers
    );
    let _ = writeln!(
        out,
        "  λ (arrivals/hr):   {}",
        format_rate(evaluation.rates.arrival_per_hour)
    );
    let _ = writeln!(
        out,
        "  μ (service/hr):    {}",
        format_rate(evaluation.rates.service_per_hour)
    );

    match &evaluation.assessment {
        QueueAssessment::Stable(m) => {
            let _ = writeln!(out, "  ρ (utilization):   {:.4}", m.utilization);
            let _ = writeln!(out, "  Lq (vehicles):     {:.4}", m.queue_length);
            let _ = writeln!(out, "  Wq (hours):        {:.4}", m.wait_hours);
            match m.idle_probability {
                Some(p0) => {
                    let _ = writeln!(out, "  P0 (idle prob):    {:.4}", p0);
                }
                None => {
                    let _ = writeln!(out, "  P0 (idle prob):    undefined (no offered load)");
                }
            }
        }
        QueueAssessment::Unstable { utilization } => {
            let _ = writeln!(out, "  ρ (utilization):   {:.4}", utilization);
            let _ = writeln!(out, "  Lq (vehicles):     unstable (demand exceeds capacity)");
            let _ = writeln!(out, "  Wq (hours):        unstable (demand exceeds capacity)");
            let _ = writeln!(out, "  P0 (idle prob):    → 0 (overloaded)");
        }
        QueueAssessment::Undefined => {
            let _ = writeln!(out, "  ρ (utilization):   undefined (insufficient data)");
            let _ = writeln!(out, "  Lq (vehicles):     undefined (insufficient data)");
            let _ = writeln!(out, "  Wq (hours):        undefined (insufficient data)");
            let _ = writeln!(out, "  P0 (idle prob):    undefined (insufficient data)");
        }
    }

    // Trailing newline comes from the caller's writeln.
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{:.4}", value),
        None => "undefined (insufficient data)".to_string(),
    }
}

/// Renders the capacity-change lines between the two pass reports.
pub fn render_capacity_changes(changes: &[CapacityChange]) -> String {
    if changes.is_empty() {
        return "No site exceeded the wait-time threshold; capacity unchanged.\n".to_string();
    }

    let mut out = String::new();
    for change in changes {
        let added = change.chargers_after - change.chargers_before;
        let charger_word = if added == 1 { "charger" } else { "chargers" };
        let outcome = match &change.assessment_after {
            QueueAssessment::Stable(m) => {
                format!("New average wait time: {:.4} hours", m.wait_hours)
            }
            QueueAssessment::Unstable { utilization } => format!(
                "Still unstable (ρ = {:.4}) — one increment is not enough",
                utilization
            ),
            QueueAssessment::Undefined => "Rates undefined".to_string(),
        };
        let _ = writeln!(
            out,
            "Added {} {} to location: {}. {}",
            added, charger_word, change.address, outcome
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
