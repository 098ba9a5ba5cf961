/// One-step capacity what-if.
///
/// For every site whose expected wait exceeds the policy threshold, the
/// planner re-runs the queue model with the charger count incremented,
/// using the same λ and μ already estimated for that site. It is a single
/// fixed increment, deliberately — this answers "what does one more
/// charger buy us?", it does not search for a sufficient count.

use crate::analysis::queueing;
use crate::logging::{self, PipelineStage};
use crate::model::{CapacityChange, EvaluationPass, SiteFailure};
use crate::sites::SiteConfig;

/// Policy knobs for the what-if. Defaults match the deployed behavior:
/// re-evaluate sites whose average wait exceeds 10 minutes, adding one
/// charger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityPolicy {
    pub wait_threshold_hours: f64,
    pub charger_increment: u32,
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self {
            wait_threshold_hours: 1.0 / 6.0,
            charger_increment: 1,
        }
    }
}

/// Re-evaluates every over-threshold site with added capacity.
///
/// Returns the updated pass — untouched sites keep their baseline entries
/// — plus the list of changes made. A triggered site that is missing from
/// the charger inventory becomes a failure on the new pass; its baseline
/// entry is removed rather than re-evaluated with a guessed count.
pub fn plan_capacity(
    baseline: &EvaluationPass,
    config: &SiteConfig,
    policy: &CapacityPolicy,
) -> (EvaluationPass, Vec<CapacityChange>) {
    let mut updated = baseline.clone();
    let mut changes = Vec::new();

    for (address, evaluation) in &baseline.sites {
        if !evaluation.assessment.exceeds_wait(policy.wait_threshold_hours) {
            continue;
        }

        let chargers_before = match config.charger_count(address) {
            Ok(count) => count,
            Err(e) => {
                logging::error(PipelineStage::Analysis, Some(address), &e.to_string());
                updated.sites.remove(address);
                updated.failures.push(SiteFailure {
                    address: address.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let chargers_after = chargers_before + policy.charger_increment;
        let assessment_after = queueing::evaluate_site(&evaluation.rates, chargers_after);

        if let Some(entry) = updated.sites.get_mut(address) {
            entry.chargers = chargers_after;
            entry.assessment = assessment_after;
        }
        changes.push(CapacityChange {
            address: address.clone(),
            chargers_before,
            chargers_after,
            assessment_after,
        });
    }

    (updated, changes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
