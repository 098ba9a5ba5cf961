/// Batch pipeline: session log in, two evaluation passes out.
///
/// Orchestrates load → group → estimate → evaluate → capacity what-if.
/// Per-site failures are isolated here: a site missing from the charger
/// inventory is recorded on the pass and every other site is evaluated
/// normally. Only file-level problems (unreadable dataset or inventory)
/// abort the run.
///
/// Rendering stays out of this module — the caller hands the returned
/// `PipelineOutcome` to the report and map renderers.

use std::collections::BTreeMap;
use std::error::Error;

use crate::analysis::capacity::{self, CapacityPolicy};
use crate::analysis::{groupings, queueing, rates};
use crate::config::RunConfig;
use crate::ingest::sessions::{self, IngestSummary};
use crate::logging::{self, PipelineStage};
use crate::model::{
    CapacityChange, ChargingSession, EvaluationPass, SiteEvaluation, SiteFailure,
};
use crate::sites::{self, SiteConfig};

/// Everything one run produces, ready for rendering.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub baseline: EvaluationPass,
    pub expanded: EvaluationPass,
    pub changes: Vec<CapacityChange>,
    /// Per-site coordinates for the map markers.
    pub site_coordinates: BTreeMap<String, (f64, f64)>,
    /// Dataset centroid — the map's initial center.
    pub map_center: Option<(f64, f64)>,
    pub ingest: IngestSummary,
}

/// Runs the full pipeline from the paths and policy in `run_config`.
pub fn run(run_config: &RunConfig) -> Result<PipelineOutcome, Box<dyn Error>> {
    let site_config = sites::load_site_config(&run_config.charger_config_path)?;
    logging::info(
        PipelineStage::Config,
        None,
        &format!(
            "Loaded charger inventory: {} sites from {}",
            site_config.len(),
            run_config.charger_config_path
        ),
    );

    let (session_list, ingest) = sessions::read_sessions(&run_config.session_log_path)?;
    let policy = CapacityPolicy {
        wait_threshold_hours: run_config.wait_threshold_hours,
        charger_increment: run_config.charger_increment,
    };

    Ok(evaluate_dataset(session_list, &site_config, &policy, ingest))
}

/// Core of the run, split from the file loading so tests can feed sessions
/// directly.
pub fn evaluate_dataset(
    session_list: Vec<ChargingSession>,
    site_config: &SiteConfig,
    policy: &CapacityPolicy,
    ingest: IngestSummary,
) -> PipelineOutcome {
    let groups = groupings::group_by_address(session_list);

    let mut site_coordinates = BTreeMap::new();
    for (address, group) in &groups {
        if let Some(coordinates) = groupings::site_coordinates(group) {
            site_coordinates.insert(address.clone(), coordinates);
        }
    }
    let map_center = groupings::dataset_centroid(&groups);

    let baseline = baseline_pass(&groups, site_config);
    logging::info(
        PipelineStage::Analysis,
        None,
        &format!(
            "Baseline pass: {} sites evaluated, {} failed",
            baseline.sites.len(),
            baseline.failures.len()
        ),
    );

    let (expanded, changes) = capacity::plan_capacity(&baseline, site_config, policy);
    logging::info(
        PipelineStage::Analysis,
        None,
        &format!("Capacity pass: {} sites re-evaluated", changes.len()),
    );

    PipelineOutcome {
        baseline,
        expanded,
        changes,
        site_coordinates,
        map_center,
        ingest,
    }
}

/// Evaluates every site once with its configured charger count.
pub fn baseline_pass(
    groups: &BTreeMap<String, Vec<ChargingSession>>,
    site_config: &SiteConfig,
) -> EvaluationPass {
    let mut pass = EvaluationPass::default();

    for (address, group) in groups {
        let site_rates = rates::estimate_rates(group);

        let chargers = match site_config.charger_count(address) {
            Ok(count) => count,
            Err(e) => {
                logging::error(PipelineStage::Analysis, Some(address), &e.to_string());
                pass.failures.push(SiteFailure {
                    address: address.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        pass.sites.insert(
            address.clone(),
            SiteEvaluation {
                address: address.clone(),
                rates: site_rates,
                chargers,
                assessment: queueing::evaluate_site(&site_rates, chargers),
            },
        );
    }

    pass
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
