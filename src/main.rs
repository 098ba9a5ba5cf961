//! Batch entry point: run both evaluation passes and emit every artifact.

use std::error::Error;

use chrono::Utc;

use chargeq_service::config::RunConfig;
use chargeq_service::logging::{self, LogLevel, PipelineStage};
use chargeq_service::pipeline::{self, PipelineOutcome};
use chargeq_service::report::{map, text};

fn main() {
    if let Err(e) = run() {
        eprintln!("chargeq_service: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let run_config = RunConfig::from_env()?;
    logging::init_logger(LogLevel::Info, run_config.log_file.as_deref(), false);

    let outcome = pipeline::run(&run_config)?;

    // Textual reports for both passes, capacity changes in between —
    // same shape as the original console output.
    println!("{}", text::render_pass_report("BASELINE QUEUE ASSESSMENT", &outcome.baseline));
    println!("{}", text::render_capacity_changes(&outcome.changes));
    println!(
        "{}",
        text::render_pass_report("QUEUE ASSESSMENT AFTER ADDED CAPACITY", &outcome.expanded)
    );

    write_maps(&run_config, &outcome)?;
    write_json_report(&run_config, &outcome)?;

    Ok(())
}

/// Writes one heatmap per pass. The color scale comes from the baseline
/// pass and is reused for the second map so the two are comparable.
fn write_maps(run_config: &RunConfig, outcome: &PipelineOutcome) -> Result<(), Box<dyn Error>> {
    let Some(center) = outcome.map_center else {
        logging::warn(
            PipelineStage::Report,
            None,
            "dataset has no coordinates; skipping map artifacts",
        );
        return Ok(());
    };

    let scale = map::wait_scale(&outcome.baseline);

    let baseline_markers = map::build_markers(&outcome.baseline, &outcome.site_coordinates, scale);
    map::save_wait_map(
        &run_config.baseline_map_path,
        "Average wait time per site",
        center,
        &baseline_markers,
    )?;

    let expanded_markers = map::build_markers(&outcome.expanded, &outcome.site_coordinates, scale);
    map::save_wait_map(
        &run_config.expanded_map_path,
        "Average wait time per site (after added capacity)",
        center,
        &expanded_markers,
    )?;

    Ok(())
}

/// Writes the machine-readable report artifact covering both passes.
fn write_json_report(
    run_config: &RunConfig,
    outcome: &PipelineOutcome,
) -> Result<(), Box<dyn Error>> {
    let report = serde_json::json!({
        "generated_at": Utc::now().to_rfc3339(),
        "baseline": outcome.baseline,
        "expanded": outcome.expanded,
        "capacity_changes": outcome.changes,
        "ingest": {
            "total_rows": outcome.ingest.total_rows,
            "parsed": outcome.ingest.parsed,
            "skipped": outcome.ingest.skipped,
        },
    });

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&run_config.report_json_path, json)
        .map_err(|e| format!("failed to write report '{}': {}", run_config.report_json_path, e))?;
    logging::info(
        PipelineStage::Report,
        None,
        &format!("📄 Full report saved to: {}", run_config.report_json_path),
    );
    Ok(())
}
