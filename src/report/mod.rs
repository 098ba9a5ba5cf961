/// Report rendering for the charging queue service.
///
/// The analysis modules produce values; everything human-facing lives
/// here. Submodules:
/// - `text` — per-site console report for each evaluation pass.
/// - `map` — the Leaflet heatmap artifact, one per pass.

pub mod map;
pub mod text;
