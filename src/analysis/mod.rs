/// Queueing analysis for the charging network.
///
/// Everything here is pure computation over in-memory data: the modules
/// take session slices and rates in, and return values out. I/O stays in
/// `ingest`, `pipeline`, and `report`.
///
/// Submodules:
/// - `groupings` — organizes flat ingest output into per-site structures.
/// - `rates` — empirical arrival/service rate estimation (λ, μ).
/// - `queueing` — the Erlang-C (M/M/c) steady-state model.
/// - `capacity` — the one-step add-a-charger what-if.

pub mod capacity;
pub mod groupings;
pub mod queueing;
pub mod rates;
