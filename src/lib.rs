//! Queue-time estimation for an EV charging network.
//!
//! Batch pipeline over a static session-log export: estimates per-site
//! arrival and service rates, runs the Erlang-C (M/M/c) queue model
//! against each site's configured charger count, applies a one-step
//! add-a-charger what-if to sites whose expected wait exceeds the policy
//! threshold, and renders a console report plus Leaflet heatmap artifacts
//! for both passes.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod sites;
