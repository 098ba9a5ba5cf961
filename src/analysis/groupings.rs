/// Per-site organization of the flat session list.
///
/// Sites are independent everywhere downstream — rates, queue metrics, and
/// capacity decisions never couple across sites — so the rest of the
/// pipeline works from this per-address grouping. Groups are ordered
/// chronologically because the arrival-rate estimator differences
/// consecutive start times.

use std::collections::BTreeMap;

use crate::model::ChargingSession;

/// Groups sessions by address, each group sorted by start time.
/// Sessions with an unparsed timestamp sort first and are handled by the
/// rate estimator.
pub fn group_by_address(
    sessions: Vec<ChargingSession>,
) -> BTreeMap<String, Vec<ChargingSession>> {
    let mut groups: BTreeMap<String, Vec<ChargingSession>> = BTreeMap::new();
    for session in sessions {
        groups.entry(session.address.clone()).or_default().push(session);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|s| s.started_at);
    }
    groups
}

/// Coordinates for one site: the first session in the group that carries
/// both. The export repeats the same coordinates on every row of a site,
/// so the first usable pair is the site's location.
pub fn site_coordinates(group: &[ChargingSession]) -> Option<(f64, f64)> {
    group
        .iter()
        .find_map(|s| Some((s.latitude?, s.longitude?)))
}

/// Mean coordinates across every session in the dataset — the map's
/// initial center, computed the same way the report has always centered
/// it (over rows, not over sites).
pub fn dataset_centroid(groups: &BTreeMap<String, Vec<ChargingSession>>) -> Option<(f64, f64)> {
    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut count = 0usize;
    for group in groups.values() {
        for session in group {
            if let (Some(lat), Some(lon)) = (session.latitude, session.longitude) {
                lat_sum += lat;
                lon_sum += lon;
                count += 1;
            }
        }
    }
    if count == 0 {
        None
    } else {
        Some((lat_sum / count as f64, lon_sum / count as f64))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
