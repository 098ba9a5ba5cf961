/// Empirical rate estimation per site.
///
/// λ (arrivals/hour) comes from the mean gap between consecutive session
/// starts; μ (sessions/hour per charger) from the mean charging duration.
/// Both are pure functions of one site's session slice.
///
/// "Undefined" is a first-class outcome, not an error: a site with one
/// session has no inter-arrival gap, and a site with a corrupt duration
/// field has no trustworthy service rate. Those sites flow through the
/// rest of the pipeline as undefined rather than being skipped or zeroed.

use crate::model::{ChargingSession, SiteRates};

/// Estimates both rates for one site's sessions.
pub fn estimate_rates(sessions: &[ChargingSession]) -> SiteRates {
    SiteRates {
        arrival_per_hour: estimate_arrival_rate(sessions),
        service_per_hour: estimate_service_rate(sessions),
    }
}

/// λ = 1 / mean inter-arrival gap, in hours.
///
/// Undefined when:
/// - fewer than two sessions (no gap to measure),
/// - any session's timestamp failed to parse — a missing start time means
///   the gaps around it are wrong, so the whole site's λ is suspect,
/// - the mean gap is not positive (every session at the same instant).
pub fn estimate_arrival_rate(sessions: &[ChargingSession]) -> Option<f64> {
    if sessions.len() < 2 {
        return None;
    }

    let mut starts = Vec::with_capacity(sessions.len());
    for session in sessions {
        starts.push(session.started_at?);
    }
    starts.sort();

    let gap_hours_total: f64 = starts
        .windows(2)
        .map(|pair| pair[1].signed_duration_since(pair[0]).num_seconds() as f64 / 3600.0)
        .sum();
    let mean_gap_hours = gap_hours_total / (starts.len() - 1) as f64;

    if mean_gap_hours > 0.0 {
        Some(1.0 / mean_gap_hours)
    } else {
        None
    }
}

/// μ = 1 / mean charging duration, in hours.
///
/// Undefined when the site has no sessions or any session's duration is
/// missing or not positive — a zero-hour "session" is a data artifact, and
/// averaging it in would inflate μ for the whole site.
pub fn estimate_service_rate(sessions: &[ChargingSession]) -> Option<f64> {
    if sessions.is_empty() {
        return None;
    }

    let mut duration_total = 0.0;
    for session in sessions {
        let duration = session.duration_hours?;
        if duration <= 0.0 {
            return None;
        }
        duration_total += duration;
    }

    Some(sessions.len() as f64 / duration_total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
