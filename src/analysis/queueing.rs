/// Erlang-C (M/M/c) steady-state queue model.
///
/// One canonical evaluation function, called identically by the baseline
/// pass and the capacity what-if — the two passes differ only in the
/// charger count they pass in.
///
/// Every mathematically awkward input has a planned result instead of a
/// panic or an error:
/// - no offered load (λ, μ, or c is zero) → the zero tuple,
/// - utilization at or above 1 → `Unstable` (the steady-state formulas do
///   not describe an overloaded queue, so Lq/Wq are reported as unbounded,
///   never as the finite garbage the stable formulas would produce),
/// - undefined rates → `Undefined` via [`evaluate_site`].
///
/// The Erlang-C normalization sum Σ aⁿ/n! is accumulated incrementally
/// (`term_n = term_{n-1} · a / n`). Computing aⁿ and n! separately
/// overflows f64 around n = 171 even when their ratio is tame; the running
/// ratio stays in range for any realistic charger count.

use crate::model::{QueueAssessment, QueueMetrics, SiteRates};

/// Evaluates the M/M/c queue at one site.
///
/// `arrival_per_hour` is λ, `service_per_hour` is μ (one charger's
/// completion rate), `chargers` is c.
pub fn evaluate(arrival_per_hour: f64, service_per_hour: f64, chargers: u32) -> QueueAssessment {
    if arrival_per_hour <= 0.0 || service_per_hour <= 0.0 || chargers == 0 {
        // No offered load: an empty-queue tuple, with no meaningful idle
        // probability to report.
        return QueueAssessment::Stable(QueueMetrics {
            utilization: 0.0,
            queue_length: 0.0,
            wait_hours: 0.0,
            idle_probability: None,
        });
    }

    let offered_load = arrival_per_hour / service_per_hour;
    let utilization = offered_load / chargers as f64;

    // Strictly < 1 gates the stable formulas; exactly 1 is unstable.
    if utilization >= 1.0 {
        return QueueAssessment::Unstable { utilization };
    }

    // S = Σ_{n=0}^{c-1} aⁿ/n!, accumulated term by term.
    let mut term = 1.0_f64; // a⁰/0!
    let mut normalization = 1.0_f64;
    for n in 1..chargers {
        term *= offered_load / n as f64;
        normalization += term;
    }
    // a^c/c!, one more step of the same recurrence.
    let erlang_term = term * offered_load / chargers as f64;

    let idle_probability = 1.0 / (normalization + erlang_term / (1.0 - utilization));
    let queue_length =
        idle_probability * erlang_term * utilization / ((1.0 - utilization) * (1.0 - utilization));
    let wait_hours = queue_length / arrival_per_hour;

    QueueAssessment::Stable(QueueMetrics {
        utilization,
        queue_length,
        wait_hours,
        idle_probability: Some(idle_probability),
    })
}

/// Evaluates one site from its estimated rates. Undefined λ or μ yields
/// `Undefined` — the model is never run on rates the data could not
/// support.
pub fn evaluate_site(rates: &SiteRates, chargers: u32) -> QueueAssessment {
    match (rates.arrival_per_hour, rates.service_per_hour) {
        (Some(arrival), Some(service)) => evaluate(arrival, service, chargers),
        _ => QueueAssessment::Undefined,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
