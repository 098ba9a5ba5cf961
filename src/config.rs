/// Run configuration for the batch pipeline.
///
/// Everything is resolved from environment variables with compiled
/// defaults, so a bare `cargo run` over the bundled inventory works and a
/// deployment can override paths and policy through the environment or a
/// `.env` file. No value is read anywhere else — modules take what they
/// need from `RunConfig`.

use std::env;
use std::error::Error;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_SESSION_LOG: &str = "sessions.csv";
pub const DEFAULT_CHARGER_CONFIG: &str = "chargers.toml";
pub const DEFAULT_BASELINE_MAP: &str = "avg_wait_time_map.html";
pub const DEFAULT_EXPANDED_MAP: &str = "avg_wait_time_map_new.html";
pub const DEFAULT_REPORT_JSON: &str = "queue_report.json";

/// Wait-time threshold that triggers the capacity what-if: 10 minutes.
pub const DEFAULT_WAIT_THRESHOLD_HOURS: f64 = 1.0 / 6.0;

/// How many chargers the what-if adds. One step, not a search.
pub const DEFAULT_CHARGER_INCREMENT: u32 = 1;

// ---------------------------------------------------------------------------
// RunConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Session-log CSV path (`CHARGEQ_SESSION_LOG`).
    pub session_log_path: String,
    /// Charger inventory TOML path (`CHARGEQ_CHARGER_CONFIG`).
    pub charger_config_path: String,
    /// Baseline heatmap artifact path (`CHARGEQ_BASELINE_MAP`).
    pub baseline_map_path: String,
    /// Post-increment heatmap artifact path (`CHARGEQ_EXPANDED_MAP`).
    pub expanded_map_path: String,
    /// JSON report artifact path (`CHARGEQ_REPORT_JSON`).
    pub report_json_path: String,
    /// Optional log file (`CHARGEQ_LOG_FILE`); console-only when unset.
    pub log_file: Option<String>,
    /// Capacity policy: wait threshold in hours
    /// (`CHARGEQ_WAIT_THRESHOLD_HOURS`).
    pub wait_threshold_hours: f64,
    /// Capacity policy: chargers added per triggered site
    /// (`CHARGEQ_CHARGER_INCREMENT`).
    pub charger_increment: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            session_log_path: DEFAULT_SESSION_LOG.to_string(),
            charger_config_path: DEFAULT_CHARGER_CONFIG.to_string(),
            baseline_map_path: DEFAULT_BASELINE_MAP.to_string(),
            expanded_map_path: DEFAULT_EXPANDED_MAP.to_string(),
            report_json_path: DEFAULT_REPORT_JSON.to_string(),
            log_file: None,
            wait_threshold_hours: DEFAULT_WAIT_THRESHOLD_HOURS,
            charger_increment: DEFAULT_CHARGER_INCREMENT,
        }
    }
}

impl RunConfig {
    /// Resolves the configuration from the environment.
    ///
    /// A `.env` file in the working directory is honored if present; real
    /// environment variables win over it (dotenv does not overwrite).
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            session_log_path: var_or("CHARGEQ_SESSION_LOG", &defaults.session_log_path),
            charger_config_path: var_or("CHARGEQ_CHARGER_CONFIG", &defaults.charger_config_path),
            baseline_map_path: var_or("CHARGEQ_BASELINE_MAP", &defaults.baseline_map_path),
            expanded_map_path: var_or("CHARGEQ_EXPANDED_MAP", &defaults.expanded_map_path),
            report_json_path: var_or("CHARGEQ_REPORT_JSON", &defaults.report_json_path),
            log_file: env::var("CHARGEQ_LOG_FILE").ok(),
            wait_threshold_hours: parse_var(
                "CHARGEQ_WAIT_THRESHOLD_HOURS",
                defaults.wait_threshold_hours,
                parse_positive_f64,
            )?,
            charger_increment: parse_var(
                "CHARGEQ_CHARGER_INCREMENT",
                defaults.charger_increment,
                parse_positive_u32,
            )?,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(
    name: &str,
    default: T,
    parse: fn(&str) -> Result<T, String>,
) -> Result<T, Box<dyn Error>> {
    match env::var(name) {
        Ok(raw) => parse(&raw).map_err(|e| format!("{}: {}", name, e).into()),
        Err(_) => Ok(default),
    }
}

/// Parses a strictly positive float. A zero or negative threshold would
/// flag every site for a capacity bump.
pub fn parse_positive_f64(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value > 0.0 && value.is_finite() => Ok(value),
        Ok(value) => Err(format!("expected a positive number, got {}", value)),
        Err(_) => Err(format!("expected a number, got '{}'", raw)),
    }
}

/// Parses a strictly positive integer. A zero increment would make the
/// what-if pass a no-op that still reports changes.
pub fn parse_positive_u32(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        Ok(_) => Err("expected a positive integer, got 0".to_string()),
        Err(_) => Err(format!("expected a positive integer, got '{}'", raw)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_policy() {
        let config = RunConfig::default();
        assert!((config.wait_threshold_hours - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(config.charger_increment, 1);
        assert_eq!(config.baseline_map_path, "avg_wait_time_map.html");
        assert_eq!(config.expanded_map_path, "avg_wait_time_map_new.html");
    }

    #[test]
    fn test_parse_positive_f64_accepts_fractions() {
        assert_eq!(parse_positive_f64("0.25").unwrap(), 0.25);
        assert_eq!(parse_positive_f64(" 0.1666 ").unwrap(), 0.1666);
    }

    #[test]
    fn test_parse_positive_f64_rejects_bad_values() {
        assert!(parse_positive_f64("0").is_err());
        assert!(parse_positive_f64("-1.5").is_err());
        assert!(parse_positive_f64("inf").is_err());
        assert!(parse_positive_f64("ten minutes").is_err());
    }

    #[test]
    fn test_parse_positive_u32_rejects_zero_and_junk() {
        assert_eq!(parse_positive_u32("2").unwrap(), 2);
        assert!(parse_positive_u32("0").is_err());
        assert!(parse_positive_u32("-1").is_err());
        assert!(parse_positive_u32("one").is_err());
    }
}
