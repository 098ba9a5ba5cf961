/// Charger inventory for the charging network.
///
/// The inventory is the single source of truth for how many chargers each
/// site has. It is operator-maintained (a TOML file edited by hand, not
/// inferred from data) — a site that shows up in the session log without an
/// inventory entry is a configuration error, surfaced per site instead of
/// silently defaulting.

use std::collections::BTreeMap;
use std::error::Error;

use serde::Deserialize;

use crate::model::EvalError;

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Parsed `chargers.toml`: address → installed charger count.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteConfig {
    pub chargers: BTreeMap<String, u32>,
}

impl SiteConfig {
    /// Looks up the charger count for a site.
    ///
    /// Absent entries are an error, not a default — the queue model is
    /// meaningless without the real server count.
    pub fn charger_count(&self, address: &str) -> Result<u32, EvalError> {
        self.chargers
            .get(address)
            .copied()
            .ok_or_else(|| EvalError::SiteNotConfigured(address.to_string()))
    }

    pub fn contains(&self, address: &str) -> bool {
        self.chargers.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.chargers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chargers.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses inventory TOML and validates every count is positive.
///
/// A zero-charger site would make every utilization division degenerate,
/// so it is rejected at load time where the operator can fix the file.
pub fn parse_site_config(text: &str) -> Result<SiteConfig, Box<dyn Error>> {
    let config: SiteConfig = toml::from_str(text)?;
    for (address, count) in &config.chargers {
        if *count == 0 {
            return Err(format!(
                "charger count for '{}' must be positive, got 0",
                address
            )
            .into());
        }
    }
    Ok(config)
}

/// Loads the charger inventory from a TOML file.
pub fn load_site_config(path: &str) -> Result<SiteConfig, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read charger inventory '{}': {}", path, e))?;
    parse_site_config(&text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [chargers]
        "445 Bryant St" = 6
        "250 Hamilton Ave" = 2
    "#;

    #[test]
    fn test_parse_valid_inventory() {
        let config = parse_site_config(SAMPLE).expect("sample inventory should parse");
        assert_eq!(config.len(), 2);
        assert_eq!(config.charger_count("445 Bryant St").unwrap(), 6);
        assert_eq!(config.charger_count("250 Hamilton Ave").unwrap(), 2);
    }

    #[test]
    fn test_unknown_site_is_a_config_error() {
        let config = parse_site_config(SAMPLE).unwrap();
        let err = config
            .charger_count("650 Forest Ave")
            .expect_err("unlisted site must not get a default charger count");
        assert_eq!(err, EvalError::SiteNotConfigured("650 Forest Ave".to_string()));
    }

    #[test]
    fn test_zero_charger_count_rejected_at_load() {
        let text = r#"
            [chargers]
            "445 Bryant St" = 0
        "#;
        let err = parse_site_config(text).expect_err("zero chargers should fail validation");
        assert!(
            err.to_string().contains("445 Bryant St"),
            "error should name the offending site, got: {}",
            err
        );
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(parse_site_config("chargers = not-a-table").is_err());
    }

    #[test]
    fn test_bundled_inventory_matches_deployment() {
        // The repo ships chargers.toml with the eight Palo Alto sites.
        // If an address is renamed here without updating the file (or vice
        // versa), every session at that site fails with a config error.
        let config = parse_site_config(include_str!("../chargers.toml"))
            .expect("bundled chargers.toml should parse");
        let expected = [
            ("1213 Newell Rd", 3),
            ("250 Hamilton Ave", 2),
            ("275 Cambridge Ave", 4),
            ("3700 Middlefield Rd", 3),
            ("445 Bryant St", 6),
            ("475 Cambridge Ave", 5),
            ("520 Webster St", 3),
            ("528 High St", 4),
        ];
        assert_eq!(config.len(), expected.len());
        for (address, count) in expected {
            assert_eq!(
                config.charger_count(address).unwrap(),
                count,
                "charger count mismatch for '{}'",
                address
            );
        }
    }
}
