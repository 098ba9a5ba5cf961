/// Session-log CSV reader.
///
/// Parses the charging network's session export (the Palo Alto format:
/// `Address`, `Start_Date`, `Start Time`, `Charging_Time_hours`,
/// `Latitude`, `Longitude`). The date and time columns are combined into a
/// single timestamp per session.
///
/// Field-level failures degrade, they do not abort: a malformed timestamp
/// or duration leaves that field `None` on the session so the rate
/// estimator can mark the site undefined, and only rows without a usable
/// address are dropped outright. Every drop is counted and logged.

use std::error::Error;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::logging::{self, PipelineStage};
use crate::model::{ChargingSession, EvalError};

/// Timestamp formats seen in session exports, tried in order. The Palo
/// Alto export writes US-style dates without zero padding; re-exports from
/// spreadsheets tend to produce the ISO forms.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// CSV row shape
// ---------------------------------------------------------------------------

/// One raw CSV row. Numeric columns stay `String` here: the export uses
/// `null` and empty cells for missing values, which must parse to `None`
/// rather than fail the row.
#[derive(Debug, Deserialize)]
struct RawSessionRow {
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "Start_Date")]
    start_date: String,
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "Charging_Time_hours")]
    charging_time_hours: String,
    #[serde(rename = "Latitude")]
    latitude: String,
    #[serde(rename = "Longitude")]
    longitude: String,
}

/// Row accounting for one ingest pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub total_rows: usize,
    pub parsed: usize,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads every session from a CSV file.
pub fn read_sessions(path: &str) -> Result<(Vec<ChargingSession>, IngestSummary), Box<dyn Error>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| format!("failed to open session log '{}': {}", path, e))?;
    read_sessions_from(reader)
}

/// Reads every session from an already-open CSV reader. Split out so tests
/// can feed in-memory data without touching the filesystem.
pub fn read_sessions_from<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<(Vec<ChargingSession>, IngestSummary), Box<dyn Error>> {
    let mut sessions = Vec::new();
    let mut summary = IngestSummary::default();

    for result in reader.deserialize::<RawSessionRow>() {
        summary.total_rows += 1;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                summary.skipped += 1;
                logging::warn(
                    PipelineStage::Ingest,
                    None,
                    &format!("row {} unreadable: {}", summary.total_rows, e),
                );
                continue;
            }
        };

        match parse_row(&raw) {
            Ok(session) => {
                summary.parsed += 1;
                sessions.push(session);
            }
            Err(e) => {
                summary.skipped += 1;
                logging::warn(
                    PipelineStage::Ingest,
                    None,
                    &format!("row {} dropped: {}", summary.total_rows, e),
                );
            }
        }
    }

    logging::log_ingest_summary(summary.total_rows, summary.parsed, summary.skipped);
    Ok((sessions, summary))
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Converts a raw row into a session.
///
/// Only a missing address is fatal for the row — without it the session
/// cannot be attributed to a site. Everything else degrades to `None`.
fn parse_row(raw: &RawSessionRow) -> Result<ChargingSession, EvalError> {
    let address = raw.address.trim();
    if address.is_empty() {
        return Err(EvalError::MalformedRecord(
            "missing address; session cannot be attributed to a site".to_string(),
        ));
    }

    Ok(ChargingSession {
        address: address.to_string(),
        started_at: parse_timestamp(&raw.start_date, &raw.start_time),
        duration_hours: parse_optional_number(&raw.charging_time_hours),
        latitude: parse_optional_number(&raw.latitude),
        longitude: parse_optional_number(&raw.longitude),
    })
}

/// Combines the date and time columns and tries each known format.
/// Returns `None` when nothing matches — the caller treats that as a
/// degraded field, not a dropped row.
fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() || time.is_empty() || date == "null" || time == "null" {
        return None;
    }

    let combined = format!("{} {}", date, time);
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&combined, format).ok())
}

/// Parses values that might be `null` or empty.
fn parse_optional_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed == "null" || trimmed.is_empty() {
        None
    } else {
        trimmed.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_from(csv_text: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes())
    }

    const HEADER: &str = "Address,Start_Date,Start Time,Charging_Time_hours,Latitude,Longitude\n";

    #[test]
    fn test_reads_well_formed_rows() {
        let csv_text = format!(
            "{}445 Bryant St,7/29/2011,9:30,0.5,37.4449,-122.1600\n\
             445 Bryant St,7/29/2011,10:30,0.5,37.4449,-122.1600\n",
            HEADER
        );
        let (sessions, summary) = read_sessions_from(reader_from(&csv_text)).unwrap();
        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.parsed, 2);
        assert_eq!(summary.skipped, 0);

        let first = &sessions[0];
        assert_eq!(first.address, "445 Bryant St");
        assert_eq!(
            first.started_at,
            NaiveDateTime::parse_from_str("2011-07-29 09:30:00", "%Y-%m-%d %H:%M:%S").ok()
        );
        assert_eq!(first.duration_hours, Some(0.5));
        assert_eq!(first.latitude, Some(37.4449));
        assert_eq!(first.longitude, Some(-122.1600));
    }

    #[test]
    fn test_iso_timestamps_also_accepted() {
        let csv_text = format!(
            "{}445 Bryant St,2011-07-29,09:30:00,0.5,37.4449,-122.1600\n",
            HEADER
        );
        let (sessions, _) = read_sessions_from(reader_from(&csv_text)).unwrap();
        assert!(sessions[0].started_at.is_some());
    }

    #[test]
    fn test_malformed_timestamp_degrades_not_drops() {
        let csv_text = format!(
            "{}445 Bryant St,soon,9:30,0.5,37.4449,-122.1600\n",
            HEADER
        );
        let (sessions, summary) = read_sessions_from(reader_from(&csv_text)).unwrap();
        assert_eq!(summary.parsed, 1, "row with bad timestamp is kept");
        assert_eq!(sessions[0].started_at, None);
        assert_eq!(sessions[0].duration_hours, Some(0.5));
    }

    #[test]
    fn test_null_and_empty_fields_become_none() {
        let csv_text = format!("{}445 Bryant St,null,null,null,,null\n", HEADER);
        let (sessions, _) = read_sessions_from(reader_from(&csv_text)).unwrap();
        let session = &sessions[0];
        assert_eq!(session.started_at, None);
        assert_eq!(session.duration_hours, None);
        assert_eq!(session.latitude, None);
        assert_eq!(session.longitude, None);
    }

    #[test]
    fn test_missing_address_drops_the_row() {
        let csv_text = format!(
            "{},7/29/2011,9:30,0.5,37.4449,-122.1600\n\
             445 Bryant St,7/29/2011,10:30,0.5,37.4449,-122.1600\n",
            HEADER
        );
        let (sessions, summary) = read_sessions_from(reader_from(&csv_text)).unwrap();
        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.parsed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_short_row_counts_as_skipped() {
        let csv_text = format!("{}445 Bryant St,7/29/2011\n", HEADER);
        let (sessions, summary) = read_sessions_from(reader_from(&csv_text)).unwrap();
        assert!(sessions.is_empty());
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_unpadded_us_dates_parse() {
        // The export writes 7/4/2011 4:05, not 07/04/2011 04:05.
        let parsed = parse_timestamp("7/4/2011", "4:05");
        assert_eq!(
            parsed,
            NaiveDateTime::parse_from_str("2011-07-04 04:05:00", "%Y-%m-%d %H:%M:%S").ok()
        );
    }
}
