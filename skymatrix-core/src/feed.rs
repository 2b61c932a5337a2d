//! FR24 feeder `flights.json` records.
//!
//! The feeder serves one JSON object keyed by an internal id, each value a
//! positional array:
//!
//! ```text
//! "x4a914f": ["4A914F", 59.2893, 18.1239, 305, 2275, 179, "5322", 0, "", "",
//!             1415781759, "", "", "", 0, -640, "SCW10"]
//!              modeS    lat      lon      trk  alt   gs   squawk      ts
//!                                                    on_ground vrate callsign
//! ```
//!
//! Parsing is tolerant: missing or mistyped elements become `None`.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::snapshot::Snapshot;
use crate::types::{Position, Result, SkyError};

const IDX_MODE_S: usize = 0;
const IDX_LAT: usize = 1;
const IDX_LON: usize = 2;
const IDX_TRACK: usize = 3;
const IDX_ALTITUDE: usize = 4;
const IDX_GROUND_SPEED: usize = 5;
const IDX_SQUAWK: usize = 6;
const IDX_TIMESTAMP: usize = 10;
const IDX_VERTICAL_RATE: usize = 15;

/// Records shorter than this carry no callsign in their last slot.
const FULL_RECORD_LEN: usize = 17;

/// One aircraft as reported by the feeder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedAircraft {
    pub mode_s: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub track_deg: Option<f64>,
    pub altitude_ft: Option<i32>,
    pub ground_speed_kts: Option<f64>,
    pub squawk: Option<String>,
    pub timestamp: Option<i64>,
    pub vertical_rate_fpm: Option<i32>,
    pub callsign: Option<String>,
}

impl FeedAircraft {
    /// Parse one positional record.
    pub fn from_record(record: &Value) -> Result<Self> {
        let fields = record
            .as_array()
            .ok_or_else(|| SkyError::Feed(format!("record is not an array: {record}")))?;

        let mode_s = string_at(fields, IDX_MODE_S)
            .ok_or_else(|| SkyError::Feed("record has no Mode S code".into()))?;

        let callsign = if fields.len() >= FULL_RECORD_LEN {
            fields.last().and_then(as_string)
        } else {
            None
        };

        Ok(FeedAircraft {
            mode_s,
            lat: float_at(fields, IDX_LAT),
            lon: float_at(fields, IDX_LON),
            track_deg: float_at(fields, IDX_TRACK),
            altitude_ft: int_at(fields, IDX_ALTITUDE).and_then(|v| i32::try_from(v).ok()),
            ground_speed_kts: float_at(fields, IDX_GROUND_SPEED).filter(|v| *v >= 0.0),
            squawk: string_at(fields, IDX_SQUAWK),
            timestamp: int_at(fields, IDX_TIMESTAMP),
            vertical_rate_fpm: int_at(fields, IDX_VERTICAL_RATE)
                .and_then(|v| i32::try_from(v).ok()),
            callsign,
        })
    }

    /// Known position, if any.
    ///
    /// The feeder reports `0` for an unknown coordinate, so a zero latitude or
    /// longitude counts as missing.
    pub fn position(&self) -> Option<Position> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Position::new(lat, lon).ok(),
            _ => None,
        }
    }

    /// Ground speed worth showing (zero means not reported).
    pub fn ground_speed(&self) -> Option<f64> {
        self.ground_speed_kts.filter(|v| *v > 0.0)
    }

    /// Callsign if reported, otherwise the Mode S code.
    pub fn label(&self) -> &str {
        self.callsign.as_deref().unwrap_or(&self.mode_s)
    }
}

/// Parse a full `flights.json` body.
///
/// Records that cannot be read are skipped with a warning; a body that is
/// not a JSON object is an error.
pub fn parse_flights(body: &str) -> Result<Snapshot> {
    let value: Value = serde_json::from_str(body)?;
    let object = value
        .as_object()
        .ok_or_else(|| SkyError::Feed("flights.json is not an object".into()))?;

    let snapshot = object
        .iter()
        .filter_map(|(key, record)| match FeedAircraft::from_record(record) {
            Ok(aircraft) => Some((key.clone(), aircraft)),
            Err(e) => {
                warn!(key = %key, error = %e, "skipping feed record");
                None
            }
        })
        .collect();
    Ok(snapshot)
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        _ => None,
    }
}

fn string_at(fields: &[Value], idx: usize) -> Option<String> {
    fields.get(idx).and_then(as_string)
}

fn float_at(fields: &[Value], idx: usize) -> Option<f64> {
    fields.get(idx).and_then(Value::as_f64)
}

fn int_at(fields: &[Value], idx: usize) -> Option<i64> {
    let v = fields.get(idx)?;
    v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
