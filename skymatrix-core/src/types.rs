//! Shared types, error enum, and unit constants for skymatrix-core.

use serde::Serialize;
use thiserror::Error;

/// All errors produced by skymatrix-core.
#[derive(Debug, Error)]
pub enum SkyError {
    #[error("invalid position: lat={lat}, lon={lon}")]
    InvalidPosition { lat: f64, lon: f64 },
    #[error("invalid display orientation: {0}")]
    InvalidOrientation(f64),
    #[error("heading out of range: {0}")]
    HeadingOutOfRange(f64),
    #[error("unexpected feed format: {0}")]
    Feed(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SkyError>;

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Statute miles per meter.
pub const METERS_TO_MILES: f64 = 0.000621371;

/// Convert meters to statute miles.
pub fn meters_to_miles(meters: f64) -> f64 {
    meters * METERS_TO_MILES
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// WGS84 latitude/longitude in degrees.
///
/// Fields are private so every `Position` in circulation has passed
/// validation: finite, latitude in [-90, 90], longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    lat: f64,
    lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(SkyError::InvalidPosition { lat, lon });
        }
        Ok(Position { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_valid() {
        let p = Position::new(59.3293, 18.0686).unwrap();
        assert_eq!(p.lat(), 59.3293);
        assert_eq!(p.lon(), 18.0686);
    }

    #[test]
    fn test_position_bounds_inclusive() {
        assert!(Position::new(90.0, 180.0).is_ok());
        assert!(Position::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!(Position::new(90.5, 0.0).is_err());
        assert!(Position::new(0.0, -180.1).is_err());
    }

    #[test]
    fn test_position_rejects_non_finite() {
        assert!(Position::new(f64::NAN, 0.0).is_err());
        assert!(Position::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_meters_to_miles() {
        assert!((meters_to_miles(1609.344) - 1.0).abs() < 1e-4);
        assert_eq!(meters_to_miles(0.0), 0.0);
    }

    #[test]
    fn test_position_display() {
        let p = Position::new(35.4362, -82.5418).unwrap();
        assert_eq!(p.to_string(), "(35.4362, -82.5418)");
    }
}
