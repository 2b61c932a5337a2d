//! Bearing resolution: WGS84 geodesic azimuth/distance to cardinal arrows.
//!
//! The observer sees a target at some true azimuth. The LED panel itself is
//! mounted rotated by a fixed orientation offset, so the arrow drawn on it
//! must be re-derived from a display-relative heading:
//!
//! ```text
//! azi1 (-180..180) -> azimuth [0, 360) -> true direction
//!                          |
//!                          +-> (360 - orientation + azimuth) mod 360 -> display direction
//! ```

use geographiclib_rs::{Geodesic, InverseGeodesic};
use serde::Serialize;
use tracing::debug;

use crate::compass::{normalize_degrees, CardinalDirection};
use crate::types::{meters_to_miles, Position, Result, SkyError};

/// Orientation of the reference installation: panel rotated 240° from north.
pub const DEFAULT_ORIENTATION_DEG: f64 = 240.0;

// ---------------------------------------------------------------------------
// Resolution (output)
// ---------------------------------------------------------------------------

/// Where a target lies relative to the observer, in true and panel terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolution {
    /// Initial great-circle azimuth, `[0, 360)`.
    pub azimuth_deg: f64,
    pub distance_m: f64,
    pub true_direction: CardinalDirection,
    /// Azimuth rotated into the panel's frame, `[0, 360)`.
    pub display_heading_deg: f64,
    pub display_direction: CardinalDirection,
}

impl Resolution {
    /// Build a resolution from a raw geodesic azimuth (`-180..=180`) and distance.
    pub fn from_azimuth(azi1: f64, distance_m: f64, orientation_deg: f64) -> Result<Self> {
        if !orientation_deg.is_finite() {
            return Err(SkyError::InvalidOrientation(orientation_deg));
        }
        if !azi1.is_finite() {
            return Err(SkyError::HeadingOutOfRange(azi1));
        }

        let azimuth_deg = normalize_degrees(azi1);
        if azimuth_deg != azi1 {
            debug!(heading = azi1, corrected = azimuth_deg, "corrected negative heading");
        }
        let true_direction = CardinalDirection::from_heading(azimuth_deg)
            .ok_or(SkyError::HeadingOutOfRange(azimuth_deg))?;

        let display_heading_deg = display_heading(azimuth_deg, orientation_deg);
        let display_direction = CardinalDirection::from_heading(display_heading_deg)
            .ok_or(SkyError::HeadingOutOfRange(display_heading_deg))?;

        debug!(
            azimuth = azimuth_deg,
            cardinal = %true_direction,
            adjusted = display_heading_deg,
            arrow = %display_direction,
            "resolved heading"
        );

        Ok(Resolution {
            azimuth_deg,
            distance_m,
            true_direction,
            display_heading_deg,
            display_direction,
        })
    }

    pub fn distance_miles(&self) -> f64 {
        meters_to_miles(self.distance_m)
    }
}

/// Rotate a true azimuth into the panel's frame of reference.
pub fn display_heading(azimuth_deg: f64, orientation_deg: f64) -> f64 {
    normalize_degrees(360.0 - orientation_deg + azimuth_deg)
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Separation below which two positions are the same point.
const COINCIDENT_M: f64 = 1e-6;

/// Resolves targets against the WGS84 ellipsoid for one panel orientation.
///
/// Immutable after construction; share it freely across threads.
pub struct Resolver {
    geodesic: Geodesic,
    orientation_deg: f64,
}

impl Resolver {
    pub fn new(orientation_deg: f64) -> Result<Self> {
        if !orientation_deg.is_finite() {
            return Err(SkyError::InvalidOrientation(orientation_deg));
        }
        Ok(Resolver {
            geodesic: Geodesic::wgs84(),
            orientation_deg,
        })
    }

    pub fn orientation_deg(&self) -> f64 {
        self.orientation_deg
    }

    /// Geodesic inverse problem. Returns `(azi1, distance_m)`.
    ///
    /// Coincident points resolve to `(0.0, 0.0)`; the azimuth there is
    /// undefined and the library's own choice depends on the hemisphere.
    /// This covers one point spelled two ways too: a pole at any longitude,
    /// or longitude 180 against -180.
    pub fn inverse(&self, observer: &Position, target: &Position) -> (f64, f64) {
        if observer == target {
            return (0.0, 0.0);
        }
        let (s12, azi1, _azi2, _a12): (f64, f64, f64, f64) = self.geodesic.inverse(
            observer.lat(),
            observer.lon(),
            target.lat(),
            target.lon(),
        );
        if s12.abs() < COINCIDENT_M {
            return (0.0, 0.0);
        }
        (azi1, s12)
    }

    pub fn resolve(&self, observer: &Position, target: &Position) -> Result<Resolution> {
        let (azi1, distance_m) = self.inverse(observer, target);
        Resolution::from_azimuth(azi1, distance_m, self.orientation_deg)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("ellipsoid", &"WGS84")
            .field("orientation_deg", &self.orientation_deg)
            .finish()
    }
}

/// One-shot resolution without keeping a [`Resolver`] around.
pub fn resolve(observer: &Position, target: &Position, orientation_deg: f64) -> Result<Resolution> {
    Resolver::new(orientation_deg)?.resolve(observer, target)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
