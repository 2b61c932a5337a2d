//! Compass sectors: 8-way cardinal directions and their arrow glyphs.
//!
//! North is split into two sub-ranges straddling 0°/360°: `[0, 22.5)` and
//! `[337.5, 360]`. Only the last sector has a closed upper bound, so exactly
//! 360° is still north.

use serde::Serialize;

/// One of the eight compass points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Sector table: (low inclusive, high exclusive, direction).
const SECTORS: &[(f64, f64, CardinalDirection)] = &[
    (0.0, 22.5, CardinalDirection::N),
    (22.5, 67.5, CardinalDirection::NE),
    (67.5, 112.5, CardinalDirection::E),
    (112.5, 157.5, CardinalDirection::SE),
    (157.5, 202.5, CardinalDirection::S),
    (202.5, 247.5, CardinalDirection::SW),
    (247.5, 292.5, CardinalDirection::W),
    (292.5, 337.5, CardinalDirection::NW),
];

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 8] = [
        CardinalDirection::N,
        CardinalDirection::NE,
        CardinalDirection::E,
        CardinalDirection::SE,
        CardinalDirection::S,
        CardinalDirection::SW,
        CardinalDirection::W,
        CardinalDirection::NW,
    ];

    /// Map a heading in degrees to its sector. `None` outside `[0, 360]`.
    pub fn from_heading(degrees: f64) -> Option<Self> {
        if let Some(&(_, _, dir)) = SECTORS
            .iter()
            .find(|(low, high, _)| *low <= degrees && degrees < *high)
        {
            return Some(dir);
        }
        if (337.5..=360.0).contains(&degrees) {
            return Some(CardinalDirection::N);
        }
        None
    }

    /// Short label, e.g. `"NE"`.
    pub fn label(&self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }

    /// Unicode arrow pointing this way.
    pub fn arrow(&self) -> char {
        match self {
            CardinalDirection::N => '↑',
            CardinalDirection::NE => '↗',
            CardinalDirection::E => '→',
            CardinalDirection::SE => '↘',
            CardinalDirection::S => '↓',
            CardinalDirection::SW => '↙',
            CardinalDirection::W => '←',
            CardinalDirection::NW => '↖',
        }
    }
}

impl std::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Sector for a heading. Free-function form of [`CardinalDirection::from_heading`].
pub fn cardinal_of(degrees: f64) -> Option<CardinalDirection> {
    CardinalDirection::from_heading(degrees)
}

/// Reduce any finite angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if d >= 360.0 {
        d - 360.0
    } else {
        d
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use CardinalDirection::*;

    #[test]
    fn test_sector_boundaries() {
        let cases = [
            (0.0, N),
            (22.4999, N),
            (22.5, NE),
            (67.4999, NE),
            (67.5, E),
            (112.4999, E),
            (112.5, SE),
            (157.4999, SE),
            (157.5, S),
            (202.4999, S),
            (202.5, SW),
            (247.4999, SW),
            (247.5, W),
            (292.4999, W),
            (292.5, NW),
            (337.4999, NW),
            (337.5, N),
            (359.9999, N),
            (360.0, N),
        ];
        for (deg, expected) in cases {
            assert_eq!(cardinal_of(deg), Some(expected), "heading {deg}");
        }
    }

    #[test]
    fn test_zero_and_360_are_north() {
        assert_eq!(cardinal_of(0.0), Some(N));
        assert_eq!(cardinal_of(360.0), Some(N));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(cardinal_of(-0.001), None);
        assert_eq!(cardinal_of(360.001), None);
        assert_eq!(cardinal_of(f64::NAN), None);
    }

    #[test]
    fn test_every_heading_has_a_sector() {
        let mut deg = 0.0;
        while deg < 360.0 {
            assert!(cardinal_of(deg).is_some(), "no sector for {deg}");
            deg += 0.25;
        }
    }

    #[test]
    fn test_arrows_and_labels() {
        assert_eq!(N.arrow(), '↑');
        assert_eq!(SE.arrow(), '↘');
        assert_eq!(NW.arrow(), '↖');
        assert_eq!(SW.label(), "SW");
        assert_eq!(E.to_string(), "E");
        let arrows: std::collections::HashSet<char> =
            CardinalDirection::ALL.iter().map(|d| d.arrow()).collect();
        assert_eq!(arrows.len(), 8);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(466.5), 106.5);
        assert_eq!(normalize_degrees(-720.0), 0.0);
        let tiny = normalize_degrees(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }
}
