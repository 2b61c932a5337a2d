//! Page layout for a 64x32 LED panel.
//!
//! Pure placement: each page is a list of text lines with a font and a
//! baseline position. Panels decide how to actually draw them.

use serde::Serialize;

use crate::bearing::Resolution;
use crate::feed::FeedAircraft;

/// Pixel height of one small-font row.
const ROW: i32 = 7;
/// First row used on a page.
const FIRST_ROW: i32 = 1;
/// Column where speed and distance start, right of the direction glyphs.
const VALUE_COLUMN: i32 = 22;

/// Text colour used on every page (RGB).
pub const TEXT_RGB: (u8, u8, u8) = (0, 255, 0);

/// BDF fonts the panel is expected to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontSize {
    /// 5x7
    Small,
    /// 6x10
    Large,
}

impl FontSize {
    pub fn bdf_file(&self) -> &'static str {
        match self {
            FontSize::Small => "5x7.bdf",
            FontSize::Large => "6x10.bdf",
        }
    }
}

/// One string placed on the panel. `y` is the text baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextLine {
    pub font: FontSize,
    pub x: i32,
    pub y: i32,
    pub text: String,
}

impl TextLine {
    fn new(font: FontSize, x: i32, y: i32, text: impl Into<String>) -> Self {
        TextLine {
            font,
            x,
            y,
            text: text.into(),
        }
    }
}

/// Shown while the feed reports nothing.
pub fn no_aircraft_page() -> Vec<TextLine> {
    vec![
        TextLine::new(FontSize::Small, 0, ROW, "No aircraft"),
        TextLine::new(FontSize::Small, 0, 2 * ROW, "found"),
    ]
}

/// One aircraft: identity, direction arrow, distance and speed.
///
/// `resolution` is `None` when the aircraft has no usable position; the
/// direction and arrow slots then show `?`.
pub fn aircraft_page(aircraft: &FeedAircraft, resolution: Option<&Resolution>) -> Vec<TextLine> {
    let index = FIRST_ROW;
    let direction_y = (index + 2) * ROW + 1;
    let arrow_y = (index + 3) * ROW + 2;

    let mut lines = vec![TextLine::new(
        FontSize::Small,
        0,
        index * ROW,
        format!("ModeS: {}", aircraft.mode_s),
    )];

    let sign = match &aircraft.callsign {
        Some(cs) => format!("Sign:  {cs}"),
        None => "Sign: unknown".to_string(),
    };
    lines.push(TextLine::new(FontSize::Small, 0, (index + 1) * ROW, sign));

    match resolution {
        Some(r) => {
            lines.push(TextLine::new(
                FontSize::Large,
                0,
                direction_y,
                r.true_direction.label(),
            ));
            lines.push(TextLine::new(
                FontSize::Large,
                0,
                arrow_y,
                r.display_direction.arrow().to_string(),
            ));
            lines.push(TextLine::new(
                FontSize::Large,
                VALUE_COLUMN,
                arrow_y,
                format_miles(r.distance_miles()),
            ));
        }
        None => {
            lines.push(TextLine::new(FontSize::Large, 0, direction_y, "?"));
            lines.push(TextLine::new(FontSize::Large, 0, arrow_y, "?"));
        }
    }

    if let Some(gs) = aircraft.ground_speed() {
        lines.push(TextLine::new(
            FontSize::Large,
            VALUE_COLUMN,
            direction_y,
            format!("{gs} kts"),
        ));
    }

    lines
}

pub fn format_miles(miles: f64) -> String {
    format!("{miles:.2} mi")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bearing::resolve;
    use crate::feed::parse_flights;
    use crate::types::Position;

    fn aircraft(record: &str) -> FeedAircraft {
        let body = format!(r#"{{"x": {record}}}"#);
        parse_flights(&body).unwrap().get("x").unwrap().clone()
    }

    fn find<'a>(lines: &'a [TextLine], x: i32, y: i32) -> Option<&'a TextLine> {
        lines.iter().find(|l| l.x == x && l.y == y)
    }

    #[test]
    fn test_no_aircraft_page() {
        let lines = no_aircraft_page();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "No aircraft");
        assert_eq!(lines[0].y, 7);
        assert_eq!(lines[1].text, "found");
        assert_eq!(lines[1].y, 14);
    }

    #[test]
    fn test_positioned_aircraft_page() {
        let ac = aircraft(
            r#"["4A914F", 59.6519, 17.9186, 305, 2275, 179, "5322", 0, "", "", 1415781759, "", "", "", 0, -640, "SCW10"]"#,
        );
        let observer = Position::new(59.3293, 18.0686).unwrap();
        let r = resolve(&observer, &ac.position().unwrap(), 240.0).unwrap();
        let lines = aircraft_page(&ac, Some(&r));

        assert_eq!(find(&lines, 0, 7).unwrap().text, "ModeS: 4A914F");
        assert_eq!(find(&lines, 0, 14).unwrap().text, "Sign:  SCW10");
        let dir = find(&lines, 0, 22).unwrap();
        assert_eq!(dir.text, "N");
        assert_eq!(dir.font, FontSize::Large);
        assert_eq!(find(&lines, 0, 30).unwrap().text, "→");
        assert_eq!(find(&lines, 22, 30).unwrap().text, "22.95 mi");
        assert_eq!(find(&lines, 22, 22).unwrap().text, "179 kts");
    }

    #[test]
    fn test_unpositioned_aircraft_page() {
        let ac = aircraft(r#"["4AC9E1", 0, 0, 0, 36000, 0]"#);
        let lines = aircraft_page(&ac, None);

        assert_eq!(find(&lines, 0, 14).unwrap().text, "Sign: unknown");
        assert_eq!(find(&lines, 0, 22).unwrap().text, "?");
        assert_eq!(find(&lines, 0, 30).unwrap().text, "?");
        // zero ground speed is not drawn
        assert!(find(&lines, 22, 22).is_none());
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_format_miles() {
        assert_eq!(format_miles(0.0), "0.00 mi");
        assert_eq!(format_miles(12.346), "12.35 mi");
    }

    #[test]
    fn test_font_files() {
        assert_eq!(FontSize::Small.bdf_file(), "5x7.bdf");
        assert_eq!(FontSize::Large.bdf_file(), "6x10.bdf");
    }
}
