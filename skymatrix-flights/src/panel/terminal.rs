//! Text-mode stand-in for the LED panel.
//!
//! Lines sharing a baseline are merged into one row; pixel columns are
//! mapped onto character cells at a fixed scale.

use std::io::Write;

use skymatrix_core::layout::TextLine;

use super::{Panel, PanelError};

/// Horizontal pixels per terminal character.
const PX_PER_CHAR: i32 = 4;

pub struct TerminalPanel<W: Write> {
    out: W,
    width_px: u32,
    pending: Vec<TextLine>,
}

impl<W: Write> TerminalPanel<W> {
    pub fn new(out: W, width_px: u32) -> Self {
        TerminalPanel {
            out,
            width_px,
            pending: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rows(&self) -> Vec<String> {
        let mut lines: Vec<&TextLine> = self.pending.iter().collect();
        lines.sort_by_key(|l| (l.y, l.x));

        let mut rows: Vec<String> = Vec::new();
        let mut current_y = None;
        for line in lines {
            if current_y != Some(line.y) {
                rows.push(String::new());
                current_y = Some(line.y);
            }
            let Some(row) = rows.last_mut() else {
                continue;
            };
            let col = (line.x.max(0) / PX_PER_CHAR) as usize;
            let used = row.chars().count();
            if used < col {
                row.push_str(&" ".repeat(col - used));
            } else if used > 0 {
                row.push(' ');
            }
            row.push_str(&line.text);
        }
        rows
    }
}

impl<W: Write> Panel for TerminalPanel<W> {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw(&mut self, line: &TextLine) {
        self.pending.push(line.clone());
    }

    fn show(&mut self) -> Result<(), PanelError> {
        let rows = self.rows();
        let width = rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
            .max(self.width_px as usize / PX_PER_CHAR as usize);

        let border = format!("+{}+", "-".repeat(width));
        writeln!(self.out, "{border}")?;
        for row in &rows {
            let pad = width - row.chars().count();
            writeln!(self.out, "|{row}{}|", " ".repeat(pad))?;
        }
        writeln!(self.out, "{border}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skymatrix_core::layout::{aircraft_page, no_aircraft_page};
    use skymatrix_core::{parse_flights, resolve, Position};

    fn render(lines: &[TextLine]) -> Vec<String> {
        let mut panel = TerminalPanel::new(Vec::new(), 64);
        panel.show_page(lines).unwrap();
        let out = String::from_utf8(panel.into_inner()).unwrap();
        out.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_no_aircraft_frame() {
        let rows = render(&no_aircraft_page());
        assert_eq!(
            rows,
            vec![
                "+----------------+",
                "|No aircraft     |",
                "|found           |",
                "+----------------+",
            ]
        );
    }

    #[test]
    fn test_aircraft_frame() {
        let snapshot = parse_flights(
            r#"{"x": ["4A914F", 59.6519, 17.9186, 305, 2275, 179, "5322", 0, "", "", 1415781759, "", "", "", 0, -640, "SCW10"]}"#,
        )
        .unwrap();
        let ac = snapshot.get("x").unwrap();
        let observer = Position::new(59.3293, 18.0686).unwrap();
        let r = resolve(&observer, &ac.position().unwrap(), 240.0).unwrap();

        let rows = render(&aircraft_page(ac, Some(&r)));
        assert_eq!(rows[1], "|ModeS: 4A914F   |");
        assert_eq!(rows[2], "|Sign:  SCW10    |");
        assert_eq!(rows[3], "|N    179 kts    |");
        assert_eq!(rows[4], "|→    22.95 mi   |");
    }

    #[test]
    fn test_clear_discards_pending() {
        let mut panel = TerminalPanel::new(Vec::new(), 8);
        for line in no_aircraft_page() {
            panel.draw(&line);
        }
        panel.clear();
        panel.show().unwrap();
        let out = String::from_utf8(panel.into_inner()).unwrap();
        assert_eq!(out, "+--+\n+--+\n");
    }
}
