//! Display surfaces for rendered pages.
//!
//! `TerminalPanel` prints frames to stdout and is always available;
//! `MatrixPanel` drives a real HUB75 panel through `rpi-led-matrix` and is
//! behind the `rgb-matrix` feature.

use thiserror::Error;

use skymatrix_core::config::PanelConfig;
use skymatrix_core::layout::TextLine;

#[cfg(feature = "rgb-matrix")]
pub mod matrix;
pub mod terminal;

#[cfg(feature = "rgb-matrix")]
pub use matrix::MatrixPanel;
pub use terminal::TerminalPanel;

#[derive(Debug, Error)]
#[cfg_attr(not(feature = "rgb-matrix"), allow(dead_code))]
pub enum PanelError {
    #[error("LED matrix: {0}")]
    Hardware(String),
    #[error("font {path}: {reason}")]
    Font { path: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something text lines can be drawn on.
pub trait Panel {
    fn clear(&mut self);
    fn draw(&mut self, line: &TextLine);
    /// Make everything drawn since the last `clear` visible.
    fn show(&mut self) -> Result<(), PanelError>;

    fn show_page(&mut self, lines: &[TextLine]) -> Result<(), PanelError> {
        self.clear();
        for line in lines {
            self.draw(line);
        }
        self.show()
    }
}

/// Open the panel this build supports.
#[cfg(feature = "rgb-matrix")]
pub fn open(config: &PanelConfig) -> Result<Box<dyn Panel>, PanelError> {
    Ok(Box::new(MatrixPanel::open(config)?))
}

/// Open the panel this build supports.
#[cfg(not(feature = "rgb-matrix"))]
pub fn open(config: &PanelConfig) -> Result<Box<dyn Panel>, PanelError> {
    Ok(Box::new(TerminalPanel::new(
        std::io::stdout(),
        config.cols * config.chain_length,
    )))
}
