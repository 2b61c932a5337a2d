//! HUB75 RGB LED matrix via `rpi-led-matrix`.

use std::path::{Path, PathBuf};

use rpi_led_matrix::{LedCanvas, LedColor, LedFont, LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use tracing::info;

use skymatrix_core::config::PanelConfig;
use skymatrix_core::layout::{FontSize, TextLine, TEXT_RGB};

use super::{Panel, PanelError};

pub struct MatrixPanel {
    // Kept alive for as long as the canvas is drawn on.
    _matrix: LedMatrix,
    canvas: LedCanvas,
    small: LedFont,
    large: LedFont,
    color: LedColor,
}

impl MatrixPanel {
    pub fn open(config: &PanelConfig) -> Result<Self, PanelError> {
        let fonts_home = config.fonts_home.as_deref().ok_or_else(|| {
            PanelError::Hardware("fonts_home must be set to drive the LED matrix".into())
        })?;

        let mut options = LedMatrixOptions::new();
        options.set_cols(config.cols);
        options.set_rows(config.rows);
        options.set_chain_length(config.chain_length);
        options.set_parallel(config.parallel);
        options
            .set_brightness(config.brightness)
            .map_err(|e| PanelError::Hardware(e.to_string()))?;
        options.set_pwm_dither_bits(config.pwm_dither_bits);
        options.set_pwm_lsb_nanoseconds(config.pwm_lsb_nanoseconds);
        if let Some(mapping) = &config.hardware_mapping {
            options.set_hardware_mapping(mapping);
        }

        let mut runtime = LedRuntimeOptions::new();
        runtime.set_gpio_slowdown(config.gpio_slowdown);

        let matrix = LedMatrix::new(Some(options), Some(runtime))
            .map_err(|e| PanelError::Hardware(e.to_string()))?;
        let small = load_font(Path::new(fonts_home), FontSize::Small)?;
        let large = load_font(Path::new(fonts_home), FontSize::Large)?;
        let canvas = matrix.canvas();

        info!(
            cols = config.cols,
            rows = config.rows,
            brightness = config.brightness,
            "LED matrix ready"
        );

        let (red, green, blue) = TEXT_RGB;
        Ok(MatrixPanel {
            _matrix: matrix,
            canvas,
            small,
            large,
            color: LedColor { red, green, blue },
        })
    }
}

fn load_font(fonts_home: &Path, size: FontSize) -> Result<LedFont, PanelError> {
    let path: PathBuf = fonts_home.join(size.bdf_file());
    LedFont::new(&path).map_err(|e| PanelError::Font {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

impl Panel for MatrixPanel {
    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn draw(&mut self, line: &TextLine) {
        let font = match line.font {
            FontSize::Small => &self.small,
            FontSize::Large => &self.large,
        };
        self.canvas
            .draw_text(font, &line.text, line.x, line.y, &self.color, 0, false);
    }

    fn show(&mut self) -> Result<(), PanelError> {
        // Drawing goes straight to the live canvas.
        Ok(())
    }
}
