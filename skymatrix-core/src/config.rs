//! Configuration file management for skymatrix.
//!
//! Reads/writes `~/.skymatrix/config.yaml` with the device location and
//! panel orientation, feeder host and timing, and LED panel options.

use std::path::{Path, PathBuf};

use crate::bearing::DEFAULT_ORIENTATION_DEG;
use crate::types::{Position, Result, SkyError};

/// Full configuration structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub device: DeviceConfig,
    pub feeder: FeederConfig,
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Panel rotation relative to true north, degrees.
    pub orientation_deg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeederConfig {
    /// `host:port` of the FR24 feeder.
    pub host: String,
    pub poll_interval_sec: u64,
    pub page_dwell_sec: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub cols: u32,
    pub rows: u32,
    pub chain_length: u32,
    pub parallel: u32,
    pub brightness: u8,
    pub pwm_dither_bits: u32,
    pub pwm_lsb_nanoseconds: u32,
    pub gpio_slowdown: u32,
    pub hardware_mapping: Option<String>,
    pub fonts_home: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: DeviceConfig {
                lat: None,
                lon: None,
                orientation_deg: DEFAULT_ORIENTATION_DEG,
            },
            feeder: FeederConfig {
                host: "localhost:8754".into(),
                poll_interval_sec: 60,
                page_dwell_sec: 10,
            },
            panel: PanelConfig {
                cols: 64,
                rows: 32,
                chain_length: 1,
                parallel: 1,
                brightness: 40,
                pwm_dither_bits: 1,
                pwm_lsb_nanoseconds: 50,
                gpio_slowdown: 2,
                hardware_mapping: None,
                fonts_home: None,
            },
        }
    }
}

impl Config {
    /// Device location, if both coordinates are configured and valid.
    pub fn observer(&self) -> Result<Position> {
        match (self.device.lat, self.device.lon) {
            (Some(lat), Some(lon)) => Position::new(lat, lon),
            _ => Err(SkyError::Config(
                "device latitude and longitude are required".into(),
            )),
        }
    }
}

/// Get the config directory path (`~/.skymatrix/`).
pub fn config_dir() -> PathBuf {
    dirs_home().join(".skymatrix")
}

/// Get the config file path.
pub fn config_file() -> PathBuf {
    config_dir().join("config.yaml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Load config from `~/.skymatrix/config.yaml`.
///
/// Returns default config if file doesn't exist.
pub fn load_config() -> Config {
    load_config_from(&config_file())
}

/// Load config from an explicit path, falling back to defaults.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(text) => parse_config(&text),
        Err(_) => Config::default(),
    }
}

/// Save config to an explicit path, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, serialize_config(config))?;
    Ok(())
}

/// Parse simple YAML-like config text. Unknown keys and bad values are ignored.
fn parse_config(text: &str) -> Config {
    let mut config = Config::default();
    let mut current_section: Option<String> = None;

    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }

        let is_indented = line.starts_with("  ") || line.starts_with('\t');

        let Some((key, val)) = stripped.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let val = val.trim();

        if !is_indented {
            current_section = val.is_empty().then(|| key.to_string());
            continue;
        }

        let Some(section) = current_section.as_deref() else {
            continue;
        };
        match section {
            "device" => {
                let device = &mut config.device;
                match key {
                    "lat" => device.lat = parse_float_value(val),
                    "lon" => device.lon = parse_float_value(val),
                    "orientation_deg" => set_parsed(&mut device.orientation_deg, val),
                    _ => {}
                }
            }
            "feeder" => {
                let feeder = &mut config.feeder;
                match key {
                    "host" => {
                        if let Some(v) = parse_string_value(val) {
                            feeder.host = v;
                        }
                    }
                    "poll_interval_sec" => set_parsed(&mut feeder.poll_interval_sec, val),
                    "page_dwell_sec" => set_parsed(&mut feeder.page_dwell_sec, val),
                    _ => {}
                }
            }
            "panel" => {
                let panel = &mut config.panel;
                match key {
                    "cols" => set_parsed(&mut panel.cols, val),
                    "rows" => set_parsed(&mut panel.rows, val),
                    "chain_length" => set_parsed(&mut panel.chain_length, val),
                    "parallel" => set_parsed(&mut panel.parallel, val),
                    "brightness" => set_parsed(&mut panel.brightness, val),
                    "pwm_dither_bits" => set_parsed(&mut panel.pwm_dither_bits, val),
                    "pwm_lsb_nanoseconds" => set_parsed(&mut panel.pwm_lsb_nanoseconds, val),
                    "gpio_slowdown" => set_parsed(&mut panel.gpio_slowdown, val),
                    "hardware_mapping" => panel.hardware_mapping = parse_string_value(val),
                    "fonts_home" => panel.fonts_home = parse_string_value(val),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    config
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, val: &str) {
    if let Ok(v) = val.parse::<T>() {
        *slot = v;
    }
}

fn parse_string_value(val: &str) -> Option<String> {
    if val == "null" || val == "~" || val.is_empty() {
        return None;
    }
    // Strip quotes
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        return Some(val[1..val.len() - 1].to_string());
    }
    Some(val.to_string())
}

fn parse_float_value(val: &str) -> Option<f64> {
    if val == "null" || val == "~" || val.is_empty() {
        return None;
    }
    val.parse().ok()
}

fn optional_string(key: &str, val: &Option<String>) -> String {
    match val {
        Some(v) => format!("  {key}: \"{v}\""),
        None => format!("  {key}: null"),
    }
}

fn optional_float(key: &str, val: Option<f64>) -> String {
    match val {
        Some(v) => format!("  {key}: {v}"),
        None => format!("  {key}: null"),
    }
}

/// Serialize config to YAML-like text.
pub fn serialize_config(config: &Config) -> String {
    let device = &config.device;
    let feeder = &config.feeder;
    let panel = &config.panel;

    let lines = vec![
        "# skymatrix configuration".to_string(),
        String::new(),
        "device:".into(),
        optional_float("lat", device.lat),
        optional_float("lon", device.lon),
        format!("  orientation_deg: {}", device.orientation_deg),
        String::new(),
        "feeder:".into(),
        format!("  host: \"{}\"", feeder.host),
        format!("  poll_interval_sec: {}", feeder.poll_interval_sec),
        format!("  page_dwell_sec: {}", feeder.page_dwell_sec),
        String::new(),
        "panel:".into(),
        format!("  cols: {}", panel.cols),
        format!("  rows: {}", panel.rows),
        format!("  chain_length: {}", panel.chain_length),
        format!("  parallel: {}", panel.parallel),
        format!("  brightness: {}", panel.brightness),
        format!("  pwm_dither_bits: {}", panel.pwm_dither_bits),
        format!("  pwm_lsb_nanoseconds: {}", panel.pwm_lsb_nanoseconds),
        format!("  gpio_slowdown: {}", panel.gpio_slowdown),
        optional_string("hardware_mapping", &panel.hardware_mapping),
        optional_string("fonts_home", &panel.fonts_home),
    ];

    lines.join("\n") + "\n"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.device.orientation_deg, 240.0);
        assert_eq!(config.feeder.host, "localhost:8754");
        assert_eq!(config.feeder.poll_interval_sec, 60);
        assert_eq!(config.panel.cols, 64);
        assert_eq!(config.panel.brightness, 40);
        assert!(config.panel.fonts_home.is_none());
        assert!(config.observer().is_err());
    }

    #[test]
    fn test_parse_config() {
        let text = r#"
device:
  lat: 59.3293
  lon: 18.0686
  orientation_deg: 90

feeder:
  host: "raspberrypi.local:8754"
  poll_interval_sec: 30
  page_dwell_sec: 5

panel:
  brightness: 80
  gpio_slowdown: 4
  hardware_mapping: "adafruit-hat"
  fonts_home: '/home/pi/fonts'
"#;
        let config = parse_config(text);
        assert_eq!(config.device.lat, Some(59.3293));
        assert_eq!(config.device.lon, Some(18.0686));
        assert_eq!(config.device.orientation_deg, 90.0);
        assert_eq!(config.feeder.host, "raspberrypi.local:8754");
        assert_eq!(config.feeder.poll_interval_sec, 30);
        assert_eq!(config.feeder.page_dwell_sec, 5);
        assert_eq!(config.panel.brightness, 80);
        assert_eq!(config.panel.gpio_slowdown, 4);
        assert_eq!(config.panel.cols, 64); // untouched default
        assert_eq!(config.panel.hardware_mapping.as_deref(), Some("adafruit-hat"));
        assert_eq!(config.panel.fonts_home.as_deref(), Some("/home/pi/fonts"));

        let observer = config.observer().unwrap();
        assert_eq!(observer.lat(), 59.3293);
    }

    #[test]
    fn test_parse_config_null_and_garbage() {
        let text = r#"
device:
  lat: null
  lon: ~
  orientation_deg: sideways

panel:
  brightness: 9000
  fonts_home: null
"#;
        let config = parse_config(text);
        assert!(config.device.lat.is_none());
        assert!(config.device.lon.is_none());
        assert_eq!(config.device.orientation_deg, 240.0);
        assert_eq!(config.panel.brightness, 40); // out of u8 range
        assert!(config.panel.fonts_home.is_none());
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.device.lat = Some(35.5);
        config.device.lon = Some(-82.5);
        config.device.orientation_deg = 12.5;
        config.feeder.host = "10.0.0.2:8754".into();
        config.panel.hardware_mapping = Some("regular".into());
        config.panel.fonts_home = Some("/opt/fonts".into());

        let parsed = parse_config(&serialize_config(&config));
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.device.lat = Some(59.3293);
        config.device.lon = Some(18.0686);
        save_config_to(&config, &path).unwrap();

        assert_eq!(load_config_from(&path), config);
    }

    #[test]
    fn test_save_under_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = save_config_to(&Config::default(), &blocker.join("config.yaml")).unwrap_err();
        assert!(matches!(err, SkyError::Io(_)));
    }

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.yaml"));
        assert_eq!(config, Config::default());
    }
}
