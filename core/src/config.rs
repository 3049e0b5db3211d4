//! Runtime configuration: YAML file, CLI overrides, validation.
//!
//! Precedence is CLI flag > config file > built-in default. Every section of
//! the file is optional; missing keys fall back to the defaults below and
//! unknown keys are rejected.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collector::MetricCommands;
use crate::display::Backend;
use crate::error::{MonitorError, Result};

pub const DEFAULT_HEARTBEAT_SECS: f64 = 0.25;
/// Longest accepted heartbeat interval: one day.
pub const MAX_HEARTBEAT_SECS: f64 = 86_400.0;
pub const DEFAULT_DEVICE: &str = "/dev/i2c-1";
pub const DEFAULT_ADDRESS: u8 = 0x3C;
pub const DEFAULT_WIDTH: u32 = 128;
pub const DEFAULT_HEIGHT: u32 = 32;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "PISTATS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seconds between loop iterations (and heart toggles).
    pub heartbeat: f64,
    /// Leave the last live frame on the panel at shutdown.
    pub freeze: bool,
    pub display: DisplayConfig,
    pub commands: MetricCommands,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub backend: Backend,
    /// I2C bus device node.
    pub device: String,
    /// 7-bit I2C address of the panel.
    pub address: u8,
    pub width: u32,
    pub height: u32,
}

/// Values given on the command line; `None`/`false` means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub heartbeat: Option<f64>,
    pub freeze: bool,
    pub device: Option<String>,
    pub address: Option<u8>,
    pub height: Option<u32>,
    pub preview: bool,
}

/// Settings the monitor loop itself needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub interval: Duration,
    pub freeze: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            heartbeat: DEFAULT_HEARTBEAT_SECS,
            freeze: false,
            display: DisplayConfig::default(),
            commands: MetricCommands::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            backend: Backend::default(),
            device: DEFAULT_DEVICE.into(),
            address: DEFAULT_ADDRESS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Config::default().monitor_config()
    }
}

impl Config {
    /// Load and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path).map_err(|source| MonitorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate YAML config text. An empty document yields the defaults.
    pub fn parse(content: &str) -> Result<Config> {
        let config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| MonitorError::Config(e.to_string()))?
        };
        config.validate()?;
        Ok(config)
    }

    /// File config (or defaults) merged with CLI overrides, then validated.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Config> {
        let base = match path {
            Some(p) => Self::load(p)?,
            None => Config::default(),
        };
        let merged = base.apply(overrides);
        merged.validate()?;
        Ok(merged)
    }

    pub fn apply(mut self, overrides: &Overrides) -> Config {
        if let Some(secs) = overrides.heartbeat {
            self.heartbeat = secs;
        }
        if overrides.freeze {
            self.freeze = true;
        }
        if let Some(device) = &overrides.device {
            self.display.device = device.clone();
        }
        if let Some(address) = overrides.address {
            self.display.address = address;
        }
        if let Some(height) = overrides.height {
            self.display.height = height;
        }
        if overrides.preview {
            self.display.backend = Backend::Preview;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_HEARTBEAT_SECS).contains(&self.heartbeat) {
            return Err(MonitorError::Config(format!(
                "heartbeat must be between 0 and {} seconds, got {}",
                MAX_HEARTBEAT_SECS, self.heartbeat
            )));
        }
        if self.display.width != DEFAULT_WIDTH {
            return Err(MonitorError::Config(format!(
                "display width must be {}, got {}",
                DEFAULT_WIDTH, self.display.width
            )));
        }
        if self.display.height != 32 && self.display.height != 64 {
            return Err(MonitorError::Config(format!(
                "display height must be 32 or 64, got {}",
                self.display.height
            )));
        }
        if self.display.address > 0x7F {
            return Err(MonitorError::Config(format!(
                "i2c address {:#04x} is not a 7-bit address",
                self.display.address
            )));
        }
        Ok(())
    }

    /// The heartbeat as a `Duration`, clamped to `0..=MAX_HEARTBEAT_SECS`.
    pub fn interval(&self) -> Duration {
        if self.heartbeat.is_nan() {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.heartbeat.clamp(0.0, MAX_HEARTBEAT_SECS))
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            interval: self.interval(),
            freeze: self.freeze,
            width: self.display.width,
            height: self.display.height,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| MonitorError::Config(e.to_string()))
    }
}

/// The config file to read: the explicit path, else `$PISTATS_CONFIG`, else none.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Parse an I2C address given as `0x3C` hex or plain decimal.
pub fn parse_address(s: &str) -> std::result::Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    match parsed {
        Ok(addr) if addr <= 0x7F => Ok(addr),
        Ok(addr) => Err(format!("{:#04x} is not a 7-bit i2c address", addr)),
        Err(e) => Err(format!("invalid i2c address '{}': {}", s, e)),
    }
}
