// src/config.rs
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::drivers::AcquisitionError;

/// What to do when several complete lines arrived since the last poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backpressure {
    /// Parse only the most recent line, drop the rest.
    #[default]
    KeepLatest,
    /// Parse every line in arrival order.
    QueueAll,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: "Load Cell (20g FSR)".to_owned(),
            x_label: "t (sec)".to_owned(),
            y_label: "angle (deg)".to_owned(),
            y_min: -2.1,
            y_max: 2.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_secs: f64,
    /// Sleep after opening the port while the board resets.
    pub settle_secs: f64,
    pub window_size: f64,
    /// High-pass cutoff; 0.05 Hz only strips slow drift from the load cell.
    pub cutoff_hz: f64,
    pub filter_enabled: bool,
    pub coerce_numeric: bool,
    pub backpressure: Backpressure,
    pub data_file: PathBuf,
    pub idle_sleep_ms: u64,
    pub plot: PlotConfig,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_owned(),
            baud_rate: 115_200,
            timeout_secs: 10.0,
            settle_secs: 0.5,
            window_size: 10.0,
            cutoff_hz: 0.05,
            filter_enabled: false,
            coerce_numeric: true,
            backpressure: Backpressure::KeepLatest,
            data_file: PathBuf::from("data.txt"),
            idle_sleep_ms: 1,
            plot: PlotConfig::default(),
        }
    }
}

impl AcquisitionConfig {
    /// Reads a JSON file; missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AcquisitionError> {
        if !(self.window_size.is_finite() && self.window_size > 0.0) {
            return Err(AcquisitionError::InvalidConfig(format!(
                "window size must be positive, got {}",
                self.window_size
            )));
        }
        if !(self.cutoff_hz.is_finite() && self.cutoff_hz > 0.0) {
            return Err(AcquisitionError::InvalidConfig(format!(
                "cutoff frequency must be positive, got {}",
                self.cutoff_hz
            )));
        }
        if self.filter_enabled && !self.coerce_numeric {
            return Err(AcquisitionError::InvalidConfig(
                "filtering requires numeric coercion".to_owned(),
            ));
        }
        if !(self.timeout_secs.is_finite() && self.timeout_secs >= 0.0)
            || !(self.settle_secs.is_finite() && self.settle_secs >= 0.0)
        {
            return Err(AcquisitionError::InvalidConfig(
                "timeouts must be non-negative".to_owned(),
            ));
        }
        if self.plot.y_min >= self.plot.y_max {
            return Err(AcquisitionError::InvalidConfig(format!(
                "plot y range is empty: [{}, {}]",
                self.plot.y_min, self.plot.y_max
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs_f64(self.settle_secs)
    }

    pub fn idle_sleep(&self) -> Duration {
        Duration::from_millis(self.idle_sleep_ms)
    }
}
