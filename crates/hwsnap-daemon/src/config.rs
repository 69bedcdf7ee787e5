//! Configuration management.

use anyhow::{Context, Result};
use hwsnap_core::{ReportProfile, DEFAULT_RAM_TOTAL_MB};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sampling interval in milliseconds
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Report layout
    #[serde(default)]
    pub report: ReportConfig,

    /// Output surface
    #[serde(default)]
    pub display: DisplayConfig,

    /// Hardware source
    #[serde(default)]
    pub source: SourceConfig,
}

/// Report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Profile name: "standard" or "legacy"
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Installed RAM in megabytes, shown by the standard profile
    #[serde(default = "default_ram_total")]
    pub ram_total_mb: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            ram_total_mb: default_ram_total(),
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Clear the terminal before each report
    #[serde(default = "default_clear")]
    pub clear: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            clear: default_clear(),
        }
    }
}

/// Hardware source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Replay a snapshot file instead of reading the machine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,

    /// DRM class directory searched for GPUs
    #[serde(default = "default_drm_root")]
    pub drm_root: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            drm_root: default_drm_root(),
        }
    }
}

// Default value functions
fn default_interval() -> u64 {
    1000
}

fn default_profile() -> String {
    "standard".to_string()
}

fn default_ram_total() -> f64 {
    DEFAULT_RAM_TOTAL_MB
}

fn default_clear() -> bool {
    true
}

fn default_drm_root() -> PathBuf {
    PathBuf::from("/sys/class/drm")
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            info!(
                "No configuration at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            anyhow::bail!("interval_ms must be greater than zero");
        }
        if !self.report.ram_total_mb.is_finite() || self.report.ram_total_mb < 0.0 {
            anyhow::bail!(
                "ram_total_mb must be a non-negative number, got {}",
                self.report.ram_total_mb
            );
        }
        self.report_profile()?;
        Ok(())
    }

    /// Resolves the configured report profile.
    pub fn report_profile(&self) -> Result<ReportProfile> {
        let profile: ReportProfile = self
            .report
            .profile
            .parse()
            .context("Invalid [report] profile")?;
        Ok(profile.with_ram_total_mb(self.report.ram_total_mb))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            report: ReportConfig::default(),
            display: DisplayConfig::default(),
            source: SourceConfig::default(),
        }
    }
}
