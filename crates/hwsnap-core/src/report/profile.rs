//! Report profiles.
//!
//! Two report layouts have been in use. The standard layout is the current
//! one; the legacy layout reproduces the older window output line for line,
//! including its quirks, so existing screenshots and scripts keep matching.

use crate::model::{Category, GpuVendor};
use crate::{Error, Result, DEFAULT_RAM_TOTAL_MB};
use std::str::FromStr;

/// Selects the report layout and the RAM capacity policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportProfile {
    /// Current layout. RAM capacity is the configured constant in MB.
    Standard { ram_total_mb: f64 },
    /// Older layout. RAM capacity comes from the first "Memory" data sensor
    /// and only NVIDIA GPUs are reported.
    Legacy,
}

impl Default for ReportProfile {
    fn default() -> Self {
        ReportProfile::Standard {
            ram_total_mb: DEFAULT_RAM_TOTAL_MB,
        }
    }
}

impl ReportProfile {
    /// Returns the profile name as used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            ReportProfile::Standard { .. } => "standard",
            ReportProfile::Legacy => "legacy",
        }
    }

    /// Sets the RAM capacity. No effect on the legacy profile.
    pub fn with_ram_total_mb(self, ram_total_mb: f64) -> Self {
        match self {
            ReportProfile::Standard { .. } => ReportProfile::Standard { ram_total_mb },
            ReportProfile::Legacy => ReportProfile::Legacy,
        }
    }

    /// Returns true if a device of this category fills the GPU section.
    pub fn accepts_gpu(&self, category: &Category) -> bool {
        match self {
            ReportProfile::Standard { .. } => category.is_gpu(),
            ReportProfile::Legacy => *category == Category::Gpu(GpuVendor::Nvidia),
        }
    }
}

impl FromStr for ReportProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ReportProfile::default()),
            "legacy" => Ok(ReportProfile::Legacy),
            _ => Err(Error::InvalidProfile(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportProfile::Standard { ram_total_mb } => {
                write!(f, "standard (RAM total {} MB)", ram_total_mb)
            }
            ReportProfile::Legacy => write!(f, "legacy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "standard".parse::<ReportProfile>().unwrap(),
            ReportProfile::Standard {
                ram_total_mb: 16384.0
            }
        );
        assert_eq!(
            "LEGACY".parse::<ReportProfile>().unwrap(),
            ReportProfile::Legacy
        );
        assert!("fancy".parse::<ReportProfile>().is_err());
    }

    #[test]
    fn test_with_ram_total() {
        let profile = ReportProfile::default().with_ram_total_mb(8192.0);
        assert_eq!(
            profile,
            ReportProfile::Standard {
                ram_total_mb: 8192.0
            }
        );
        assert_eq!(
            ReportProfile::Legacy.with_ram_total_mb(8192.0),
            ReportProfile::Legacy
        );
    }

    #[test]
    fn test_accepts_gpu() {
        let amd = Category::Gpu(GpuVendor::Amd);
        let nvidia = Category::Gpu(GpuVendor::Nvidia);
        assert!(ReportProfile::default().accepts_gpu(&amd));
        assert!(ReportProfile::default().accepts_gpu(&nvidia));
        assert!(!ReportProfile::default().accepts_gpu(&Category::Cpu));
        assert!(!ReportProfile::Legacy.accepts_gpu(&amd));
        assert!(ReportProfile::Legacy.accepts_gpu(&nvidia));
    }

    #[test]
    fn test_display() {
        assert_eq!(ReportProfile::Legacy.to_string(), "legacy");
        assert_eq!(ReportProfile::default().name(), "standard");
    }
}
