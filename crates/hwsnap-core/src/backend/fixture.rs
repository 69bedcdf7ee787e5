//! Snapshot replay from a TOML file.
//!
//! ```toml
//! available_memory_mb = 7200
//!
//! [[devices]]
//! category = "cpu"
//! name = "Intel Core i7"
//! sensors = [
//!     { name = "CPU Total", kind = "load", value = 42.3 },
//!     { name = "Core #1", kind = "temperature", value = 55.1 },
//! ]
//!
//! [[devices]]
//! category = { gpu = "nvidia" }
//! name = "NVIDIA GeForce GTX 1080"
//! ```

use crate::model::Snapshot;
use crate::source::HardwareSource;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Hardware source that reads its snapshot from a file on every refresh.
pub struct FixtureSource {
    path: PathBuf,
    open: bool,
    snapshot: Snapshot,
}

impl FixtureSource {
    /// Creates a closed source for the fixture at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open: false,
            snapshot: Snapshot::default(),
        }
    }

    /// Returns the fixture path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses a snapshot from TOML text.
    pub fn parse(content: &str, path: &Path) -> Result<Snapshot> {
        let mut snapshot: Snapshot =
            toml::from_str(content).map_err(|source| Error::FixtureParse {
                path: path.to_path_buf(),
                source,
            })?;

        // Readings are finite or absent, whatever the file says.
        for sensor in snapshot.devices.iter_mut().flat_map(|d| d.sensors.iter_mut()) {
            sensor.value = sensor.value.filter(|v| v.is_finite());
        }
        snapshot.available_memory_mb = snapshot.available_memory_mb.filter(|v| v.is_finite());
        Ok(snapshot)
    }
}

impl HardwareSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn open(&mut self) -> Result<()> {
        if !self.open {
            info!("Fixture source opened: {}", self.path.display());
            self.open = true;
        }
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        if !self.open {
            return Err(Error::NotOpen);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| Error::FixtureIo {
            path: self.path.clone(),
            source,
        })?;
        self.snapshot = Self::parse(&content, &self.path)?;
        debug!(
            "Loaded {} device(s) from {}",
            self.snapshot.devices.len(),
            self.path.display()
        );
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }

    fn close(&mut self) {
        if self.open {
            info!("Fixture source closed");
        }
        self.open = false;
        self.snapshot = Snapshot::default();
    }
}
