//! Devices, sensors and snapshots.
//!
//! The model mirrors what hardware monitoring backends expose: a flat list
//! of devices, each with an ordered list of named sensors. Sensor names are
//! free-form and the report builder pattern-matches on them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GPU vendor, used to tell vendor-specific GPU devices apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Unknown,
}

impl GpuVendor {
    /// Maps a PCI vendor id to a GPU vendor.
    pub fn from_pci_id(id: u16) -> Self {
        match id {
            0x10DE => GpuVendor::Nvidia,
            0x1002 => GpuVendor::Amd,
            0x8086 => GpuVendor::Intel,
            _ => GpuVendor::Unknown,
        }
    }
}

/// Hardware device category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cpu,
    Gpu(GpuVendor),
    Ram,
    Other,
}

impl Category {
    /// Returns true for GPU devices of any vendor.
    pub fn is_gpu(&self) -> bool {
        matches!(self, Category::Gpu(_))
    }
}

/// Physical quantity a sensor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Utilization in percent.
    Load,
    /// Degrees Celsius.
    Temperature,
    /// Capacity in gigabytes.
    Data,
    /// Capacity in megabytes.
    SmallData,
    /// Frequency in megahertz.
    Clock,
    Other,
}

/// A single named reading on a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub name: String,
    pub kind: SensorKind,
    /// Latest reading. `None` means not currently available, not zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f32>,
}

impl Sensor {
    /// Creates a sensor, discarding non-finite readings.
    pub fn new(name: impl Into<String>, kind: SensorKind, value: Option<f32>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.filter(|v| v.is_finite()),
        }
    }

    /// Returns the reading, or zero when absent.
    pub fn value_or_zero(&self) -> f32 {
        self.value.unwrap_or_default()
    }
}

/// A hardware component with its sensors in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub category: Category,
    pub name: String,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

impl Device {
    /// Creates a device without sensors.
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            sensors: Vec::new(),
        }
    }

    /// Appends a sensor, builder style.
    pub fn with_sensor(mut self, sensor: Sensor) -> Self {
        self.sensors.push(sensor);
        self
    }

    /// All sensors of a kind, in order.
    pub fn sensors_of(&self, kind: SensorKind) -> impl Iterator<Item = &Sensor> {
        self.sensors.iter().filter(move |s| s.kind == kind)
    }

    /// Sensors of a kind whose name contains `needle` (case-sensitive).
    pub fn sensors_matching<'a>(
        &'a self,
        kind: SensorKind,
        needle: &'a str,
    ) -> impl Iterator<Item = &'a Sensor> {
        self.sensors_of(kind).filter(move |s| s.name.contains(needle))
    }

    /// First sensor of a kind.
    pub fn first_of(&self, kind: SensorKind) -> Option<&Sensor> {
        self.sensors_of(kind).next()
    }

    /// First sensor of a kind whose name contains `needle`.
    pub fn first_matching(&self, kind: SensorKind, needle: &str) -> Option<&Sensor> {
        self.sensors_of(kind).find(|s| s.name.contains(needle))
    }
}

/// Point-in-time view of all devices, plus the OS available-memory counter
/// read on the same tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub devices: Vec<Device>,
    /// Available physical memory in megabytes, if the counter could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_memory_mb: Option<f64>,
}

impl Snapshot {
    /// Creates a snapshot from a device list.
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            available_memory_mb: None,
        }
    }

    /// Attaches the available-memory counter reading.
    pub fn with_available_memory(mut self, mb: Option<f64>) -> Self {
        self.available_memory_mb = mb.filter(|v| v.is_finite());
        self
    }

    /// First device matching the predicate, in discovery order.
    pub fn find(&self, predicate: impl Fn(&Category) -> bool) -> Option<&Device> {
        self.devices.iter().find(|d| predicate(&d.category))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Cpu => write!(f, "CPU"),
            Category::Gpu(_) => write!(f, "GPU"),
            Category::Ram => write!(f, "RAM"),
            Category::Other => write!(f, "Other"),
        }
    }
}
