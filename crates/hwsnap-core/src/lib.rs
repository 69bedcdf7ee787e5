//! hwsnap core library
//!
//! Samples CPU, GPU and RAM sensors from a hardware source and turns a
//! point-in-time snapshot into a plain-text report. The report builder
//! degrades field by field when devices or readings are missing; it never
//! fails.

pub mod backend;
pub mod error;
pub mod model;
pub mod report;
pub mod source;

pub use backend::{FixtureSource, SystemSource};
pub use error::{Error, Result};
pub use model::{Category, Device, GpuVendor, Sensor, SensorKind, Snapshot};
pub use report::{Report, ReportBuilder, ReportProfile, Section, SectionKind};
pub use source::HardwareSource;

/// Default RAM capacity in megabytes for the standard report profile.
pub const DEFAULT_RAM_TOTAL_MB: f64 = 16384.0;

/// Megabytes per gigabyte, used when normalizing memory sensors.
pub const MB_PER_GB: f64 = 1024.0;
