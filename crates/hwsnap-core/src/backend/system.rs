//! Live hardware source built on `sysinfo` and DRM sysfs.

use super::drm::{DrmCard, DRM_ROOT};
use super::{BYTES_PER_GB, BYTES_PER_MB};
use crate::model::{Category, Device, Sensor, SensorKind, Snapshot};
use crate::source::HardwareSource;
use crate::{Error, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use sysinfo::{Components, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::{debug, info};

/// Hwmon drivers whose readings belong to the CPU package.
const CPU_HWMON_DRIVERS: &[&str] = &["coretemp", "k10temp", "zenpower", "cpu_thermal"];

/// Backend handles, present only while the source is open.
struct Handles {
    system: System,
    components: Components,
    cards: Vec<DrmCard>,
    /// When the CPU baseline was taken, until the first refresh.
    primed_at: Option<Instant>,
}

/// Hardware source for the running machine.
pub struct SystemSource {
    drm_root: PathBuf,
    handles: Option<Handles>,
    devices: Vec<Device>,
    available_memory_mb: Option<f64>,
}

impl SystemSource {
    /// Creates a closed source using the default DRM directory.
    pub fn new() -> Self {
        Self::with_drm_root(DRM_ROOT)
    }

    /// Creates a closed source that looks for GPUs under `drm_root`.
    pub fn with_drm_root(drm_root: impl Into<PathBuf>) -> Self {
        Self {
            drm_root: drm_root.into(),
            handles: None,
            devices: Vec::new(),
            available_memory_mb: None,
        }
    }

    /// Returns true between `open` and `close`.
    pub fn is_open(&self) -> bool {
        self.handles.is_some()
    }
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareSource for SystemSource {
    fn name(&self) -> &str {
        "system"
    }

    fn open(&mut self) -> Result<()> {
        if self.handles.is_some() {
            return Ok(());
        }

        let mut system = System::new();
        // CPU usage is a delta; prime it so the first tick has a baseline.
        system.refresh_cpu_all();
        system.refresh_memory();

        let components = Components::new_with_refreshed_list();
        let cards = DrmCard::discover(&self.drm_root);

        info!(
            "System source opened ({} CPU(s), {} hwmon component(s), {} GPU(s))",
            system.cpus().len(),
            components.list().len(),
            cards.len()
        );

        self.handles = Some(Handles {
            system,
            components,
            cards,
            primed_at: Some(Instant::now()),
        });
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        let handles = self.handles.as_mut().ok_or(Error::NotOpen)?;

        if let Some(primed_at) = handles.primed_at.take() {
            if let Some(wait) = warmup_remaining(primed_at, Instant::now()) {
                debug!("Waiting {:?} for the first CPU usage sample", wait);
                std::thread::sleep(wait);
            }
        }

        handles.system.refresh_cpu_all();
        handles.system.refresh_memory();
        for component in handles.components.list_mut() {
            component.refresh();
        }

        let temperatures: Vec<(String, Option<f32>)> = handles
            .components
            .list()
            .iter()
            .map(|c| (c.label().to_string(), c.temperature()))
            .collect();

        let mut devices = vec![cpu_device(&handles.system, &temperatures)];
        devices.extend(handles.cards.iter().map(gpu_device));
        devices.push(ram_device(&handles.system));
        if let Some(board) = board_device(&handles.cards, &temperatures) {
            devices.push(board);
        }

        self.available_memory_mb =
            Some(handles.system.available_memory() as f64 / BYTES_PER_MB);
        debug!("Refreshed {} device(s)", devices.len());
        self.devices = devices;
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.devices.clone()).with_available_memory(self.available_memory_mb)
    }

    fn close(&mut self) {
        if self.handles.take().is_some() {
            info!("System source closed");
        }
        self.devices.clear();
        self.available_memory_mb = None;
    }
}

fn cpu_device(system: &System, temperatures: &[(String, Option<f32>)]) -> Device {
    let cpus = system.cpus();
    let brand = cpus
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "Unknown CPU".to_string());

    let mut device = Device::new(Category::Cpu, brand);

    for (label, value) in temperatures {
        if let Some(name) = strip_driver(label, CPU_HWMON_DRIVERS) {
            device
                .sensors
                .push(Sensor::new(name, SensorKind::Temperature, *value));
        }
    }

    for (i, cpu) in cpus.iter().enumerate() {
        device.sensors.push(Sensor::new(
            format!("CPU Core #{}", i + 1),
            SensorKind::Load,
            Some(cpu.cpu_usage()),
        ));
    }
    device.sensors.push(Sensor::new(
        "CPU Total",
        SensorKind::Load,
        Some(system.global_cpu_usage()),
    ));

    for (i, cpu) in cpus.iter().enumerate() {
        let mhz = cpu.frequency();
        device.sensors.push(Sensor::new(
            format!("CPU Core #{}", i + 1),
            SensorKind::Clock,
            (mhz > 0).then_some(mhz as f32),
        ));
    }

    device
}

/// Time left before CPU usage deltas are meaningful, measured from the
/// baseline taken at open.
fn warmup_remaining(primed_at: Instant, now: Instant) -> Option<Duration> {
    MINIMUM_CPU_UPDATE_INTERVAL
        .checked_sub(now.saturating_duration_since(primed_at))
        .filter(|d| !d.is_zero())
}

fn gpu_device(card: &DrmCard) -> Device {
    let mut device = Device::new(Category::Gpu(card.vendor), card.display_name());
    device.sensors = card.read_sensors();
    device.sensors.extend(card.read_temperatures());
    device
}

fn ram_device(system: &System) -> Device {
    let total = system.total_memory();
    let used = system.used_memory();
    let available = system.available_memory();

    let load = (total > 0).then(|| (used as f64 / total as f64 * 100.0) as f32);

    Device::new(Category::Ram, "Generic Memory")
        .with_sensor(Sensor::new("Memory", SensorKind::Load, load))
        .with_sensor(Sensor::new(
            "Used Memory",
            SensorKind::Data,
            Some((used as f64 / BYTES_PER_GB) as f32),
        ))
        .with_sensor(Sensor::new(
            "Available Memory",
            SensorKind::Data,
            Some((available as f64 / BYTES_PER_GB) as f32),
        ))
}

/// Collects the hwmon readings not claimed by the CPU or a GPU.
fn board_device(cards: &[DrmCard], temperatures: &[(String, Option<f32>)]) -> Option<Device> {
    let sensors: Vec<Sensor> = temperatures
        .iter()
        .filter(|(label, _)| {
            strip_driver(label, CPU_HWMON_DRIVERS).is_none()
                && cards
                    .iter()
                    .all(|card| strip_driver(label, card.hwmon_prefixes()).is_none())
        })
        .map(|(label, value)| Sensor::new(label.clone(), SensorKind::Temperature, *value))
        .collect();

    if sensors.is_empty() {
        return None;
    }
    let mut device = Device::new(Category::Other, "Mainboard");
    device.sensors = sensors;
    Some(device)
}

/// Returns the label without its driver prefix when the label belongs to
/// one of `drivers`, e.g. "coretemp Package id 0" becomes "Package id 0".
fn strip_driver(label: &str, drivers: &[&str]) -> Option<String> {
    let (driver, rest) = match label.split_once(' ') {
        Some((driver, rest)) => (driver, rest.trim()),
        None => (label, ""),
    };
    if !drivers.iter().any(|d| driver.eq_ignore_ascii_case(d)) {
        return None;
    }
    if rest.is_empty() {
        Some("Package".to_string())
    } else {
        Some(rest.to_string())
    }
}
