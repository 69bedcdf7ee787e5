//! Standard report layout.
//!
//! Absent readings count as zero in core usage and percentage math, but
//! show as "Not available" for standalone temperatures, video memory and
//! memory clock. Keep that split: dashboards parse these lines.

use super::format::{
    gb_to_mb, percent, push_temperatures, round, round_or_zero, TemperatureStyle, NOT_AVAILABLE,
};
use crate::model::{Device, SensorKind};
use crate::MB_PER_GB;

pub(super) fn cpu_lines(cpu: &Device) -> Vec<String> {
    let mut lines = vec![format!("CPU: {}", cpu.name)];

    push_temperatures(&mut lines, "CPU", cpu, TemperatureStyle::Strict);

    for core in cpu.sensors_matching(SensorKind::Load, "Core") {
        lines.push(format!("{}: {} %", core.name, round_or_zero(core.value)));
    }

    if let Some(total) = cpu.first_matching(SensorKind::Load, "Total") {
        lines.push(format!("Total CPU Load: {} %", round_or_zero(total.value)));
    }

    lines
}

pub(super) fn gpu_lines(gpu: &Device) -> Vec<String> {
    let mut lines = vec![format!("GPU: {}", gpu.name)];

    if let Some(load) = gpu.first_of(SensorKind::Load).and_then(|s| s.value) {
        lines.push(format!("GPU Usage: {} %", round(load as f64)));
    }

    push_temperatures(&mut lines, "GPU", gpu, TemperatureStyle::Strict);

    let vram = gpu
        .first_matching(SensorKind::SmallData, "GPU Memory Used")
        .and_then(|s| s.value);
    lines.push(match vram {
        Some(mb) => format!("Video Memory Usage: {} MB", round(mb as f64)),
        None => format!("Video Memory Usage: {}", NOT_AVAILABLE),
    });

    let mclk = gpu
        .first_matching(SensorKind::Clock, "Memory")
        .and_then(|s| s.value);
    lines.push(match mclk {
        Some(mhz) => format!("GPU Memory Speed: {} MHz", round(mhz as f64)),
        None => format!("GPU Memory Speed: {}", NOT_AVAILABLE),
    });

    lines
}

/// RAM lines. `total_mb` is the configured capacity; the usage percentage
/// is computed on the gigabyte scale the backend reports in, independent of
/// the megabyte value shown.
pub(super) fn ram_lines(ram: &Device, total_mb: f64, available_mb: Option<f64>) -> Vec<String> {
    let used = ram.first_matching(SensorKind::Data, "Used Memory");
    let used_gb = used.map(|s| s.value_or_zero() as f64).unwrap_or_default();
    let usage = percent(used_gb, total_mb / MB_PER_GB);

    let mut lines = vec![format!("RAM Usage: {} %", round(usage))];

    lines.push(match used.and_then(|s| s.value) {
        Some(gb) => format!("Current Usage: {} MB", round(gb_to_mb(gb as f64))),
        None => format!("Current Usage: {}", NOT_AVAILABLE),
    });
    lines.push(format!("Total Memory: {} MB", round(total_mb)));

    if let Some(available) = available_mb {
        lines.push(format!("Available Memory: {} MB", round(available)));
    }

    lines
}
