//! Legacy report layout.
//!
//! Absent readings render as zero almost everywhere. RAM capacity is the
//! first data sensor whose name contains "Memory", which on most backends
//! is "Used Memory" itself; values are printed with an MB suffix as read.

use super::format::{percent, push_temperatures, round, round_or_zero, TemperatureStyle};
use super::NOT_AVAILABLE;
use crate::model::{Device, SensorKind};

pub(super) fn cpu_lines(cpu: &Device) -> Vec<String> {
    let mut lines = vec![format!("CPU: {}", cpu.name)];

    if let Some(load) = cpu.first_of(SensorKind::Load) {
        lines.push(format!("CPU Total Usage: {} %", round_or_zero(load.value)));
    }

    push_temperatures(&mut lines, "CPU", cpu, TemperatureStyle::AbsentAsZero);

    lines.push("Core Usage:".to_string());
    for core in cpu.sensors_matching(SensorKind::Load, "Core") {
        lines.push(format!("{}: Usage: {} %", core.name, round_or_zero(core.value)));
    }

    lines
}

pub(super) fn gpu_lines(gpu: &Device) -> Vec<String> {
    let mut lines = vec![format!("GPU: {}", gpu.name)];

    if let Some(load) = gpu.first_of(SensorKind::Load) {
        lines.push(format!("GPU Total Usage: {} %", round_or_zero(load.value)));
    }

    push_temperatures(&mut lines, "GPU", gpu, TemperatureStyle::AbsentAsZero);

    lines.push(
        match gpu.first_matching(SensorKind::SmallData, "GPU Memory Used") {
            Some(vram) => format!("Video Memory Usage: {} MB", round_or_zero(vram.value)),
            None => format!("Video Memory Usage: {}", NOT_AVAILABLE),
        },
    );

    lines.push(match gpu.first_matching(SensorKind::Load, "Memory") {
        Some(load) => format!("Memory Load: {} %", round_or_zero(load.value)),
        None => format!("Memory Load: {}", NOT_AVAILABLE),
    });

    lines
}

pub(super) fn ram_lines(ram: &Device) -> Vec<String> {
    let total = ram
        .first_matching(SensorKind::Data, "Memory")
        .map(|s| s.value_or_zero() as f64)
        .unwrap_or_default();
    let used = ram
        .first_matching(SensorKind::Data, "Used Memory")
        .map(|s| s.value_or_zero() as f64)
        .unwrap_or_default();

    vec![
        format!("RAM Usage: {} %", round(percent(used, total))),
        format!("Current Usage: {} MB", round(used)),
        format!("Total Memory: {} MB", round(total)),
    ]
}
