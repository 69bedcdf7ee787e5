//! Value normalization and line formatting shared by all profiles.
//!
//! Every displayed magnitude goes through [`round`], which rounds half to
//! even: 72.5 shows as 72 and 73.5 as 74.

use crate::model::{Device, SensorKind};
use crate::MB_PER_GB;

/// Placeholder for readings that are not available.
pub const NOT_AVAILABLE: &str = "Not available";

/// Placeholder for devices that are not present.
pub const NOT_FOUND: &str = "Not found";

/// Rounds a reading for display, half to even.
pub fn round(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Rounds a reading, counting an absent value as zero.
pub fn round_or_zero(value: Option<f32>) -> i64 {
    round(value.unwrap_or_default() as f64)
}

/// Converts a gigabyte-scale reading to megabytes.
pub fn gb_to_mb(gb: f64) -> f64 {
    gb * MB_PER_GB
}

/// Percentage of `part` in `whole`, zero when `whole` is not positive.
/// Not clamped: out-of-range readings pass through.
pub fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// How temperature readings of zero or less are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureStyle {
    /// Absent or non-positive readings render as "Not available".
    Strict,
    /// Absent readings render as 0 °C.
    AbsentAsZero,
}

/// Appends the temperature block for a device: a header followed by one
/// line per sensor, or a single "Not available" line when the device has
/// no temperature sensors at all.
pub fn push_temperatures(
    lines: &mut Vec<String>,
    prefix: &str,
    device: &Device,
    style: TemperatureStyle,
) {
    let mut sensors = device.sensors_of(SensorKind::Temperature).peekable();
    if sensors.peek().is_none() {
        lines.push(format!("{} Temperatures: {}", prefix, NOT_AVAILABLE));
        return;
    }

    lines.push(format!("{} Temperatures:", prefix));
    for sensor in sensors {
        let line = match (style, sensor.value) {
            (TemperatureStyle::Strict, Some(v)) if v > 0.0 => {
                format!("{}: {} °C", sensor.name, round(v as f64))
            }
            (TemperatureStyle::Strict, _) => format!("{}: {}", sensor.name, NOT_AVAILABLE),
            (TemperatureStyle::AbsentAsZero, v) => {
                format!("{}: {} °C", sensor.name, round_or_zero(v))
            }
        };
        lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Sensor};

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round(72.5), 72);
        assert_eq!(round(73.5), 74);
        assert_eq!(round(42.3), 42);
        assert_eq!(round(55.7), 56);
        assert_eq!(round(-0.4), 0);
        assert_eq!(round(-2.5), -2);
    }

    #[test]
    fn test_round_is_stable() {
        let first = round(72.5);
        for _ in 0..10 {
            assert_eq!(round(72.5), first);
        }
    }

    #[test]
    fn test_round_or_zero() {
        assert_eq!(round_or_zero(None), 0);
        assert_eq!(round_or_zero(Some(99.6)), 100);
    }

    #[test]
    fn test_percent_guards_zero() {
        assert_eq!(percent(8.0, 16.0), 50.0);
        assert_eq!(percent(8.0, 0.0), 0.0);
        assert_eq!(percent(8.0, -1.0), 0.0);
        // Not clamped
        assert_eq!(percent(32.0, 16.0), 200.0);
    }

    #[test]
    fn test_gb_to_mb() {
        assert_eq!(gb_to_mb(8.0), 8192.0);
    }

    #[test]
    fn test_temperatures_strict() {
        let device = Device::new(Category::Cpu, "cpu")
            .with_sensor(Sensor::new("Core #1", SensorKind::Temperature, Some(55.1)))
            .with_sensor(Sensor::new("Core #2", SensorKind::Temperature, None))
            .with_sensor(Sensor::new("Core #3", SensorKind::Temperature, Some(0.0)));
        let mut lines = Vec::new();
        push_temperatures(&mut lines, "CPU", &device, TemperatureStyle::Strict);
        assert_eq!(
            lines,
            vec![
                "CPU Temperatures:",
                "Core #1: 55 °C",
                "Core #2: Not available",
                "Core #3: Not available",
            ]
        );
    }

    #[test]
    fn test_temperatures_absent_as_zero() {
        let device = Device::new(Category::Cpu, "cpu")
            .with_sensor(Sensor::new("Core #2", SensorKind::Temperature, None));
        let mut lines = Vec::new();
        push_temperatures(&mut lines, "GPU", &device, TemperatureStyle::AbsentAsZero);
        assert_eq!(lines, vec!["GPU Temperatures:", "Core #2: 0 °C"]);
    }

    #[test]
    fn test_temperatures_none() {
        let device = Device::new(Category::Cpu, "cpu")
            .with_sensor(Sensor::new("CPU Total", SensorKind::Load, Some(1.0)));
        let mut lines = Vec::new();
        push_temperatures(&mut lines, "CPU", &device, TemperatureStyle::Strict);
        assert_eq!(lines, vec!["CPU Temperatures: Not available"]);
    }
}
