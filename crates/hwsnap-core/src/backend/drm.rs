//! GPU readings from the Linux DRM sysfs tree.
//!
//! Each `/sys/class/drm/cardN/device` directory exposes a handful of plain
//! text files. Which ones exist depends on the kernel driver; amdgpu exposes
//! all of them, most other drivers only `vendor`.

use super::BYTES_PER_MB;
use crate::model::{GpuVendor, Sensor, SensorKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default DRM class directory.
pub const DRM_ROOT: &str = "/sys/class/drm";

/// A GPU discovered under the DRM class directory.
#[derive(Debug, Clone)]
pub struct DrmCard {
    /// Card node name, e.g. "card0".
    pub card: String,
    pub vendor: GpuVendor,
    device_dir: PathBuf,
}

impl DrmCard {
    /// Lists GPU cards under `root`, sorted by card name.
    ///
    /// Connector entries such as `card0-DP-1` are skipped.
    pub fn discover(root: &Path) -> Vec<DrmCard> {
        let Ok(entries) = fs::read_dir(root) else {
            debug!("No DRM directory at {}", root.display());
            return Vec::new();
        };

        let mut cards: Vec<DrmCard> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let card = entry.file_name().to_string_lossy().into_owned();
                if !card.starts_with("card") || card.contains('-') {
                    return None;
                }
                let device_dir = entry.path().join("device");
                let vendor = read_trimmed(&device_dir.join("vendor"))
                    .and_then(|v| parse_hex_u16(&v))
                    .map(GpuVendor::from_pci_id)?;
                Some(DrmCard {
                    card,
                    vendor,
                    device_dir,
                })
            })
            .collect();

        cards.sort_by(|a, b| a.card.cmp(&b.card));
        debug!("Found {} DRM card(s)", cards.len());
        cards
    }

    /// Display name for the device.
    pub fn display_name(&self) -> String {
        let vendor = match self.vendor {
            GpuVendor::Nvidia => "NVIDIA",
            GpuVendor::Amd => "AMD",
            GpuVendor::Intel => "Intel",
            GpuVendor::Unknown => "Unknown",
        };
        format!("{} GPU ({})", vendor, self.card)
    }

    /// Hwmon label prefixes that belong to this card's driver.
    pub fn hwmon_prefixes(&self) -> &'static [&'static str] {
        match self.vendor {
            GpuVendor::Amd => &["amdgpu", "radeon"],
            GpuVendor::Nvidia => &["nouveau", "nvidia"],
            GpuVendor::Intel => &["i915", "xe"],
            GpuVendor::Unknown => &[],
        }
    }

    /// Reads load, memory and clock sensors. Files that are missing or
    /// unparsable produce absent values.
    pub fn read_sensors(&self) -> Vec<Sensor> {
        let busy = read_trimmed(&self.device_dir.join("gpu_busy_percent"))
            .and_then(|s| s.parse::<f32>().ok());
        let vram_used = self.read_bytes_as_mb("mem_info_vram_used");
        let vram_total = self.read_bytes_as_mb("mem_info_vram_total");
        let mclk = fs::read_to_string(self.device_dir.join("pp_dpm_mclk"))
            .ok()
            .and_then(|s| parse_active_clock(&s));

        vec![
            Sensor::new("GPU Core", SensorKind::Load, busy),
            Sensor::new("GPU Memory Used", SensorKind::SmallData, vram_used),
            Sensor::new("GPU Memory Total", SensorKind::SmallData, vram_total),
            Sensor::new("GPU Memory", SensorKind::Clock, mclk),
        ]
    }

    /// Reads temperatures from the hwmon directories under this card's
    /// device node, named "GPU <Label>". Only this card's own hwmon entries
    /// are read, so two cards on the same driver never share readings.
    pub fn read_temperatures(&self) -> Vec<Sensor> {
        let Ok(entries) = fs::read_dir(self.device_dir.join("hwmon")) else {
            return Vec::new();
        };

        let mut hwmons: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("hwmon"))
            .map(|entry| entry.path())
            .collect();
        hwmons.sort();

        let mut sensors = Vec::new();
        for hwmon in hwmons {
            let Ok(files) = fs::read_dir(&hwmon) else {
                continue;
            };
            let mut indices: Vec<u32> = files
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    name.strip_prefix("temp")?
                        .strip_suffix("_input")?
                        .parse()
                        .ok()
                })
                .collect();
            indices.sort_unstable();

            for index in indices {
                let label = read_trimmed(&hwmon.join(format!("temp{}_label", index)))
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| format!("temp{}", index));
                let celsius = read_trimmed(&hwmon.join(format!("temp{}_input", index)))
                    .and_then(|s| s.parse::<f32>().ok())
                    .map(|millis| millis / 1000.0);
                sensors.push(Sensor::new(
                    format!("GPU {}", capitalize(&label)),
                    SensorKind::Temperature,
                    celsius,
                ));
            }
        }
        sensors
    }

    fn read_bytes_as_mb(&self, file: &str) -> Option<f32> {
        read_trimmed(&self.device_dir.join(file))
            .and_then(|s| s.parse::<u64>().ok())
            .map(|bytes| (bytes as f64 / BYTES_PER_MB) as f32)
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_hex_u16(s: &str) -> Option<u16> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).ok()
}

/// Extracts the active level from a `pp_dpm_*` table.
///
/// ```text
/// 0: 96Mhz
/// 1: 456Mhz *
/// ```
fn parse_active_clock(table: &str) -> Option<f32> {
    table
        .lines()
        .find(|line| line.trim_end().ends_with('*'))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|level| {
            level
                .trim_end_matches("Mhz")
                .trim_end_matches("MHz")
                .parse::<f32>()
                .ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("hwsnap-drm-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        root
    }

    fn add_card(root: &Path, card: &str, files: &[(&str, &str)]) {
        let dir = root.join(card).join("device");
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
    }

    #[test]
    fn test_parse_active_clock() {
        assert_eq!(parse_active_clock("0: 96Mhz\n1: 456Mhz *\n2: 675Mhz\n"), Some(456.0));
        assert_eq!(parse_active_clock("0: 96Mhz\n"), None);
        assert_eq!(parse_active_clock(""), None);
    }

    #[test]
    fn test_parse_hex_u16() {
        assert_eq!(parse_hex_u16("0x1002"), Some(0x1002));
        assert_eq!(parse_hex_u16("10de"), Some(0x10DE));
        assert_eq!(parse_hex_u16("nope"), None);
    }

    #[test]
    fn test_discover_skips_connectors_and_sorts() {
        let root = temp_root("discover");
        add_card(&root, "card1", &[("vendor", "0x10de\n")]);
        add_card(&root, "card0", &[("vendor", "0x1002\n")]);
        add_card(&root, "card0-DP-1", &[("vendor", "0x1002\n")]);
        fs::create_dir_all(root.join("renderD128")).unwrap();

        let cards = DrmCard::discover(&root);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].card, "card0");
        assert_eq!(cards[0].vendor, GpuVendor::Amd);
        assert_eq!(cards[1].vendor, GpuVendor::Nvidia);
        assert_eq!(cards[1].display_name(), "NVIDIA GPU (card1)");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_read_sensors() {
        let root = temp_root("sensors");
        add_card(
            &root,
            "card0",
            &[
                ("vendor", "0x1002\n"),
                ("gpu_busy_percent", "37\n"),
                ("mem_info_vram_used", "1073741824\n"),
                ("pp_dpm_mclk", "0: 96Mhz\n1: 1000Mhz *\n"),
            ],
        );

        let cards = DrmCard::discover(&root);
        let sensors = cards[0].read_sensors();
        assert_eq!(sensors[0].value, Some(37.0));
        assert_eq!(sensors[1].name, "GPU Memory Used");
        assert_eq!(sensors[1].value, Some(1024.0));
        // mem_info_vram_total was not written
        assert_eq!(sensors[2].value, None);
        assert_eq!(sensors[3].value, Some(1000.0));

        let _ = fs::remove_dir_all(&root);
    }

    fn add_hwmon(root: &Path, card: &str, hwmon: &str, temps: &[(u32, &str, Option<&str>)]) {
        let dir = root.join(card).join("device").join("hwmon").join(hwmon);
        fs::create_dir_all(&dir).unwrap();
        for (index, input, label) in temps {
            fs::write(dir.join(format!("temp{}_input", index)), input).unwrap();
            if let Some(label) = label {
                fs::write(dir.join(format!("temp{}_label", index)), label).unwrap();
            }
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("edge"), "Edge");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_read_temperatures() {
        let root = temp_root("temps");
        add_card(&root, "card0", &[("vendor", "0x1002\n")]);
        add_hwmon(
            &root,
            "card0",
            "hwmon3",
            &[
                (2, "61000\n", Some("junction\n")),
                (1, "54000\n", Some("edge\n")),
                (3, "garbage\n", None),
            ],
        );

        let cards = DrmCard::discover(&root);
        let temps = cards[0].read_temperatures();
        let names: Vec<&str> = temps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["GPU Edge", "GPU Junction", "GPU Temp3"]);
        assert_eq!(temps[0].kind, SensorKind::Temperature);
        assert_eq!(temps[0].value, Some(54.0));
        assert_eq!(temps[1].value, Some(61.0));
        assert_eq!(temps[2].value, None);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_same_vendor_cards_keep_own_temperatures() {
        let root = temp_root("two-amd");
        add_card(&root, "card0", &[("vendor", "0x1002\n")]);
        add_card(&root, "card1", &[("vendor", "0x1002\n")]);
        add_hwmon(&root, "card0", "hwmon2", &[(1, "40000\n", Some("edge"))]);
        add_hwmon(&root, "card1", "hwmon5", &[(1, "70000\n", Some("edge"))]);

        let cards = DrmCard::discover(&root);
        let first = cards[0].read_temperatures();
        let second = cards[1].read_temperatures();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].value, Some(40.0));
        assert_eq!(second[0].value, Some(70.0));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_discover_missing_root() {
        let cards = DrmCard::discover(Path::new("/nonexistent/hwsnap/drm"));
        assert!(cards.is_empty());
    }
}
