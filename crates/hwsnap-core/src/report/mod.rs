//! Text report building.
//!
//! A report is built as ordered sections of lines (CPU, GPU, RAM) and
//! joined into text at the very end. Every section is always present: a
//! missing device turns its section into a single "Not found" line.
//!
//! ```text
//! CPU: Intel Core i7
//! CPU Temperatures:
//! Core #1: 55 °C
//! CPU Core #1: 12 %
//! Total CPU Load: 42 %
//! GPU: Not found
//! RAM Usage: 50 %
//! Current Usage: 8192 MB
//! Total Memory: 16384 MB
//! Available Memory: 7200 MB
//! ```

mod format;
mod legacy;
mod profile;
mod standard;

pub use format::{round, NOT_AVAILABLE, NOT_FOUND};
pub use profile::ReportProfile;

use crate::model::{Category, Device, Snapshot};
use std::fmt;

/// Report section kinds, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Cpu,
    Gpu,
    Ram,
}

impl SectionKind {
    /// Label used in "Not found" lines.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Cpu => "CPU",
            SectionKind::Gpu => "GPU",
            SectionKind::Ram => "RAM",
        }
    }
}

/// One block of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    /// The section used when no device of this kind exists.
    pub fn not_found(kind: SectionKind) -> Self {
        Self {
            kind,
            lines: vec![format!("{}: {}", kind.label(), NOT_FOUND)],
        }
    }

    /// Returns true if the section stands in for a missing device.
    pub fn is_not_found(&self) -> bool {
        *self == Self::not_found(self.kind)
    }

    /// Returns true if any line equals `line`.
    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

/// The output of one sampling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    /// Returns the section of a kind.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Iterates over all lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter().map(String::as_str))
    }

    /// Renders the report as text, one newline-terminated line each.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Builds reports from snapshots according to a profile.
///
/// `build` is a pure function of the snapshot: the same input always gives
/// byte-identical output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    profile: ReportProfile,
}

impl ReportBuilder {
    /// Creates a builder for a profile.
    pub fn new(profile: ReportProfile) -> Self {
        Self { profile }
    }

    /// Returns the active profile.
    pub fn profile(&self) -> ReportProfile {
        self.profile
    }

    /// Builds the full report.
    pub fn build(&self, snapshot: &Snapshot) -> Report {
        Report {
            sections: vec![
                self.cpu_section(snapshot),
                self.gpu_section(snapshot),
                self.ram_section(snapshot),
            ],
        }
    }

    /// Builds the CPU section from the first CPU device.
    pub fn cpu_section(&self, snapshot: &Snapshot) -> Section {
        self.section(SectionKind::Cpu, snapshot.find(|c| *c == Category::Cpu), |d| {
            match self.profile {
                ReportProfile::Standard { .. } => standard::cpu_lines(d),
                ReportProfile::Legacy => legacy::cpu_lines(d),
            }
        })
    }

    /// Builds the GPU section from the first GPU device the profile accepts.
    pub fn gpu_section(&self, snapshot: &Snapshot) -> Section {
        let device = snapshot.find(|c| self.profile.accepts_gpu(c));
        self.section(SectionKind::Gpu, device, |d| match self.profile {
            ReportProfile::Standard { .. } => standard::gpu_lines(d),
            ReportProfile::Legacy => legacy::gpu_lines(d),
        })
    }

    /// Builds the RAM section from the first RAM device.
    pub fn ram_section(&self, snapshot: &Snapshot) -> Section {
        self.section(SectionKind::Ram, snapshot.find(|c| *c == Category::Ram), |d| {
            match self.profile {
                ReportProfile::Standard { ram_total_mb } => {
                    standard::ram_lines(d, ram_total_mb, snapshot.available_memory_mb)
                }
                ReportProfile::Legacy => legacy::ram_lines(d),
            }
        })
    }

    fn section(
        &self,
        kind: SectionKind,
        device: Option<&Device>,
        lines: impl FnOnce(&Device) -> Vec<String>,
    ) -> Section {
        match device {
            Some(device) => Section {
                kind,
                lines: lines(device),
            },
            None => Section::not_found(kind),
        }
    }
}
