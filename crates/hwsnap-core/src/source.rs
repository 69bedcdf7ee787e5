//! Hardware source abstraction.

use crate::model::Snapshot;
use crate::Result;

/// A provider of device and sensor readings.
///
/// Values only change on `refresh`; `snapshot` is a cheap copy of the
/// current view. Individual sensors that cannot be read come back as absent
/// values, so `refresh` only fails when the whole backend is unusable.
pub trait HardwareSource {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Acquires backend resources. Calling it twice is a no-op.
    fn open(&mut self) -> Result<()>;

    /// Re-reads every sensor.
    fn refresh(&mut self) -> Result<()>;

    /// Returns the view captured by the last `refresh`.
    fn snapshot(&self) -> Snapshot;

    /// Releases backend resources. Calling it twice is a no-op.
    fn close(&mut self);
}
