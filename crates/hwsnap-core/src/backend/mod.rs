//! Hardware source backends.
//!
//! `SystemSource` reads the running machine; `FixtureSource` replays a
//! snapshot stored in a TOML file.

mod drm;
mod fixture;
mod system;

pub use drm::DrmCard;
pub use fixture::FixtureSource;
pub use system::SystemSource;

/// Bytes per megabyte.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Bytes per gigabyte.
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
