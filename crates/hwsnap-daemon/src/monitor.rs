//! Sampling loop: refresh, build, show.

use anyhow::{Context, Result};
use hwsnap_core::{HardwareSource, Report, ReportBuilder};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::display::Surface;

/// How often a repeating error is logged.
const ERROR_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Logs the first error of a failing run, then at most once per interval
/// with a count of what was suppressed in between.
struct ErrorLog {
    failing: bool,
    suppressed: u32,
    last_logged: Option<Instant>,
}

impl ErrorLog {
    fn new() -> Self {
        Self {
            failing: false,
            suppressed: 0,
            last_logged: None,
        }
    }

    /// Records an error. Returns true when it was logged.
    fn record(&mut self, what: &str, err: &dyn std::fmt::Display) -> bool {
        let now = Instant::now();
        let due = match self.last_logged {
            Some(last) if self.failing => now.duration_since(last) >= ERROR_LOG_INTERVAL,
            _ => true,
        };

        if !due {
            self.suppressed += 1;
            return false;
        }

        if self.suppressed > 0 {
            warn!(
                "{} error ({} more suppressed since last report): {}",
                what, self.suppressed, err
            );
        } else {
            warn!("{} error: {}", what, err);
        }
        self.failing = true;
        self.suppressed = 0;
        self.last_logged = Some(now);
        true
    }

    fn reset(&mut self) {
        self.failing = false;
        self.suppressed = 0;
    }
}

/// Owns the hardware source and drives one sample-and-render cycle per tick.
pub struct Monitor {
    source: Box<dyn HardwareSource>,
    builder: ReportBuilder,
    surface: Box<dyn Surface>,
    errors: ErrorLog,
}

impl Monitor {
    /// Creates a monitor. The source is opened by `start`.
    pub fn new(
        source: Box<dyn HardwareSource>,
        builder: ReportBuilder,
        surface: Box<dyn Surface>,
    ) -> Self {
        Self {
            source,
            builder,
            surface,
            errors: ErrorLog::new(),
        }
    }

    /// Opens the hardware source.
    pub fn start(&mut self) -> Result<()> {
        self.source
            .open()
            .with_context(|| format!("Failed to open {} source", self.source.name()))?;
        info!(
            "Monitoring with {} source, {} profile",
            self.source.name(),
            self.builder.profile()
        );
        Ok(())
    }

    /// Releases the hardware source.
    pub fn stop(&mut self) {
        self.source.close();
    }

    /// Refreshes the source and builds a report from the fresh snapshot.
    pub fn sample(&mut self) -> Result<Report> {
        self.source
            .refresh()
            .with_context(|| format!("Failed to refresh {} source", self.source.name()))?;
        let snapshot = self.source.snapshot();
        debug!("Sampled {} device(s)", snapshot.devices.len());
        Ok(self.builder.build(&snapshot))
    }

    /// Runs one cycle. A failed refresh skips this tick's report; the next
    /// tick tries again.
    pub fn tick(&mut self) -> bool {
        let report = match self.sample() {
            Ok(report) => report,
            Err(e) => {
                self.errors.record("Sample", &format!("{:#}", e));
                return false;
            }
        };

        if let Err(e) = self.surface.show(&report.text()) {
            self.errors.record("Display", &format!("{:#}", e));
            return false;
        }

        self.errors.reset();
        true
    }

    /// Samples once and shows the report, failing on any error.
    pub fn run_once(&mut self) -> Result<()> {
        let report = self.sample()?;
        self.surface.show(&report.text())
    }

    /// Ticks every `interval` until `shutdown` completes, then closes the
    /// source. Ticks never overlap; a slow cycle delays the next tick rather
    /// than queueing extra ones.
    pub async fn run(&mut self, interval: Duration, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.tick();
                }
            }
        }

        self.stop();
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.source.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwsnap_core::{Category, Device, Sensor, SensorKind, Snapshot};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        opened: bool,
        closes: u32,
        refreshes: u32,
    }

    /// Fails every refresh listed in `fail_on` (1-based).
    struct TestSource {
        counters: Rc<RefCell<Counters>>,
        fail_on: Vec<u32>,
    }

    impl HardwareSource for TestSource {
        fn name(&self) -> &str {
            "test"
        }

        fn open(&mut self) -> hwsnap_core::Result<()> {
            self.counters.borrow_mut().opened = true;
            Ok(())
        }

        fn refresh(&mut self) -> hwsnap_core::Result<()> {
            let mut counters = self.counters.borrow_mut();
            counters.refreshes += 1;
            if self.fail_on.contains(&counters.refreshes) {
                return Err(hwsnap_core::Error::NotOpen);
            }
            Ok(())
        }

        fn snapshot(&self) -> Snapshot {
            let refreshes = self.counters.borrow().refreshes;
            Snapshot::new(vec![Device::new(Category::Cpu, "Test CPU").with_sensor(
                Sensor::new("CPU Total", SensorKind::Load, Some(refreshes as f32)),
            )])
        }

        fn close(&mut self) {
            self.counters.borrow_mut().closes += 1;
        }
    }

    struct TestSurface(Rc<RefCell<Vec<String>>>);

    impl Surface for TestSurface {
        fn show(&mut self, text: &str) -> Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn monitor(fail_on: Vec<u32>) -> (Monitor, Rc<RefCell<Counters>>, Rc<RefCell<Vec<String>>>) {
        let counters = Rc::new(RefCell::new(Counters::default()));
        let shown = Rc::new(RefCell::new(Vec::new()));
        let monitor = Monitor::new(
            Box::new(TestSource {
                counters: counters.clone(),
                fail_on,
            }),
            ReportBuilder::default(),
            Box::new(TestSurface(shown.clone())),
        );
        (monitor, counters, shown)
    }

    #[test]
    fn test_tick_shows_report() {
        let (mut monitor, counters, shown) = monitor(vec![]);
        monitor.start().unwrap();
        assert!(counters.borrow().opened);
        assert!(monitor.tick());
        let shown = shown.borrow();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].starts_with("CPU: Test CPU\n"));
        assert!(shown[0].contains("Total CPU Load: 1 %\n"));
        assert!(shown[0].ends_with("RAM: Not found\n"));
    }

    #[test]
    fn test_failed_refresh_skips_tick() {
        let (mut monitor, counters, shown) = monitor(vec![1]);
        monitor.start().unwrap();
        assert!(!monitor.tick());
        assert!(shown.borrow().is_empty());
        assert!(monitor.tick());
        assert_eq!(shown.borrow().len(), 1);
        assert!(shown.borrow()[0].contains("Total CPU Load: 2 %"));
        assert_eq!(counters.borrow().refreshes, 2);
    }

    #[test]
    fn test_run_once_propagates_errors() {
        let (mut monitor, _, shown) = monitor(vec![1]);
        monitor.start().unwrap();
        assert!(monitor.run_once().is_err());
        assert!(monitor.run_once().is_ok());
        assert_eq!(shown.borrow().len(), 1);
    }

    #[test]
    fn test_repeated_errors_are_rate_limited() {
        let mut errors = ErrorLog::new();
        assert!(errors.record("Sample", &"boom"));
        assert!(!errors.record("Sample", &"boom"));
        assert!(!errors.record("Sample", &"boom"));
        assert_eq!(errors.suppressed, 2);

        errors.reset();
        assert_eq!(errors.suppressed, 0);
        assert!(errors.record("Sample", &"boom"));
        assert!(!errors.record("Display", &"boom"));
    }

    #[test]
    fn test_repeated_errors_logged_after_interval() {
        let mut errors = ErrorLog::new();
        assert!(errors.record("Sample", &"boom"));
        assert!(!errors.record("Sample", &"boom"));
        errors.last_logged = Instant::now().checked_sub(ERROR_LOG_INTERVAL);
        assert!(errors.record("Sample", &"boom"));
        assert_eq!(errors.suppressed, 0);
    }

    #[test]
    fn test_failing_ticks_log_once() {
        let (mut monitor, _, shown) = monitor(vec![1, 2, 3]);
        monitor.start().unwrap();
        assert!(!monitor.tick());
        assert!(!monitor.tick());
        assert!(!monitor.tick());
        assert_eq!(monitor.errors.suppressed, 2);
        assert!(monitor.tick());
        assert_eq!(monitor.errors.suppressed, 0);
        assert_eq!(shown.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_run_until_shutdown_then_close() {
        let (mut monitor, counters, shown) = monitor(vec![]);
        monitor.start().unwrap();
        monitor
            .run(
                Duration::from_millis(10),
                tokio::time::sleep(Duration::from_millis(55)),
            )
            .await;
        assert!(!shown.borrow().is_empty());
        assert!(counters.borrow().closes >= 1);
    }

    #[test]
    fn test_drop_closes_source() {
        let (monitor, counters, _) = monitor(vec![]);
        drop(monitor);
        assert_eq!(counters.borrow().closes, 1);
    }
}
