//! Wall-clock timings of the simulation phases.
//!
//! Phases open a [`ScopeTimer`] through [`profile_scope!`]. With the `profiling`
//! feature the timer reports into the global [`crate::PROFILER`] when it goes out
//! of scope; without it the macro expands to nothing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulated timings of one named phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseStats {
    pub total: Duration,
    pub calls: u32,
    pub slowest: Duration,
}

impl PhaseStats {
    fn record(&mut self, elapsed: Duration) {
        self.total += elapsed;
        self.calls += 1;
        self.slowest = self.slowest.max(elapsed);
    }

    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.total / self.calls
        }
    }
}

#[derive(Debug, Default)]
pub struct Profiler {
    phases: HashMap<&'static str, PhaseStats>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, phase: &'static str, elapsed: Duration) {
        self.phases.entry(phase).or_default().record(elapsed);
    }

    pub fn phase(&self, phase: &str) -> Option<PhaseStats> {
        self.phases.get(phase).copied()
    }

    /// Phases with the most total time first; ties broken by name.
    pub fn phases_by_cost(&self) -> Vec<(&'static str, PhaseStats)> {
        let mut phases: Vec<_> = self.phases.iter().map(|(name, stats)| (*name, *stats)).collect();
        phases.sort_by(|a, b| b.1.total.cmp(&a.1.total).then(a.0.cmp(b.0)));
        phases
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Log one debug line per phase, then start a fresh window.
    pub fn log_and_reset(&mut self) {
        for (name, stats) in self.phases_by_cost() {
            log::debug!(
                "{name}: {:?} total, {:?} mean, {:?} slowest, {} calls",
                stats.total,
                stats.mean(),
                stats.slowest,
                stats.calls
            );
        }
        self.phases.clear();
    }
}

/// Measures one phase from construction to drop.
pub struct ScopeTimer {
    phase: &'static str,
    started: Instant,
}

impl ScopeTimer {
    pub fn new(phase: &'static str) -> Self {
        Self { phase, started: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop early and record into `profiler` instead of the global one.
    pub fn stop(self, profiler: &mut Profiler) {
        profiler.record(self.phase, self.elapsed());
        std::mem::forget(self);
    }
}

#[cfg(feature = "profiling")]
impl Drop for ScopeTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        crate::PROFILER.lock().record(self.phase, elapsed);
    }
}

/// Time the rest of the enclosing scope under `$phase` when `profiling` is on.
#[macro_export]
macro_rules! profile_scope {
    ($phase:expr) => {
        #[cfg(feature = "profiling")]
        let _phase_timer = $crate::profiler::ScopeTimer::new($phase);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_accumulate_mean_and_slowest() {
        let mut profiler = Profiler::new();
        profiler.record("integrate", Duration::from_millis(2));
        profiler.record("integrate", Duration::from_millis(6));
        profiler.record("forces_compute_all", Duration::from_millis(20));

        let integrate = profiler.phase("integrate").unwrap();
        assert_eq!(integrate.calls, 2);
        assert_eq!(integrate.total, Duration::from_millis(8));
        assert_eq!(integrate.mean(), Duration::from_millis(4));
        assert_eq!(integrate.slowest, Duration::from_millis(6));
        assert_eq!(PhaseStats::default().mean(), Duration::ZERO);

        let order: Vec<_> = profiler.phases_by_cost().into_iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["forces_compute_all", "integrate"]);

        profiler.log_and_reset();
        assert!(profiler.is_empty());
    }

    #[test]
    fn stopped_timer_records_locally() {
        let mut profiler = Profiler::new();
        let timer = ScopeTimer::new("save_level");
        std::thread::sleep(Duration::from_millis(2));
        timer.stop(&mut profiler);
        let stats = profiler.phase("save_level").unwrap();
        assert_eq!(stats.calls, 1);
        assert!(stats.total >= Duration::from_millis(2));
    }
}
