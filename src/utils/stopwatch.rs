// ============================================================================
// Stopwatch
// Wall-clock and CPU-time budgets for a running simulation
// ============================================================================
//
// Modeled after a stopwatch with start/stop/reset buttons: time accumulates
// only while the clock runs, so pauses in an interactive run do not count
// against the limits.
//
// # Usage
//
// ```ignore
// let mut watch = Stopwatch::new();
// watch.set_real_time_limit(60.0);
// watch.reset_clock();
// watch.start_clock();
// loop {
//     // ... process a batch of events ...
//     watch.check_time_limits()?;   // Err ends the run
// }
// ```
// ============================================================================

use crate::numeric::{TimeError, TimeResult};
use std::time::{Duration, Instant};

/// Tracks elapsed wall-clock time and process CPU time against optional limits.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    real_time_limit: f64,
    cpu_time_limit: f64,
    clock_running: bool,

    elapsed_real: Duration,
    last_instant: Instant,

    elapsed_cpu: Duration,
    last_cpu: Duration,
}

impl Stopwatch {
    /// A stopped stopwatch with no limits.
    pub fn new() -> Self {
        Self {
            real_time_limit: -1.0,
            cpu_time_limit: -1.0,
            clock_running: false,
            elapsed_real: Duration::ZERO,
            last_instant: Instant::now(),
            elapsed_cpu: Duration::ZERO,
            last_cpu: process_cpu_time(),
        }
    }

    /// Set the wall-clock limit in seconds; a negative value clears it.
    pub fn set_real_time_limit(&mut self, seconds: f64) {
        self.real_time_limit = if seconds < 0.0 { -1.0 } else { seconds };
    }

    /// Wall-clock limit in seconds, negative when unset.
    pub fn real_time_limit(&self) -> f64 {
        self.real_time_limit
    }

    /// Set the CPU-time limit in seconds; a negative value clears it.
    pub fn set_cpu_time_limit(&mut self, seconds: f64) {
        self.cpu_time_limit = if seconds < 0.0 { -1.0 } else { seconds };
    }

    /// CPU-time limit in seconds, negative when unset.
    pub fn cpu_time_limit(&self) -> f64 {
        self.cpu_time_limit
    }

    pub fn reset_real_time_usage(&mut self) {
        self.add_real_time_delta();
        self.elapsed_real = Duration::ZERO;
    }

    pub fn reset_cpu_time_usage(&mut self) {
        self.add_cpu_time_delta();
        self.elapsed_cpu = Duration::ZERO;
    }

    /// Drop all limits and accumulated time, and stop the clock.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Zero the accumulated time; call on network setup.
    pub fn reset_clock(&mut self) {
        self.elapsed_real = Duration::ZERO;
        self.elapsed_cpu = Duration::ZERO;
        self.last_instant = Instant::now();
        self.last_cpu = process_cpu_time();
    }

    /// Start accumulating; call when the simulation starts or resumes.
    pub fn start_clock(&mut self) {
        if self.clock_running {
            return;
        }
        self.last_instant = Instant::now();
        self.last_cpu = process_cpu_time();
        self.clock_running = true;
    }

    /// Stop accumulating; call when the simulation pauses or terminates.
    pub fn stop_clock(&mut self) {
        if !self.clock_running {
            return;
        }
        self.add_real_time_delta();
        self.add_cpu_time_delta();
        self.clock_running = false;
    }

    pub fn is_running(&self) -> bool {
        self.clock_running
    }

    pub fn has_time_limits(&self) -> bool {
        self.real_time_limit >= 0.0 || self.cpu_time_limit >= 0.0
    }

    /// Check the limits; call every few events.
    ///
    /// # Errors
    /// `RealTimeLimitExceeded` or `CpuTimeLimitExceeded` once a limit has
    /// been passed. The caller is expected to end the run.
    pub fn check_time_limits(&mut self) -> TimeResult<()> {
        if !self.has_time_limits() {
            return Ok(());
        }
        if self.real_time_limit >= 0.0 && self.elapsed_secs() > self.real_time_limit {
            tracing::warn!(limit_secs = self.real_time_limit, "real time limit reached");
            return Err(TimeError::RealTimeLimitExceeded {
                limit_secs: self.real_time_limit,
            });
        }
        if self.cpu_time_limit >= 0.0 && self.cpu_usage_secs() > self.cpu_time_limit {
            tracing::warn!(limit_secs = self.cpu_time_limit, "CPU time limit reached");
            return Err(TimeError::CpuTimeLimitExceeded {
                limit_secs: self.cpu_time_limit,
            });
        }
        Ok(())
    }

    /// Wall-clock seconds accumulated while running.
    pub fn elapsed_secs(&mut self) -> f64 {
        self.add_real_time_delta();
        self.elapsed_real.as_secs_f64()
    }

    /// CPU seconds accumulated while running.
    pub fn cpu_usage_secs(&mut self) -> f64 {
        self.add_cpu_time_delta();
        self.elapsed_cpu.as_secs_f64()
    }

    fn add_real_time_delta(&mut self) {
        if self.clock_running {
            let now = Instant::now();
            self.elapsed_real += now.duration_since(self.last_instant);
            self.last_instant = now;
        }
    }

    fn add_cpu_time_delta(&mut self) {
        if self.clock_running {
            let now = process_cpu_time();
            self.elapsed_cpu += now.saturating_sub(self.last_cpu);
            self.last_cpu = now;
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// CPU time consumed by this process so far.
#[cfg(unix)]
fn process_cpu_time() -> Duration {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
    if rc != 0 {
        return Duration::ZERO;
    }
    Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
}

#[cfg(not(unix))]
fn process_cpu_time() -> Duration {
    Duration::ZERO
}
