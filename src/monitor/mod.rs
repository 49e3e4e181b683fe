//! Process memory monitoring
//!
//! The batch scheduler samples resident memory before and after every wave
//! and once more at the end of a run. The monitor keeps the peak seen so far.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use sysinfo::{Pid, System};

const MIB: u64 = 1024 * 1024;

/// Source of resident-memory readings
pub trait MemorySampler: Send + Sync {
    /// Current resident set size of the process, in bytes
    fn resident_bytes(&self) -> u64;
}

/// Reads the resident memory of the current process through `sysinfo`
pub struct SysinfoSampler {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("Memory sampling unavailable: {}", e);
                None
            }
        };

        Self {
            pid,
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySampler for SysinfoSampler {
    fn resident_bytes(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };

        let mut system = match self.system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if !system.refresh_process(pid) {
            return 0;
        }

        system.process(pid).map(|p| p.memory()).unwrap_or(0)
    }
}

/// A point-in-time memory reading together with the peak so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySample {
    /// Resident memory at sampling time, in bytes
    pub current_bytes: u64,

    /// Highest resident memory observed by this monitor, in bytes
    pub peak_bytes: u64,
}

impl MemorySample {
    pub fn current_mib(&self) -> u64 {
        self.current_bytes / MIB
    }

    pub fn peak_mib(&self) -> u64 {
        self.peak_bytes / MIB
    }
}

impl fmt::Display for MemorySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Current Memory: {} MB, Peak: {} MB",
            self.current_mib(),
            self.peak_mib()
        )
    }
}

/// Samples process memory on demand and tracks a monotonic peak
///
/// The peak is updated with an atomic max, so concurrent callers never lose
/// an update.
pub struct ResourceMonitor {
    sampler: Box<dyn MemorySampler>,
    peak: AtomicU64,
}

impl ResourceMonitor {
    /// Creates a monitor reading the current process through `sysinfo`
    pub fn new() -> Self {
        Self::with_sampler(Box::new(SysinfoSampler::new()))
    }

    /// Creates a monitor reading from a custom sampler
    pub fn with_sampler(sampler: Box<dyn MemorySampler>) -> Self {
        Self {
            sampler,
            peak: AtomicU64::new(0),
        }
    }

    /// Takes one reading and folds it into the peak
    pub fn sample(&self) -> MemorySample {
        let current_bytes = self.sampler.resident_bytes();
        let previous = self.peak.fetch_max(current_bytes, Ordering::AcqRel);

        MemorySample {
            current_bytes,
            peak_bytes: previous.max(current_bytes),
        }
    }

    /// Peak observed so far, without taking a new reading
    pub fn peak(&self) -> u64 {
        self.peak.load(Ordering::Acquire)
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
