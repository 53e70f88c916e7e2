use std::sync::Mutex;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::debug;

/// Source of the process' resident memory, sampled between phases.
pub trait MemorySampler: Send + Sync {
    fn resident_bytes(&self) -> Option<u64>;
}

/// Samples the current process through `sysinfo`.
#[derive(Debug)]
pub struct SysinfoSampler {
    pid: Option<Pid>,
    system: Mutex<System>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        Self {
            pid: sysinfo::get_current_pid().ok(),
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
    fn resident_bytes(&self) -> Option<u64> {
        let pid = self.pid?;
        // the guarded System holds no invariant a panic could break
        let mut system = self.system.lock().unwrap_or_else(|poisoned| {
            debug!("memory sampler lock was poisoned, reusing it");
            poisoned.into_inner()
        });
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).map(|process| process.memory())
    }
}

/// Reports no memory figure at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMemorySampler;

impl MemorySampler for NoMemorySampler {
    fn resident_bytes(&self) -> Option<u64> {
        None
    }
}
