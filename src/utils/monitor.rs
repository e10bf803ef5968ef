#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Resource usage observed at the end of one pass phase.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    /// Time since the previous phase ended (or since the pass started).
    pub phase_time: Duration,
    pub total_time: Duration,
}

#[cfg(feature = "cli")]
struct Checkpoint {
    last_phase_end: Instant,
    peak_memory_mb: u64,
}

/// Per-phase CPU, memory and timing for one extraction pass.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    started: Instant,
    checkpoint: Mutex<Checkpoint>,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                if enabled {
                    tracing::warn!("System monitoring unavailable: {}", e);
                }
                None
            }
        };

        let started = Instant::now();
        Self {
            system: Mutex::new(System::new()),
            pid,
            started,
            checkpoint: Mutex::new(Checkpoint {
                last_phase_end: started,
                peak_memory_mb: 0,
            }),
            enabled: enabled && pid.is_some(),
        }
    }

    /// 只更新本行程的資訊
    fn sample(&self) -> Option<(f32, u64)> {
        let pid = self.pid?;
        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        let process = system.process(pid)?;
        Some((process.cpu_usage(), process.memory() / 1024 / 1024))
    }

    /// Close a phase and return its stats. `None` when monitoring is off
    /// or the process could not be sampled.
    pub fn end_phase(&self, phase: &str) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }

        let (cpu_usage, memory_mb) = self.sample()?;
        let now = Instant::now();
        let mut checkpoint = self.checkpoint.lock().ok()?;
        let phase_time = now.duration_since(checkpoint.last_phase_end);
        checkpoint.last_phase_end = now;
        checkpoint.peak_memory_mb = checkpoint.peak_memory_mb.max(memory_mb);

        Some(PhaseStats {
            phase: phase.to_string(),
            cpu_usage,
            memory_usage_mb: memory_mb,
            peak_memory_mb: checkpoint.peak_memory_mb,
            phase_time,
            total_time: now.duration_since(self.started),
        })
    }

    /// Log a finished phase together with what it produced, e.g.
    /// `"120 rows x 4 columns"`.
    pub fn log_phase(&self, phase: &str, produced: &str) {
        if let Some(stats) = self.end_phase(phase) {
            tracing::info!(
                "📊 {} ({}) - took {:?}, CPU: {:.1}%, Memory: {}MB, Peak: {}MB",
                stats.phase,
                produced,
                stats.phase_time,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb
            );
        }
    }

    pub fn log_pass_complete(&self, files_written: usize) {
        if !self.enabled {
            return;
        }
        let peak = self
            .checkpoint
            .lock()
            .map(|c| c.peak_memory_mb)
            .unwrap_or_default();
        tracing::info!(
            "📊 Pass complete - {} files written, Total Time: {:?}, Peak Memory: {}MB",
            files_written,
            self.started.elapsed(),
            peak
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 建置時不收集系統資訊
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str, _produced: &str) {}

    pub fn log_pass_complete(&self, _files_written: usize) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
