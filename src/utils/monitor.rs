#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct SystemStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed_time: Duration,
}

/// 取樣目前行程的 CPU 與記憶體；停用時只計時
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    // (system, peak memory in MB)
    state: Option<Mutex<(System, u64)>>,
    pid: Option<Pid>,
    start_time: Instant,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let (state, pid) = if enabled {
            let mut system = System::new_with_specifics(RefreshKind::everything());
            system.refresh_all();
            match sysinfo::get_current_pid() {
                Ok(pid) => (Some(Mutex::new((system, 0))), Some(pid)),
                Err(e) => {
                    tracing::warn!("System monitoring unavailable: {}", e);
                    (None, None)
                }
            }
        } else {
            (None, None)
        };

        Self {
            state,
            pid,
            start_time: Instant::now(),
        }
    }

    pub fn get_stats(&self) -> Option<SystemStats> {
        let state = self.state.as_ref()?;
        let pid = self.pid?;
        let mut guard = state.lock().ok()?;
        let (system, peak) = &mut *guard;
        system.refresh_all();

        let process = system.process(pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        if memory_mb > *peak {
            *peak = memory_mb;
        }

        Some(SystemStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: *peak,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }
}

#[cfg(not(feature = "cli"))]
pub struct SystemMonitor {
    start_time: Instant,
}

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn get_stats(&self) -> Option<SystemStats> {
        None
    }

    pub fn is_enabled(&self) -> bool {
        false
    }
}

impl SystemMonitor {
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.peak_memory_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        match self.get_stats() {
            Some(stats) => tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed_time,
                stats.peak_memory_mb
            ),
            None => tracing::debug!("Finished in {:?}", self.elapsed()),
        }
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = SystemMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert!(monitor.get_stats().is_none());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_enabled_monitor_tracks_peak_memory() {
        let monitor = SystemMonitor::new(true);
        if let Some(first) = monitor.get_stats() {
            let second = monitor.get_stats().expect("stats while enabled");
            assert!(second.peak_memory_mb >= first.memory_usage_mb);
        }
    }
}
