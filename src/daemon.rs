//! Poll scheduler: drives fetch→match→notify cycles on a fixed
//! interval.
//!
//! Cycles never overlap: one task runs them sequentially, and a missed
//! tick is delayed instead of replayed. Within a cycle, subscribers
//! and sources are processed in order; one source's failure never
//! aborts the cycle. No error here is fatal — the loop runs until the
//! process is signaled.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::{interval, MissedTickBehavior};

use crate::app::AppContext;
use crate::dedup::DedupCache;
use crate::matcher;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Seconds between cycle starts (default: 300 = 5 minutes)
    pub interval_secs: u64,
    /// Whether to run a cycle immediately on start
    pub run_on_start: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            run_on_start: true,
        }
    }
}

impl DaemonConfig {
    /// Parse interval string like "30s", "5m", "1h", "1d", or raw seconds
    pub fn parse_interval(s: &str) -> Result<u64, String> {
        let s = s.trim().to_lowercase();

        if let Some(hours) = s.strip_suffix('h') {
            hours
                .parse::<u64>()
                .map(|h| h * 3600)
                .map_err(|_| format!("Invalid hours: {}", hours))
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes
                .parse::<u64>()
                .map(|m| m * 60)
                .map_err(|_| format!("Invalid minutes: {}", minutes))
        } else if let Some(days) = s.strip_suffix('d') {
            days.parse::<u64>()
                .map(|d| d * 86400)
                .map_err(|_| format!("Invalid days: {}", days))
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map_err(|_| format!("Invalid seconds: {}", secs))
        } else {
            s.parse::<u64>()
                .map_err(|_| format!("Invalid interval: {}. Use format like '30s', '5m', '1h'", s))
        }
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Outcome of one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub notified: usize,
    pub errors: usize,
}

/// One full fetch→match→notify pass over all subscribers and sources.
///
/// For each new, unseen entry whose title matches a rule, the notifier
/// is invoked; only on delivery success is the entry dedup-marked and
/// the dedup state persisted, immediately. Entries that match no rule
/// are left unmarked and get re-evaluated next cycle.
pub async fn run_cycle(ctx: &AppContext, dedup: &mut DedupCache) -> CycleStats {
    let mut stats = CycleStats::default();

    let subscribers = match ctx.store.load_subscribers() {
        Ok(subs) => subs,
        Err(e) => {
            tracing::error!(error = %e, "failed to load subscribers, skipping cycle");
            stats.errors += 1;
            return stats;
        }
    };

    for subscriber in &subscribers {
        for source in &subscriber.sources {
            tracing::debug!(url = %source.url, "fetching feed");

            let body = match ctx.fetcher.fetch(&source.url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(url = %source.url, error = %e, "fetch failed, skipping source");
                    stats.errors += 1;
                    continue;
                }
            };

            let entries = match ctx.normalizer.normalize(&body) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(url = %source.url, error = %e, "unparseable feed, skipping source");
                    stats.errors += 1;
                    continue;
                }
            };

            // Snapshot the rules once per source per cycle.
            let rules = source.compiled_rules();

            for entry in &entries {
                if dedup.seen(&entry.id) {
                    continue;
                }

                let Some(matched) = matcher::match_entry(&entry.title, &rules) else {
                    continue;
                };

                match ctx
                    .notifier
                    .deliver(&subscriber.id, &source.url, entry, &matched)
                    .await
                {
                    Ok(()) => {
                        dedup.mark(entry.id.clone());
                        // Persist after every mark so a crash mid-cycle
                        // loses at most the in-flight entry.
                        if let Err(e) = ctx.store.save_dedup(dedup.ids()) {
                            tracing::error!(error = %e, "failed to persist dedup state");
                            stats.errors += 1;
                        }
                        stats.notified += 1;
                        tracing::info!(
                            subscriber = %subscriber.id,
                            title = %entry.title,
                            rule = %matched.rule,
                            "notification delivered"
                        );
                    }
                    Err(e) => {
                        // Not marked seen: retried on the next cycle.
                        tracing::warn!(
                            subscriber = %subscriber.id,
                            title = %entry.title,
                            error = %e,
                            "delivery failed, entry will be retried"
                        );
                        stats.errors += 1;
                    }
                }
            }
        }
    }

    stats
}

/// Daemon runner
pub struct Daemon {
    ctx: Arc<AppContext>,
    config: DaemonConfig,
    running: Arc<AtomicBool>,
}

impl Daemon {
    pub fn new(ctx: Arc<AppContext>, config: DaemonConfig) -> Self {
        Self {
            ctx,
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get the PID file path
    pub fn pid_file_path() -> Option<PathBuf> {
        dirs::runtime_dir()
            .or_else(dirs::cache_dir)
            .map(|d| d.join("feedwatch").join("daemon.pid"))
    }

    /// Check if another daemon is already running
    pub fn is_running() -> bool {
        if let Some(pid_path) = Self::pid_file_path() {
            if pid_path.exists() {
                if let Ok(pid_str) = fs::read_to_string(&pid_path) {
                    if let Ok(pid) = pid_str.trim().parse::<u32>() {
                        return Self::process_exists(pid);
                    }
                }
            }
        }
        false
    }

    #[cfg(unix)]
    fn process_exists(pid: u32) -> bool {
        use std::process::Command;
        Command::new("kill")
            .args(["-0", &pid.to_string()])
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[cfg(windows)]
    fn process_exists(pid: u32) -> bool {
        use std::process::Command;
        Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", pid)])
            .output()
            .map(|o| String::from_utf8_lossy(&o.stdout).contains(&pid.to_string()))
            .unwrap_or(false)
    }

    fn write_pid_file(&self) -> std::io::Result<()> {
        if let Some(pid_path) = Self::pid_file_path() {
            if let Some(parent) = pid_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(&pid_path)?;
            writeln!(file, "{}", std::process::id())?;
        }
        Ok(())
    }

    fn remove_pid_file(&self) {
        if let Some(pid_path) = Self::pid_file_path() {
            let _ = fs::remove_file(pid_path);
        }
    }

    /// Run the daemon until signaled.
    pub async fn run(&self) -> crate::app::Result<()> {
        if Self::is_running() {
            return Err(crate::app::FeedwatchError::Other(
                "Another daemon instance is already running".to_string(),
            ));
        }

        self.write_pid_file().map_err(|e| {
            crate::app::FeedwatchError::Other(format!("Failed to write PID file: {}", e))
        })?;

        let running = self.running.clone();

        #[cfg(unix)]
        {
            let running_clone = running.clone();
            tokio::spawn(async move {
                let mut sigterm =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                        .expect("Failed to set up SIGTERM handler");
                let mut sigint =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
                        .expect("Failed to set up SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
                running_clone.store(false, Ordering::SeqCst);
            });
        }

        #[cfg(windows)]
        {
            let running_clone = running.clone();
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                running_clone.store(false, Ordering::SeqCst);
            });
        }

        tracing::info!(
            interval = %DaemonConfig::format_interval(self.config.interval_secs),
            pid = std::process::id(),
            "feedwatch daemon started"
        );

        // Dedup state is loaded once; from here on this task is the
        // single writer.
        let mut dedup = match self.ctx.store.load_dedup() {
            Ok(ids) => DedupCache::from_ids(ids),
            Err(e) => {
                tracing::error!(error = %e, "failed to load dedup state, starting empty");
                DedupCache::new()
            }
        };
        tracing::info!(seen = dedup.len(), "dedup cache loaded");

        if self.config.run_on_start {
            self.cycle(&mut dedup).await;
        }

        let mut timer = interval(Duration::from_secs(self.config.interval_secs));
        // A cycle longer than the interval must not cause a catch-up
        // burst of back-to-back cycles.
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // first tick fires immediately

        while self.running.load(Ordering::SeqCst) {
            timer.tick().await;

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            self.cycle(&mut dedup).await;
        }

        tracing::info!("daemon shutting down");
        self.remove_pid_file();

        Ok(())
    }

    async fn cycle(&self, dedup: &mut DedupCache) {
        let start = Instant::now();
        let stats = run_cycle(&self.ctx, dedup).await;
        tracing::info!(
            notified = stats.notified,
            errors = stats.errors,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "cycle complete"
        );
    }

    /// Stop the daemon (called externally)
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Stop a running daemon by reading the PID file and sending a signal
pub fn stop_daemon() -> Result<(), String> {
    let pid_path =
        Daemon::pid_file_path().ok_or_else(|| "Could not determine PID file path".to_string())?;

    if !pid_path.exists() {
        return Err("No daemon is running (PID file not found)".to_string());
    }

    let pid_str =
        fs::read_to_string(&pid_path).map_err(|e| format!("Failed to read PID file: {}", e))?;

    let pid: u32 = pid_str
        .trim()
        .parse()
        .map_err(|_| "Invalid PID in PID file".to_string())?;

    #[cfg(unix)]
    {
        use std::process::Command;
        let status = Command::new("kill")
            .args(["-TERM", &pid.to_string()])
            .status()
            .map_err(|e| format!("Failed to send signal: {}", e))?;

        if status.success() {
            let _ = fs::remove_file(&pid_path);
            Ok(())
        } else {
            Err(format!("Failed to stop daemon (PID {})", pid))
        }
    }

    #[cfg(windows)]
    {
        use std::process::Command;
        let status = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .status()
            .map_err(|e| format!("Failed to stop process: {}", e))?;

        if status.success() {
            let _ = fs::remove_file(&pid_path);
            Ok(())
        } else {
            Err(format!("Failed to stop daemon (PID {})", pid))
        }
    }
}

/// Check daemon status
pub fn daemon_status() -> String {
    if let Some(pid_path) = Daemon::pid_file_path() {
        if pid_path.exists() {
            if let Ok(pid_str) = fs::read_to_string(&pid_path) {
                if let Ok(pid) = pid_str.trim().parse::<u32>() {
                    if Daemon::process_exists(pid) {
                        return format!("Daemon is running (PID: {})", pid);
                    } else {
                        return "Daemon is not running (stale PID file)".to_string();
                    }
                }
            }
        }
    }
    "Daemon is not running".to_string()
}
