use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const STATS_INTERVAL_SECS: u64 = 30;
const STATS_FILE: &str = "request_stats.log";

/// Stores statistics about backend requests
#[derive(Default, Clone)]
pub struct RequestStats {
    pub requests_made: usize,
    pub requests_failed: usize,
    pub total_latency_ms: u64,
    pub per_endpoint: BTreeMap<String, usize>,
}

impl RequestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, endpoint: &str, latency: Duration, failed: bool) {
        self.requests_made += 1;
        if failed {
            self.requests_failed += 1;
        }
        self.total_latency_ms += latency.as_millis() as u64;
        *self.per_endpoint.entry(endpoint.to_string()).or_insert(0) += 1;
    }

    pub fn avg_latency_ms(&self) -> u64 {
        if self.requests_made == 0 {
            0
        } else {
            self.total_latency_ms / self.requests_made as u64
        }
    }

    pub fn report(&self) -> String {
        let endpoints = self
            .per_endpoint
            .iter()
            .map(|(endpoint, count)| format!("  {} x{}", endpoint, count))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Request Statistics:\n\
             - Requests made: {}\n\
             - Requests failed: {}\n\
             - Average latency: {}ms\n\
             - Endpoints:\n{}",
            self.requests_made,
            self.requests_failed,
            self.avg_latency_ms(),
            endpoints
        )
    }

    /// Appends the statistics to the stats file
    pub fn log_to_file(&self) {
        if self.requests_made == 0 {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let file_content = format!("\n--- {} ---\n{}\n", timestamp, self.report());

        match OpenOptions::new().append(true).create(true).open(STATS_FILE) {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", file_content) {
                    log::error!("Failed to write to stats file: {}", e);
                }
            }
            Err(e) => log::error!("Failed to open stats file: {}", e),
        }
    }
}

/// Periodically reports request statistics while the app runs
pub struct StatsReporter {
    request_stats: Arc<Mutex<RequestStats>>,
    running: Arc<AtomicBool>,
}

impl StatsReporter {
    pub fn new(request_stats: Arc<Mutex<RequestStats>>, running: Arc<AtomicBool>) -> Self {
        Self {
            request_stats,
            running,
        }
    }

    /// Spawns the periodic reporting task
    pub fn start_periodic_reporting(&self) {
        let request_stats = self.request_stats.clone();
        let running = self.running.clone();

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(STATS_INTERVAL_SECS));
            while running.load(Ordering::Relaxed) {
                interval.tick().await;
                if let Some(stats) = request_stats.try_lock() {
                    if stats.requests_made > 0 {
                        log::info!("{}", stats.report());
                        stats.log_to_file();
                    }
                }
            }
            log::debug!("Stats reporting stopped");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_tracks_counts_and_latency() {
        let mut stats = RequestStats::new();
        stats.record("/api/ideas", Duration::from_millis(100), false);
        stats.record("/api/ideas", Duration::from_millis(300), false);
        stats.record("/api/fonts", Duration::from_millis(200), true);

        assert_eq!(stats.requests_made, 3);
        assert_eq!(stats.requests_failed, 1);
        assert_eq!(stats.avg_latency_ms(), 200);
        assert_eq!(stats.per_endpoint["/api/ideas"], 2);
        assert_eq!(stats.per_endpoint["/api/fonts"], 1);
    }

    #[test]
    fn report_names_every_endpoint() {
        let mut stats = RequestStats::new();
        stats.record("/api/palettes", Duration::from_millis(50), false);
        let report = stats.report();
        assert!(report.contains("Requests made: 1"));
        assert!(report.contains("/api/palettes x1"));
    }

    #[test]
    fn empty_stats_have_zero_average() {
        assert_eq!(RequestStats::new().avg_latency_ms(), 0);
    }
}
