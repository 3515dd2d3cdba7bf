//! Thread-safe metrics collection system
//!
//! Atomic counters for connections, frames and turns, plus mutex-protected
//! collections for routing outcomes and turn latency.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Number of most recent turn latencies kept for statistics
const LATENCY_WINDOW: usize = 1000;

/// Routing outcomes always present in snapshots, even at zero
const ROUTE_OUTCOMES: [&str; 4] = ["direct", "exercise", "diet", "myth"];

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

/// Thread-safe metrics collector using atomics and mutexes
pub struct MetricsCollector {
    // Connection metrics
    connections_opened: AtomicU64,
    connections_active: AtomicU64,

    // Frame metrics
    frames_received: AtomicU64,
    frames_rejected: AtomicU64,

    // Turn metrics
    turns_completed: AtomicU64,
    turns_failed: AtomicU64,
    turns_cancelled: AtomicU64,
    turn_latencies: Mutex<Vec<u64>>, // in milliseconds

    routes: Mutex<BTreeMap<String, u64>>,

    uptime_start: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            connections_opened: AtomicU64::new(0),
            connections_active: AtomicU64::new(0),
            frames_received: AtomicU64::new(0),
            frames_rejected: AtomicU64::new(0),
            turns_completed: AtomicU64::new(0),
            turns_failed: AtomicU64::new(0),
            turns_cancelled: AtomicU64::new(0),
            turn_latencies: Mutex::new(Vec::new()),
            routes: Mutex::new(Self::empty_routes()),
            uptime_start: AtomicU64::new(current_timestamp()),
        }
    }

    fn empty_routes() -> BTreeMap<String, u64> {
        ROUTE_OUTCOMES
            .iter()
            .map(|outcome| (outcome.to_string(), 0))
            .collect()
    }

    // Connection metrics
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        // Saturating so a stray close after reset cannot wrap around
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    pub fn active_connections(&self) -> u64 {
        self.connections_active.load(Ordering::Relaxed)
    }

    // Frame metrics
    pub fn frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frame_rejected(&self) {
        self.frames_rejected.fetch_add(1, Ordering::Relaxed);
    }

    // Turn metrics
    pub fn turn_completed(&self, outcome: &str, duration: Duration) {
        self.turns_completed.fetch_add(1, Ordering::Relaxed);
        self.record_latency(duration);

        if let Ok(mut routes) = self.routes.lock() {
            *routes.entry(outcome.to_string()).or_insert(0) += 1;
        }
    }

    pub fn turn_failed(&self, duration: Duration) {
        self.turns_failed.fetch_add(1, Ordering::Relaxed);
        self.record_latency(duration);
    }

    pub fn turn_cancelled(&self) {
        self.turns_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    fn record_latency(&self, duration: Duration) {
        if let Ok(mut times) = self.turn_latencies.lock() {
            times.push(duration.as_millis() as u64);

            if times.len() > LATENCY_WINDOW {
                times.remove(0);
            }
        }
    }

    // Reset all metrics (useful for testing)
    pub fn reset(&self) {
        self.connections_opened.store(0, Ordering::Relaxed);
        self.connections_active.store(0, Ordering::Relaxed);
        self.frames_received.store(0, Ordering::Relaxed);
        self.frames_rejected.store(0, Ordering::Relaxed);
        self.turns_completed.store(0, Ordering::Relaxed);
        self.turns_failed.store(0, Ordering::Relaxed);
        self.turns_cancelled.store(0, Ordering::Relaxed);
        self.uptime_start
            .store(current_timestamp(), Ordering::Relaxed);

        if let Ok(mut times) = self.turn_latencies.lock() {
            times.clear();
        }
        if let Ok(mut routes) = self.routes.lock() {
            *routes = Self::empty_routes();
        }
    }

    /// Calculate latency statistics (avg, p50, p95)
    fn latency_statistics(&self) -> (f64, f64, f64) {
        let Ok(times) = self.turn_latencies.lock() else {
            return (0.0, 0.0, 0.0);
        };
        if times.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let mut sorted = times.clone();
        sorted.sort_unstable();

        let avg = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;
        (avg, percentile(&sorted, 50.0), percentile(&sorted, 95.0))
    }

    pub fn uptime_seconds(&self) -> u64 {
        current_timestamp().saturating_sub(self.uptime_start.load(Ordering::Relaxed))
    }

    /// Get complete metrics snapshot
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let (avg_latency_ms, latency_p50_ms, latency_p95_ms) = self.latency_statistics();
        let routes = self
            .routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default();

        MetricsSnapshot {
            connections: ConnectionMetrics {
                opened: self.connections_opened.load(Ordering::Relaxed),
                active: self.connections_active.load(Ordering::Relaxed),
            },
            frames: FrameMetrics {
                received: self.frames_received.load(Ordering::Relaxed),
                rejected: self.frames_rejected.load(Ordering::Relaxed),
            },
            turns: TurnMetrics {
                completed: self.turns_completed.load(Ordering::Relaxed),
                failed: self.turns_failed.load(Ordering::Relaxed),
                cancelled: self.turns_cancelled.load(Ordering::Relaxed),
                avg_latency_ms,
                latency_p50_ms,
                latency_p95_ms,
            },
            routes,
            uptime_seconds: self.uptime_seconds(),
            timestamp: current_timestamp(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// Public metrics structures
#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub connections: ConnectionMetrics,
    pub frames: FrameMetrics,
    pub turns: TurnMetrics,
    pub routes: BTreeMap<String, u64>,
    pub uptime_seconds: u64,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct ConnectionMetrics {
    pub opened: u64,
    pub active: u64,
}

#[derive(Debug, Serialize)]
pub struct FrameMetrics {
    pub received: u64,
    pub rejected: u64,
}

#[derive(Debug, Serialize)]
pub struct TurnMetrics {
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub avg_latency_ms: f64,
    pub latency_p50_ms: f64,
    pub latency_p95_ms: f64,
}

// Helper functions
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn percentile(sorted_data: &[u64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let len = sorted_data.len();
    let index = (percentile / 100.0) * (len - 1) as f64;

    if index.fract() == 0.0 {
        sorted_data[index as usize] as f64
    } else {
        let lower_value = sorted_data[index.floor() as usize] as f64;
        let upper_value = sorted_data[index.ceil() as usize] as f64;

        lower_value + (upper_value - lower_value) * index.fract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_connection_metrics() {
        let collector = MetricsCollector::new();

        collector.connection_opened();
        collector.connection_opened();
        collector.connection_closed();

        let snapshot = collector.get_metrics();
        assert_eq!(snapshot.connections.opened, 2);
        assert_eq!(snapshot.connections.active, 1);
    }

    #[test]
    fn test_active_connections_never_underflow() {
        let collector = MetricsCollector::new();
        collector.connection_closed();
        assert_eq!(collector.active_connections(), 0);
    }

    #[test]
    fn test_turn_metrics_and_routes() {
        let collector = MetricsCollector::new();

        collector.frame_received();
        collector.turn_completed("exercise", Duration::from_millis(1500));
        collector.frame_received();
        collector.turn_completed("direct", Duration::from_millis(500));
        collector.frame_received();
        collector.turn_failed(Duration::from_millis(100));

        let snapshot = collector.get_metrics();
        assert_eq!(snapshot.frames.received, 3);
        assert_eq!(snapshot.turns.completed, 2);
        assert_eq!(snapshot.turns.failed, 1);
        assert_eq!(snapshot.routes["exercise"], 1);
        assert_eq!(snapshot.routes["direct"], 1);
        assert_eq!(snapshot.routes["diet"], 0);
        assert_eq!(snapshot.routes["myth"], 0);
        assert!(snapshot.turns.avg_latency_ms > 600.0);
    }

    #[test]
    fn test_thread_safety() {
        let collector = Arc::new(MetricsCollector::new());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let collector = Arc::clone(&collector);
                thread::spawn(move || {
                    for _ in 0..100 {
                        collector.frame_received();
                        collector.turn_completed("diet", Duration::from_millis(1));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = collector.get_metrics();
        assert_eq!(snapshot.frames.received, 1000);
        assert_eq!(snapshot.routes["diet"], 1000);
    }

    #[test]
    fn test_percentile_calculation() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        assert!((percentile(&data, 50.0) - 5.5).abs() < 0.1);
        assert!((percentile(&data, 95.0) - 9.5).abs() < 0.1);
        assert!((percentile(&data, 0.0) - 1.0).abs() < 0.1);
        assert!((percentile(&data, 100.0) - 10.0).abs() < 0.1);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_latency_window_is_bounded() {
        let collector = MetricsCollector::new();

        for i in 0..1500 {
            collector.turn_completed("direct", Duration::from_millis(i));
        }

        assert_eq!(collector.turn_latencies.lock().unwrap().len(), LATENCY_WINDOW);
        // Only the last 1000 (500..1500) remain
        let snapshot = collector.get_metrics();
        assert!((snapshot.turns.avg_latency_ms - 999.5).abs() < 0.1);
    }

    #[test]
    fn test_reset_functionality() {
        let collector = MetricsCollector::new();

        collector.connection_opened();
        collector.frame_rejected();
        collector.turn_completed("myth", Duration::from_millis(10));
        collector.turn_cancelled();

        collector.reset();

        let snapshot = collector.get_metrics();
        assert_eq!(snapshot.connections.opened, 0);
        assert_eq!(snapshot.frames.rejected, 0);
        assert_eq!(snapshot.turns.completed, 0);
        assert_eq!(snapshot.turns.cancelled, 0);
        assert_eq!(snapshot.routes["myth"], 0);
        assert_eq!(snapshot.turns.avg_latency_ms, 0.0);
    }
}
