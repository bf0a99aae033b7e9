use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<SearchMetrics>,
}

/// Counters exposed by the driver and the HTTP bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchMetrics {
    pub completed: usize,
    pub failed: usize,
    pub airports_returned: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SearchMetrics::default()),
        }
    }

    pub fn record_search(&self, airports: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.completed += 1;
            metrics.airports_returned += airports;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn snapshot(&self) -> SearchMetrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
