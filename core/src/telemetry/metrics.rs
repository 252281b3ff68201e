use serde::Serialize;
use std::sync::Mutex;

/// Counters for the alert loop, shared between the engine and its periodic task.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

/// Point-in-time copy of the recorded counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub ticks: usize,
    pub tick_failures: usize,
    pub alerts_raised: usize,
    pub alerts_cleared: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ticks += 1;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.tick_failures += 1;
        }
    }

    pub fn record_raised(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.alerts_raised += count;
        }
    }

    pub fn record_cleared(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.alerts_cleared += count;
        }
    }

    pub fn snapshot(&self) -> Metrics {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_accumulates_counts() {
        let recorder = MetricsRecorder::new();
        recorder.record_tick();
        recorder.record_tick();
        recorder.record_failure();
        recorder.record_raised(3);
        recorder.record_cleared(2);

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.ticks, 2);
        assert_eq!(snapshot.tick_failures, 1);
        assert_eq!(snapshot.alerts_raised, 3);
        assert_eq!(snapshot.alerts_cleared, 2);
    }
}
