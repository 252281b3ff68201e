use crate::prelude::EngineResult;
use crate::telemetry::{LogManager, MetricsRecorder};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a loop that runs a pass, waits `period`, and runs it again.
///
/// The next pass is only scheduled once the previous one has returned, so
/// passes never overlap. A pass that fails or panics is logged and counted;
/// the loop carries on. Must be spawned from within a tokio runtime.
pub struct PeriodicTask {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    metrics: Arc<MetricsRecorder>,
}

impl PeriodicTask {
    pub fn spawn<F>(
        name: &'static str,
        initial_delay: Duration,
        period: Duration,
        metrics: Arc<MetricsRecorder>,
        mut pass: F,
    ) -> Self
    where
        F: FnMut() -> EngineResult<()> + Send + 'static,
    {
        let (shutdown, mut stop) = watch::channel(false);
        let task_metrics = Arc::clone(&metrics);

        let handle = tokio::spawn(async move {
            let logger = LogManager::new(name);
            if stopped_during(&mut stop, initial_delay).await {
                return;
            }
            loop {
                task_metrics.record_tick();
                match panic::catch_unwind(AssertUnwindSafe(&mut pass)) {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        task_metrics.record_failure();
                        logger.error(&format!("pass failed: {}", err));
                    }
                    Err(_) => {
                        task_metrics.record_failure();
                        logger.error("pass panicked");
                    }
                }
                if stopped_during(&mut stop, period).await {
                    break;
                }
            }
            logger.trace("stopped");
        });

        Self {
            name,
            shutdown,
            handle: Some(handle),
            metrics,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        Arc::clone(&self.metrics)
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Signals the loop and waits for the pass in flight, if any, to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.shutdown.send(true);
            handle.abort();
        }
    }
}

async fn stopped_during(stop: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    if *stop.borrow() {
        return true;
    }
    let signalled = tokio::select! {
        _ = tokio::time::sleep(delay) => false,
        _ = stop.changed() => true,
    };
    signalled || *stop.borrow()
}
