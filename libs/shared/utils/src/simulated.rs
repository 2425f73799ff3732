use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Simulated operation timed out after {timeout_ms} ms")]
    TimedOut { timeout_ms: u64 },
}

/// A fixed simulated latency standing in for a real backend call, bounded by
/// a hard timeout so a real call can be swapped in without changing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub delay: Duration,
    pub timeout: Duration,
}

impl SimulatedLatency {
    pub fn new(delay: Duration, timeout: Duration) -> Self {
        Self { delay, timeout }
    }

    /// Wait for the delay, then run `operation`. The whole thing fails with
    /// `TimedOut` if it exceeds the timeout.
    pub async fn run<T, Fut>(&self, operation: Fut) -> Result<T, SimulationError>
    where
        Fut: Future<Output = T>,
    {
        let delay = self.delay;
        debug!("Running simulated operation with {:?} latency", delay);

        timeout(self.timeout, async move {
            sleep(delay).await;
            operation.await
        })
        .await
        .map_err(|_| {
            let timeout_ms = self.timeout.as_millis() as u64;
            warn!("Simulated operation exceeded {} ms", timeout_ms);
            SimulationError::TimedOut { timeout_ms }
        })
    }
}

/// Handle to a spawned simulated operation. Dropping it aborts the task, so a
/// view that goes away never receives a late write.
#[derive(Debug)]
pub struct PendingTask {
    handle: JoinHandle<()>,
}

impl PendingTask {
    pub fn spawn<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for PendingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
