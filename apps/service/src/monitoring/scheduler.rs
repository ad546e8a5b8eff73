use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::prober::EndpointProber;
use crate::database::{EndpointRegistry, ResultSink};

/// Periodic check scheduler.
///
/// One long-lived task owns the loop: every tick it snapshots the registered
/// endpoints, probes them all concurrently, and persists each result as it
/// completes. Cycles never overlap: the loop awaits cycle completion before
/// waiting for the next tick, and missed ticks are skipped rather than
/// stacked, so a cycle that outruns the interval delays the next cycle
/// instead of spawning a concurrent one. This is also what keeps each
/// endpoint's persisted results in timestamp order.
pub struct CheckScheduler {
    registry: Arc<dyn EndpointRegistry>,
    sink: Arc<dyn ResultSink>,
    prober: Arc<EndpointProber>,
    interval: Duration,
}

impl CheckScheduler {
    pub fn new(
        registry: Arc<dyn EndpointRegistry>,
        sink: Arc<dyn ResultSink>,
        prober: Arc<EndpointProber>,
        interval: Duration,
    ) -> Self {
        Self { registry, sink, prober, interval }
    }

    /// Start the scheduling loop as an owned background task.
    ///
    /// The task runs until `cancel` fires. A cancellation observed while a
    /// cycle is in flight lets the cycle drain: every dispatched probe still
    /// produces and persists its result before the task exits.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = self.interval.as_secs(), "check scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("check scheduler stopping");
                    break;
                }
                _ = timer.tick() => {}
            }

            self.run_cycle().await;
        }
    }

    /// Run one full cycle: snapshot endpoints, fan out one probe per
    /// endpoint, persist every result. Returns the number of results
    /// persisted.
    ///
    /// A registry read failure abandons only this cycle; the next tick
    /// retries. A sink failure loses that one result, logged as a warning,
    /// and the cycle carries on.
    pub async fn run_cycle(&self) -> usize {
        let endpoints = match self.registry.list_endpoints().await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                error!(error = %e, "failed to load endpoints, skipping cycle");
                return 0;
            }
        };

        if endpoints.is_empty() {
            debug!("no endpoints registered, nothing to check");
            return 0;
        }

        debug!(count = endpoints.len(), "starting check cycle");

        // Probes are independent: each task owns its endpoint snapshot and
        // shares nothing mutable with its siblings.
        let mut probes = JoinSet::new();
        for endpoint in endpoints {
            let prober = Arc::clone(&self.prober);
            probes.spawn(async move { prober.probe(&endpoint).await });
        }

        let mut persisted = 0;
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(result) => {
                    debug!(
                        endpoint = %result.endpoint_uuid,
                        outcome = %result.outcome,
                        "probe finished"
                    );
                    match self.sink.append(&result).await {
                        Ok(_) => persisted += 1,
                        Err(e) => warn!(
                            endpoint = %result.endpoint_uuid,
                            error = %e,
                            "failed to persist check result"
                        ),
                    }
                }
                Err(e) => error!(error = %e, "probe task aborted"),
            }
        }

        debug!(persisted, "check cycle finished");
        persisted
    }
}
