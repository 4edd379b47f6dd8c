/// Periodic fan-out/fan-in collection of subject samples
///
/// Each tick enumerates the subjects of a source, fetches every subject
/// concurrently, and hands the aggregated snapshot to the metric bus.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::core::aggregate::aggregate;
use crate::core::bus::BusSender;
use crate::core::error::{MonitorError, MonitorResult, SourceError};
use crate::core::sample::{Sample, Snapshot};
use crate::core::source::SubjectSource;

/// Tick period for a given display refresh rate: 4/5 of it, so a snapshot is
/// ready before the display timer fires.
pub fn tick_interval(refresh_rate: Duration) -> Duration {
    (refresh_rate * 4 / 5).max(Duration::from_millis(1))
}

/// Number of logical cores used to normalize total CPU
pub fn logical_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

pub struct Collector<S> {
    source: S,
    interval: Duration,
    core_count: usize,
    max_concurrency: Option<usize>,
}

impl<S: SubjectSource> Collector<S> {
    /// Collector ticking at 4/5 of `refresh_rate`
    pub fn new(source: S, refresh_rate: Duration) -> Self {
        Self {
            source,
            interval: tick_interval(refresh_rate),
            core_count: logical_cores(),
            max_concurrency: None,
        }
    }

    pub fn with_core_count(mut self, core_count: usize) -> Self {
        self.core_count = core_count.max(1);
        self
    }

    /// Cap on in-flight fetches per tick; `None` fetches every subject at once
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.filter(|&n| n > 0);
        self
    }

    /// One tick: enumerate, fetch all subjects, aggregate.
    ///
    /// A failed fetch yields a zeroed sample, so the snapshot always holds one
    /// sample per enumerated subject.
    pub async fn collect_once(&self) -> Result<Snapshot, SourceError> {
        let subjects = self.source.enumerate().await?;
        let expected = subjects.len();
        let limit = self.max_concurrency.unwrap_or(expected).max(1);
        let source = &self.source;

        let samples: Vec<Sample> = stream::iter(subjects)
            .map(|subject| async move {
                match source.fetch(&subject).await {
                    Ok(sample) => sample,
                    Err(e) => {
                        debug!(subject = %subject.id, error = %e, "fetch failed, using zeroed sample");
                        Sample::zeroed(&subject)
                    }
                }
            })
            .buffer_unordered(limit)
            .collect()
            .await;

        debug_assert_eq!(samples.len(), expected);
        Ok(aggregate(samples, self.core_count))
    }

    /// Collect on every tick until cancelled or the source fails.
    pub async fn run(self, ctx: CancellationToken, bus: BusSender<Snapshot>) -> MonitorResult<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Err(MonitorError::Cancelled),
                _ = ticker.tick() => {}
            }

            let snapshot = tokio::select! {
                _ = ctx.cancelled() => return Err(MonitorError::Cancelled),
                result = self.collect_once() => match result {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        error!(error = %e, "cannot enumerate subjects");
                        return Err(e.into());
                    }
                },
            };

            debug!(subjects = snapshot.len(), cpu = snapshot.total_cpu_percent, "tick collected");
            bus.publish(&ctx, snapshot).await?;
        }
    }
}
