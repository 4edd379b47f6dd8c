/// Single-slot handoff between a collector and its consumer
///
/// Capacity is one: a publisher blocks while the previous snapshot is still
/// unconsumed, so a slow consumer slows collection down instead of queueing
/// history.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::error::{MonitorError, MonitorResult};

pub struct BusSender<T> {
    tx: mpsc::Sender<T>,
}

pub struct BusReceiver<T> {
    rx: mpsc::Receiver<T>,
}

/// Create a connected sender/receiver pair with a single slot
pub fn metric_bus<T>() -> (BusSender<T>, BusReceiver<T>) {
    let (tx, rx) = mpsc::channel(1);
    (BusSender { tx }, BusReceiver { rx })
}

impl<T> Clone for BusSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T: Send> BusSender<T> {
    /// Wait for the slot to be free, then hand `value` over.
    pub async fn publish(&self, ctx: &CancellationToken, value: T) -> MonitorResult<()> {
        tokio::select! {
            _ = ctx.cancelled() => Err(MonitorError::Cancelled),
            sent = self.tx.send(value) => sent.map_err(|_| MonitorError::BusClosed),
        }
    }
}

impl<T> BusReceiver<T> {
    /// Next value, or `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}
