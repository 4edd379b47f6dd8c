/// Producer/consumer supervision under one cancellation scope

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::error::{MonitorError, MonitorResult};

/// Run `producer` and `consumer` as sibling tasks sharing a scope derived
/// from `ctx`.
///
/// The first task to fail cancels the scope; its error is returned once both
/// tasks have exited. Errors raised by the sibling after that are dropped.
pub async fn serve<P, PF, C, CF>(ctx: &CancellationToken, producer: P, consumer: C) -> MonitorResult<()>
where
    P: FnOnce(CancellationToken) -> PF,
    PF: Future<Output = MonitorResult<()>> + Send + 'static,
    C: FnOnce(CancellationToken) -> CF,
    CF: Future<Output = MonitorResult<()>> + Send + 'static,
{
    let scope = ctx.child_token();
    let first_error: Arc<Mutex<Option<MonitorError>>> = Arc::new(Mutex::new(None));
    let mut tasks = JoinSet::new();

    tasks.spawn(supervised("producer", producer(scope.clone()), scope.clone(), first_error.clone()));
    tasks.spawn(supervised("consumer", consumer(scope.clone()), scope.clone(), first_error.clone()));

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            // Panicked or aborted task: treat like a failure of that task
            record_first(&first_error, MonitorError::Task(e.to_string()));
            scope.cancel();
        }
    }

    let first = first_error.lock().unwrap_or_else(|p| p.into_inner()).take();
    match first {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

async fn supervised<F>(
    name: &'static str,
    task: F,
    scope: CancellationToken,
    first_error: Arc<Mutex<Option<MonitorError>>>,
) where
    F: Future<Output = MonitorResult<()>>,
{
    if let Err(e) = task.await {
        if !scope.is_cancelled() {
            warn!(task = name, error = %e, "task failed, cancelling siblings");
        }
        record_first(&first_error, e);
        scope.cancel();
    }
}

fn record_first(slot: &Mutex<Option<MonitorError>>, error: MonitorError) {
    let mut slot = slot.lock().unwrap_or_else(|p| p.into_inner());
    if slot.is_none() {
        *slot = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_both_succeed() {
        let ctx = CancellationToken::new();
        let result = serve(&ctx, |_| async { Ok(()) }, |_| async { Ok(()) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_first_error_cancels_sibling_and_is_returned() {
        let ctx = CancellationToken::new();
        let sibling_exited = Arc::new(AtomicBool::new(false));
        let exited = sibling_exited.clone();

        let result = serve(
            &ctx,
            move |scope| async move {
                scope.cancelled().await;
                tokio::time::sleep(Duration::from_millis(20)).await;
                exited.store(true, Ordering::SeqCst);
                Err(MonitorError::Cancelled)
            },
            |_| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(MonitorError::CanceledByUser)
            },
        )
        .await;

        assert!(matches!(result, Err(MonitorError::CanceledByUser)));
        // serve only returns after the cancelled sibling has finished
        assert!(sibling_exited.load(Ordering::SeqCst));
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_external_cancellation_reaches_tasks() {
        let ctx = CancellationToken::new();
        let cancel = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cancel.cancel();
        });

        let result = serve(
            &ctx,
            |scope| async move {
                scope.cancelled().await;
                Err(MonitorError::Cancelled)
            },
            |scope| async move {
                scope.cancelled().await;
                Ok(())
            },
        )
        .await;

        assert!(matches!(result, Err(MonitorError::Cancelled)));
    }

    fn blow_up() -> bool {
        true
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let ctx = CancellationToken::new();
        let result = serve(
            &ctx,
            |_| async {
                if blow_up() {
                    panic!("collector blew up");
                }
                Ok(())
            },
            |scope| async move {
                scope.cancelled().await;
                Ok(())
            },
        )
        .await;

        assert!(matches!(result, Err(MonitorError::Task(_))));
    }
}
