//! Window-by-window scheduler.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;

use super::result::BatchResult;

/// Window size used when the caller does not pick one.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runs a per-item async operation over a sequence of inputs in windows.
///
/// No retries here; wrap the per-item operation with
/// [`RetryExecutor`](crate::retry::RetryExecutor) if it needs them.
#[derive(Debug, Clone, Copy)]
pub struct BatchScheduler {
    concurrency: usize,
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

impl BatchScheduler {
    /// `concurrency` of 0 is treated as 1.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `op` for every item and collects the outcomes. Never fails as a
    /// whole: per-item errors, including a panic while building or polling an
    /// item's future, end up in [`BatchResult::errors`].
    ///
    /// Each item runs as its own task in a per-window `JoinSet`, so one item
    /// being slow or failing has no effect on its siblings, and dropping the
    /// returned future aborts whatever is still in flight.
    pub async fn run<T, R, E, F, Fut>(&self, items: impl IntoIterator<Item = T>, op: F) -> BatchResult<R>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Send + 'static,
        E: Into<anyhow::Error> + Send + 'static,
    {
        let items: Vec<T> = items.into_iter().collect();
        let total = items.len();
        let windows = total.div_ceil(self.concurrency);
        tracing::info!(items = total, concurrency = self.concurrency, windows, "batch start");

        let op = Arc::new(op);
        let mut result = BatchResult::with_len(total);
        let mut pending = items.into_iter().enumerate().peekable();
        let mut window = 0usize;

        while pending.peek().is_some() {
            window += 1;
            let mut join_set = JoinSet::new();
            let mut task_index: HashMap<tokio::task::Id, usize> = HashMap::new();
            for (index, item) in pending.by_ref().take(self.concurrency) {
                let op = Arc::clone(&op);
                let handle = join_set.spawn(async move { (*op)(item).await });
                task_index.insert(handle.id(), index);
            }
            tracing::debug!(window, size = join_set.len(), "batch window launched");

            let mut settled: Vec<(usize, anyhow::Result<R>)> = Vec::with_capacity(join_set.len());
            while let Some(joined) = join_set.join_next_with_id().await {
                let (id, outcome) = match joined {
                    Ok((id, res)) => (id, res.map_err(Into::into)),
                    Err(e) => (e.id(), Err(anyhow::anyhow!("batch item task failed: {}", e))),
                };
                if let Some(&index) = task_index.get(&id) {
                    settled.push((index, outcome));
                }
            }

            settled.sort_by_key(|(index, _)| *index);
            for (index, outcome) in settled {
                if let Err(ref e) = outcome {
                    tracing::warn!(index, error = %format!("{:#}", e), "batch item failed");
                }
                result.record(index, outcome);
            }
        }

        tracing::info!(
            succeeded = result.succeeded(),
            failed = result.failed(),
            "batch done"
        );
        result
    }
}

/// Runs `op` over `items` with `concurrency` (default [`DEFAULT_CONCURRENCY`]).
pub async fn run_batch<T, R, E, F, Fut>(
    items: impl IntoIterator<Item = T>,
    op: F,
    concurrency: Option<usize>,
) -> BatchResult<R>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Into<anyhow::Error> + Send + 'static,
{
    BatchScheduler::new(concurrency.unwrap_or(DEFAULT_CONCURRENCY))
        .run(items, op)
        .await
}
