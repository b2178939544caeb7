//! Bounded-concurrency fan-out executor
//!
//! Providers are remote and latency-variable: unbounded fan-out risks
//! overwhelming them or exhausting local connections, while a sequential
//! fetch is too slow for catalogs with dozens of priced titles. The executor
//! runs an arbitrary number of fetch tasks while keeping at most
//! `max_concurrency` in flight. The limit is owned by the executor instance,
//! so sharing one executor across a whole aggregation pass makes the cap
//! global rather than per provider.

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs unit futures under a fixed concurrency cap
///
/// Each task captures its own failures; one task erroring never aborts or
/// delays unrelated tasks beyond the cap itself. Permits are owned RAII
/// guards, so every exit path — completion or cancellation by dropping the
/// `run_all` future — releases its slot and later passes cannot deadlock.
pub struct BoundedExecutor {
    semaphore: Arc<Semaphore>,
}

impl BoundedExecutor {
    /// Create an executor allowing `max_concurrency` tasks in flight
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
        }
    }

    /// Drive every task to completion, at most `max_concurrency` at a time
    ///
    /// Slot acquisition blocks until a slot frees. Returns once every task
    /// has finished.
    pub async fn run_all<F>(&self, tasks: impl IntoIterator<Item = F>)
    where
        F: Future<Output = ()>,
    {
        let bounded: Vec<_> = tasks
            .into_iter()
            .map(|task| {
                let semaphore = Arc::clone(&self.semaphore);
                async move {
                    // The semaphore is never closed, so acquisition can only
                    // fail during runtime shutdown; skipping the task then is
                    // indistinguishable from cancellation.
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return;
                    };
                    task.await;
                }
            })
            .collect();

        join_all(bounded).await;
    }
}
