use crate::error::{Result, ScanError};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Hard ceiling on concurrent workers
pub const MAX_WORKERS: usize = 300;

/// Called for every result as soon as a worker produces it
pub type ResultCallback<R> = Arc<dyn Fn(&R) + Send + Sync>;

/// Bounded pool of async workers draining a shared task queue
pub struct WorkerPool<R> {
    workers: usize,
    result_callback: Option<ResultCallback<R>>,
}

impl<R: Send + 'static> WorkerPool<R> {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.clamp(1, MAX_WORKERS),
            result_callback: None,
        }
    }

    pub fn with_result_callback(mut self, callback: ResultCallback<R>) -> Self {
        self.result_callback = Some(callback);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `handler` over every task and return the results once the queue is
    /// drained and all workers have exited. Tasks for which the handler returns
    /// `None` are dropped. Result order is unspecified.
    pub async fn run<T, F, Fut>(&self, tasks: Vec<T>, handler: F) -> Result<Vec<R>>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<R>> + Send + 'static,
    {
        let total = tasks.len();
        let worker_count = self.workers.min(total);
        if worker_count == 0 {
            return Ok(Vec::new());
        }

        info!("Dispatching {} tasks to {} workers", total, worker_count);

        let queue: Arc<Mutex<VecDeque<T>>> = Arc::new(Mutex::new(tasks.into_iter().collect()));
        let results: Arc<Mutex<Vec<R>>> = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let mut worker_handles = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let queue = queue.clone();
            let results = results.clone();
            let handler = handler.clone();
            let result_cb = self.result_callback.clone();

            let handle = tokio::spawn(async move {
                debug!("Worker {} started", worker_id);
                let mut processed = 0usize;

                loop {
                    let task = {
                        let mut queue = queue.lock().await;
                        queue.pop_front()
                    };

                    let Some(task) = task else {
                        break;
                    };

                    processed += 1;
                    if let Some(result) = handler(task).await {
                        if let Some(ref callback) = result_cb {
                            callback(&result);
                        }
                        results.lock().await.push(result);
                    }
                }

                debug!("Worker {} finished after {} tasks", worker_id, processed);
            });

            worker_handles.push(handle);
        }

        for handle in worker_handles {
            if let Err(e) = handle.await {
                warn!("Worker task failed: {}", ScanError::from(e));
            }
        }

        let collected = std::mem::take(&mut *results.lock().await);
        info!("Pool drained: {} of {} tasks produced results", collected.len(), total);
        Ok(collected)
    }
}
