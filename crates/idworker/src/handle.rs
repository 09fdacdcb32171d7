//! A generator confined to one Tokio task.
//!
//! [`IdWorkerHandle`] moves a [`BasicIdWorker`] into a dedicated task that
//! serves requests from a bounded [`mpsc`] channel, one at a time. Callers on
//! any thread or task get IDs without sharing a lock; the task answers no other
//! request while it waits for the next millisecond.

use tokio::sync::{mpsc, oneshot};

use crate::{BasicIdWorker, Error, IdGenStatus, Result, SnowflakeId, TimeSource, WorkerConfig};

/// Messages understood by the worker task.
#[derive(Debug)]
enum WorkRequest {
    Next {
        response: oneshot::Sender<Result<SnowflakeId>>,
    },
    Shutdown {
        response: oneshot::Sender<()>,
    },
}

/// Cloneable handle to a generator running in its own Tokio task.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), idworker::Error> {
/// use idworker::{BasicIdWorker, IdWorkerHandle, TWITTER_EPOCH};
///
/// let handle = IdWorkerHandle::spawn(BasicIdWorker::with_system_clock(TWITTER_EPOCH, 1, 1)?);
/// let a = handle.next_id().await?;
/// let b = handle.next_id().await?;
/// assert!(a < b);
/// handle.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct IdWorkerHandle {
    tx: mpsc::Sender<WorkRequest>,
    config: WorkerConfig,
}

impl IdWorkerHandle {
    /// Queue depth used by [`IdWorkerHandle::spawn`].
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Spawns the worker task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<T>(generator: BasicIdWorker<T>) -> Self
    where
        T: TimeSource + Send + 'static,
    {
        Self::spawn_with_capacity(generator, Self::DEFAULT_CAPACITY)
    }

    /// Spawns the worker task with a request queue of `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or if called outside a Tokio runtime.
    pub fn spawn_with_capacity<T>(generator: BasicIdWorker<T>, capacity: usize) -> Self
    where
        T: TimeSource + Send + 'static,
    {
        let config = *generator.config();
        let (tx, rx) = mpsc::channel(capacity);
        tokio::spawn(worker_loop(rx, generator));
        Self { tx, config }
    }

    /// Returns the configuration of the generator behind this handle.
    pub const fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Requests the next ID from the worker task.
    ///
    /// # Errors
    ///
    /// - Any error the generator reports ([`Error::ClockMovedBackward`],
    ///   [`Error::TimestampOutOfRange`]).
    /// - [`Error::WorkerUnavailable`] if the task has shut down.
    pub async fn next_id(&self) -> Result<SnowflakeId> {
        let (response, rx) = oneshot::channel();
        self.tx
            .send(WorkRequest::Next { response })
            .await
            .map_err(|_| Error::WorkerUnavailable)?;
        rx.await.map_err(|_| Error::WorkerUnavailable)?
    }

    /// Stops the worker task once the requests queued ahead of this one are
    /// answered, and waits for the acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerUnavailable`] if the task was already gone.
    pub async fn shutdown(&self) -> Result<()> {
        let (response, rx) = oneshot::channel();
        self.tx
            .send(WorkRequest::Shutdown { response })
            .await
            .map_err(|_| Error::WorkerUnavailable)?;
        rx.await.map_err(|_| Error::WorkerUnavailable)
    }
}

async fn worker_loop<T>(mut rx: mpsc::Receiver<WorkRequest>, generator: BasicIdWorker<T>)
where
    T: TimeSource,
{
    #[cfg(feature = "tracing")]
    tracing::trace!(
        worker_id = generator.config().worker_id(),
        datacenter_id = generator.config().datacenter_id(),
        "id worker started"
    );

    while let Some(work) = rx.recv().await {
        match work {
            WorkRequest::Next { response } => {
                let result = loop {
                    let status = generator.poll_id();
                    match status {
                        Ok(IdGenStatus::Ready { id }) => break Ok(id),
                        Ok(IdGenStatus::Pending { .. }) => tokio::task::yield_now().await,
                        Err(e) => break Err(e),
                    }
                };
                // The caller may have stopped waiting; the ID is simply dropped.
                let _ = response.send(result);
            }
            WorkRequest::Shutdown { response } => {
                #[cfg(feature = "tracing")]
                tracing::debug!("id worker received shutdown signal");

                if response.send(()).is_err() {
                    #[cfg(feature = "tracing")]
                    tracing::error!("id worker failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("id worker stopped");
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashSet,
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
    };

    use super::*;
    use crate::{MonotonicClock, SystemClock, TWITTER_EPOCH};

    /// Stays on `base` until `tick` is called, then reads `base + 1`.
    struct GatedClock {
        base: u64,
        ticked: AtomicBool,
        reads: AtomicUsize,
    }

    impl GatedClock {
        fn new(base: u64) -> Arc<Self> {
            Arc::new(Self {
                base,
                ticked: AtomicBool::new(false),
                reads: AtomicUsize::new(0),
            })
        }

        fn tick(&self) {
            self.ticked.store(true, Ordering::SeqCst);
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl TimeSource for GatedClock {
        fn current_millis(&self) -> u64 {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.ticked.load(Ordering::SeqCst) {
                self.base + 1
            } else {
                self.base
            }
        }
    }

    fn spawn_handle(worker_id: i64, datacenter_id: i64) -> IdWorkerHandle {
        let config = WorkerConfig::new(TWITTER_EPOCH, worker_id, datacenter_id).unwrap();
        IdWorkerHandle::spawn(BasicIdWorker::new(config, MonotonicClock::new()))
    }

    #[tokio::test]
    async fn test_handle_produces_increasing_ids() {
        let handle = spawn_handle(4, 9);
        let mut last = handle.next_id().await.unwrap();
        for _ in 0..10_000 {
            let id = handle.next_id().await.unwrap();
            assert!(id > last);
            assert_eq!(id.worker_id(), 4);
            assert_eq!(id.datacenter_id(), 9);
            last = id;
        }
        assert_eq!(handle.config().worker_id(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_get_unique_ids() {
        const TASKS: usize = 8;
        const IDS_PER_TASK: usize = 4096;

        let handle = spawn_handle(1, 1);
        let mut tasks = Vec::with_capacity(TASKS);
        for _ in 0..TASKS {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                let mut ids = Vec::with_capacity(IDS_PER_TASK);
                for _ in 0..IDS_PER_TASK {
                    ids.push(handle.next_id().await.unwrap());
                }
                ids
            }));
        }

        let mut seen = HashSet::with_capacity(TASKS * IDS_PER_TASK);
        for task in tasks {
            for id in task.await.unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), TASKS * IDS_PER_TASK);
    }

    #[tokio::test]
    async fn test_exhausted_sequence_holds_queued_requests() {
        let per_ms = SnowflakeId::MAX_SEQUENCE as usize + 1;
        let clock = GatedClock::new(TWITTER_EPOCH + 7);
        let config = WorkerConfig::new(TWITTER_EPOCH, 2, 3).unwrap();
        let handle = IdWorkerHandle::spawn(BasicIdWorker::new(config, Arc::clone(&clock)));

        for i in 0..per_ms {
            let id = handle.next_id().await.unwrap();
            assert_eq!(id.timestamp(), 7);
            assert_eq!(id.sequence(), i as u64);
        }
        let reads = clock.reads();

        let waiting = tokio::spawn({
            let handle = handle.clone();
            async move { handle.next_id().await }
        });
        // the task keeps polling the stale millisecond
        while clock.reads() < reads + 2 {
            tokio::task::yield_now().await;
        }

        let queued = tokio::spawn({
            let handle = handle.clone();
            async move { handle.next_id().await }
        });
        while handle.tx.capacity() == IdWorkerHandle::DEFAULT_CAPACITY {
            tokio::task::yield_now().await;
        }
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        assert!(!waiting.is_finished());
        assert!(!queued.is_finished());

        clock.tick();
        let first = waiting.await.unwrap().unwrap();
        let second = queued.await.unwrap().unwrap();
        assert_eq!((first.timestamp(), first.sequence()), (8, 0));
        assert_eq!((second.timestamp(), second.sequence()), (8, 1));
        assert!(first < second);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_fail() {
        let handle = spawn_handle(0, 0);
        handle.next_id().await.unwrap();
        handle.shutdown().await.unwrap();

        assert_eq!(handle.next_id().await, Err(Error::WorkerUnavailable));
        assert_eq!(handle.shutdown().await, Err(Error::WorkerUnavailable));
    }

    #[tokio::test]
    async fn test_generator_errors_reach_the_caller() {
        let future_epoch = SystemClock.current_millis() + 3_600_000;
        let config = WorkerConfig::new(future_epoch, 0, 0).unwrap();
        let handle = IdWorkerHandle::spawn(BasicIdWorker::new(config, SystemClock));

        assert!(matches!(
            handle.next_id().await,
            Err(Error::TimestampOutOfRange { epoch, .. }) if epoch == future_epoch
        ));
        // the task survives a failed request
        handle.shutdown().await.unwrap();
    }
}
