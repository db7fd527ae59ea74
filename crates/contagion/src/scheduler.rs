//! Concurrent window task scheduler
//!
//! One independent task per window runs on a dedicated rayon pool. Workers
//! send `(window, result)` pairs over a channel; the coordinator, running on
//! the calling thread, is the only writer of the result slots and the only
//! reader of the caller's [`RunMonitor`].
//!
//! A run moves through `Idle -> Dispatching -> Collecting` and ends in one of
//! `Completed`, `Cancelled` or `Failed`. On cancellation or failure an
//! internal abort flag stops queued tasks from starting; results of tasks
//! already in flight are dropped.

use crate::error::{EngineError, Result};
use crate::monitor::RunMonitor;
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Default interval between cancellation polls while no result arrives
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Terminal state of a run that did not fail
#[derive(Debug)]
pub enum Schedule<T> {
    /// Every task reported; slot `k` holds window `k`'s result
    Completed(Vec<Option<T>>),
    /// The monitor requested a stop; collected results were discarded
    Cancelled,
}

/// Dispatches window tasks to a worker pool and collects them in window order
pub struct WindowScheduler {
    pool: ThreadPool,
    poll_interval: Duration,
}

impl fmt::Debug for WindowScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowScheduler")
            .field("threads", &self.pool.current_num_threads())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl WindowScheduler {
    /// Build a scheduler with `threads` workers (None = rayon default)
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let mut builder =
            ThreadPoolBuilder::new().thread_name(|i| format!("contagion-window-{}", i));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }

        Ok(Self {
            pool: builder.build()?,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Set how long the coordinator waits for a result before re-polling
    /// the monitor
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Number of worker threads
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `task(k)` for every `k` in `0..n_tasks`
    ///
    /// Results are accepted in completion order and stored at their window
    /// index. After each accepted result the monitor receives the fraction
    /// `(highest filled index + 1) / n_tasks`.
    ///
    /// # Errors
    /// `TaskFailure` for the first task that returns an error or panics.
    pub fn run<T, E, F, M>(&self, n_tasks: usize, task: F, monitor: &M) -> Result<Schedule<T>>
    where
        T: Send,
        E: fmt::Display,
        F: Fn(usize) -> std::result::Result<T, E> + Sync,
        M: RunMonitor + ?Sized,
    {
        let (sender, receiver) = channel::unbounded::<(usize, std::result::Result<T, String>)>();
        let abort = AtomicBool::new(false);
        let task = &task;
        let abort_flag = &abort;

        self.pool.in_place_scope(|scope| {
            debug!(n_tasks, threads = self.threads(), "scheduler dispatching");
            for index in 0..n_tasks {
                let sender = sender.clone();
                scope.spawn(move |_| {
                    if abort_flag.load(Ordering::Acquire) {
                        return;
                    }
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| task(index))) {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(e)) => Err(e.to_string()),
                        Err(payload) => Err(panic_message(payload.as_ref())),
                    };
                    // The coordinator may already have stopped listening
                    let _ = sender.send((index, outcome));
                });
            }
            drop(sender);

            self.collect(n_tasks, &receiver, abort_flag, monitor)
        })
    }

    fn collect<T, M>(
        &self,
        n_tasks: usize,
        receiver: &Receiver<(usize, std::result::Result<T, String>)>,
        abort: &AtomicBool,
        monitor: &M,
    ) -> Result<Schedule<T>>
    where
        M: RunMonitor + ?Sized,
    {
        debug!(n_tasks, "scheduler collecting");
        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(n_tasks).collect();
        let mut collected = 0usize;
        let mut highest: Option<usize> = None;

        while collected < n_tasks {
            if monitor.is_cancelled() {
                abort.store(true, Ordering::Release);
                warn!(collected, n_tasks, "run cancelled");
                return Ok(Schedule::Cancelled);
            }

            match receiver.recv_timeout(self.poll_interval) {
                Ok((index, Ok(value))) => {
                    slots[index] = Some(value);
                    collected += 1;
                    let top = highest.map_or(index, |h| h.max(index));
                    highest = Some(top);
                    debug!(window = index, collected, n_tasks, "window accepted");
                    monitor.on_progress((top + 1) as f64 / n_tasks as f64);
                }
                Ok((window, Err(message))) => {
                    abort.store(true, Ordering::Release);
                    warn!(window, %message, "window task failed, abandoning run");
                    return Err(EngineError::TaskFailure { window, message });
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Every task reported or was skipped; missing slots surface
                // during aggregation
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!(collected, n_tasks, "scheduler completed");
        Ok(Schedule::Completed(slots))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .map_or_else(|| "task panicked".to_string(), |m| format!("task panicked: {}", m))
}
