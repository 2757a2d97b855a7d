// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-concurrency FIFO executor over owned state.
//!
//! [`SerialQueue`] moves its state into one worker task. Callers enqueue
//! closures that borrow the state mutably; the worker runs them strictly
//! one at a time in arrival order, so the state never needs a lock.

use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use mnemo_core::MnemoError;

type Job<S> = Box<dyn for<'a> FnOnce(&'a mut S) -> BoxFuture<'a, ()> + Send>;

/// FIFO task queue with exactly one task running at a time.
///
/// There is no priority, cancellation or timeout: a task that never
/// completes stalls every task queued behind it.
pub struct SerialQueue<S> {
    tx: mpsc::UnboundedSender<Job<S>>,
}

impl<S: Send + 'static> SerialQueue<S> {
    /// Spawns the worker on the current Tokio runtime and hands it `state`.
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(state, rx));
        Self { tx }
    }

    /// Queues `task` and waits for its outcome.
    ///
    /// A task that fails or panics rejects only its own caller; the worker
    /// moves on to the next job either way.
    pub async fn enqueue<T, F>(&self, task: F) -> Result<T, MnemoError>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&'a mut S) -> BoxFuture<'a, Result<T, MnemoError>> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let job: Job<S> = Box::new(move |state: &mut S| {
            async move {
                let outcome = match std::panic::catch_unwind(AssertUnwindSafe(move || task(state))) {
                    Ok(fut) => AssertUnwindSafe(fut)
                        .catch_unwind()
                        .await
                        .unwrap_or(Err(MnemoError::TaskPanicked)),
                    Err(_) => Err(MnemoError::TaskPanicked),
                };
                // The caller may have stopped waiting.
                let _ = done_tx.send(outcome);
            }
            .boxed()
        });

        self.tx.send(job).map_err(|_| MnemoError::QueueClosed)?;
        done_rx.await.map_err(|_| MnemoError::QueueClosed)?
    }
}

async fn run_worker<S>(mut state: S, mut rx: mpsc::UnboundedReceiver<Job<S>>) {
    debug!("request queue worker started");
    while let Some(job) = rx.recv().await {
        job(&mut state).await;
    }
    debug!("request queue worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Mutex;

    #[tokio::test]
    async fn returns_task_result_and_mutates_state() {
        let queue = SerialQueue::new(0_u32);
        let first = queue
            .enqueue(|n: &mut u32| {
                async move {
                    *n += 5;
                    Ok(*n)
                }
                .boxed()
            })
            .await
            .unwrap();
        let second = queue
            .enqueue(|n: &mut u32| async move { Ok(*n * 2) }.boxed())
            .await
            .unwrap();
        assert_eq!((first, second), (5, 10));
    }

    #[tokio::test]
    async fn tasks_run_one_at_a_time_in_arrival_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let queue = Arc::new(SerialQueue::new(()));

        let mut handles = Vec::new();
        for (name, delay_ms) in [("A", 60_u64), ("B", 5), ("C", 20)] {
            let queue = queue.clone();
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                queue
                    .enqueue(move |_: &mut ()| {
                        async move {
                            log.lock().await.push(format!("start {name}"));
                            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                            log.lock().await.push(format!("end {name}"));
                            Ok(name)
                        }
                        .boxed()
                    })
                    .await
            }));
            // Fix the arrival order.
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(
            *log.lock().await,
            vec!["start A", "end A", "start B", "end B", "start C", "end C"]
        );
    }

    #[tokio::test]
    async fn failing_task_rejects_only_its_own_caller() {
        let queue = SerialQueue::new(Vec::<&'static str>::new());

        let failed = queue
            .enqueue(|_: &mut Vec<&'static str>| {
                async { Err::<(), _>(MnemoError::Internal("boom".into())) }.boxed()
            })
            .await;
        assert!(matches!(failed, Err(MnemoError::Internal(m)) if m == "boom"));

        let seen = queue
            .enqueue(|v: &mut Vec<&'static str>| {
                async move {
                    v.push("next");
                    Ok(v.clone())
                }
                .boxed()
            })
            .await
            .unwrap();
        assert_eq!(seen, vec!["next"]);
    }

    /// Enqueues A, B and C together; B misbehaves through `middle`.
    async fn run_abc<F>(middle: F) -> (Vec<&'static str>, [Result<&'static str, MnemoError>; 3])
    where
        F: for<'a> FnOnce(&'a mut Vec<&'static str>) -> BoxFuture<'a, Result<&'static str, MnemoError>>
            + Send
            + 'static,
    {
        let queue = SerialQueue::new(Vec::new());
        let a = queue.enqueue(|log: &mut Vec<&'static str>| {
            async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                log.push("A");
                Ok("A")
            }
            .boxed()
        });
        let b = queue.enqueue(middle);
        let c = queue.enqueue(|log: &mut Vec<&'static str>| {
            async move {
                log.push("C");
                Ok("C")
            }
            .boxed()
        });
        // join! polls in argument order, so the jobs are sent as A, B, C.
        let (a, b, c) = tokio::join!(a, b, c);

        let log = queue
            .enqueue(|log: &mut Vec<&'static str>| async move { Ok(log.clone()) }.boxed())
            .await
            .unwrap();
        (log, [a, b, c])
    }

    #[tokio::test]
    async fn failure_between_two_tasks_leaves_both_intact() {
        let (log, [a, b, c]) = run_abc(|log: &mut Vec<&'static str>| {
            async move {
                log.push("B");
                Err(MnemoError::Internal("B failed".into()))
            }
            .boxed()
        })
        .await;

        assert_eq!(log, vec!["A", "B", "C"]);
        assert_eq!(a.unwrap(), "A");
        assert!(matches!(b, Err(MnemoError::Internal(m)) if m == "B failed"));
        assert_eq!(c.unwrap(), "C");
    }

    #[tokio::test]
    async fn panic_between_two_tasks_leaves_both_intact() {
        let (log, [a, b, c]) = run_abc(|log: &mut Vec<&'static str>| {
            async move {
                log.push("B");
                panic!("B exploded")
            }
            .boxed()
        })
        .await;

        assert_eq!(log, vec!["A", "B", "C"]);
        assert_eq!(a.unwrap(), "A");
        assert!(matches!(b, Err(MnemoError::TaskPanicked)));
        assert_eq!(c.unwrap(), "C");
    }

    #[tokio::test]
    async fn panicking_task_reports_and_queue_continues() {
        let queue = SerialQueue::new(1_u8);

        let panicked = queue
            .enqueue::<(), _>(|_: &mut u8| async { panic!("task exploded") }.boxed())
            .await;
        assert!(matches!(panicked, Err(MnemoError::TaskPanicked)));

        let panicked_early = queue
            .enqueue::<(), _>(|_: &mut u8| panic!("no future built"))
            .await;
        assert!(matches!(panicked_early, Err(MnemoError::TaskPanicked)));

        let value = queue
            .enqueue(|n: &mut u8| async move { Ok(*n) }.boxed())
            .await
            .unwrap();
        assert_eq!(value, 1);
    }
}
