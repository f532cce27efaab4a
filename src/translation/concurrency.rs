/*!
 * Concurrency-bounded task runner.
 *
 * Runs an async worker over a list of items with a fixed number of workers.
 * Workers pull the next unclaimed index from a shared cursor, so a slow item
 * only holds up its own worker. Every item yields exactly one outcome, stored
 * at the item's position, and a failing item never stops the others.
 *
 * All workers are futures polled by the calling task: requests overlap while
 * they wait on the network, but no two workers run at the same instant.
 */

use futures::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A failed item together with its error
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure<T, E> {
    /// The item the worker was given
    pub item: T,
    /// What the worker returned
    pub error: E,
}

/// Outcome of one item
pub type ItemOutcome<T, R, E> = Result<R, ItemFailure<T, E>>;

/// Number of workers actually spawned for `len` items
pub fn worker_count(concurrency: usize, len: usize) -> usize {
    concurrency.max(1).min(len)
}

/// Run `worker` over `items` with at most `concurrency` items in flight.
///
/// The returned vector has one entry per item, in input order.
/// `on_progress(completed, total)` is called after each item finishes.
pub async fn run_with_concurrency<'a, T, R, E, F, Fut, P>(
    items: &'a [T],
    concurrency: usize,
    worker: F,
    on_progress: P,
) -> Vec<ItemOutcome<T, R, E>>
where
    T: Clone,
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    P: Fn(usize, usize),
{
    let total = items.len();
    if total == 0 {
        return Vec::new();
    }

    let cursor = AtomicUsize::new(0);
    let completed = AtomicUsize::new(0);
    let (cursor, completed, worker, on_progress) = (&cursor, &completed, &worker, &on_progress);

    let workers = (0..worker_count(concurrency, total)).map(move |_| async move {
        let mut finished = Vec::new();

        loop {
            let index = cursor.fetch_add(1, Ordering::SeqCst);
            if index >= total {
                break;
            }

            let item = &items[index];
            let outcome = worker(item).await.map_err(|error| ItemFailure {
                item: item.clone(),
                error,
            });
            finished.push((index, outcome));

            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            on_progress(done, total);
        }

        finished
    });

    // Each index was claimed by exactly one worker, so every slot gets filled once.
    let mut slots: Vec<Option<ItemOutcome<T, R, E>>> = (0..total).map(|_| None).collect();
    for (index, outcome) in join_all(workers).await.into_iter().flatten() {
        slots[index] = Some(outcome);
    }

    let results: Vec<_> = slots.into_iter().flatten().collect();
    debug_assert_eq!(results.len(), total);
    results
}
