//! Bounded fan-out for per-app requests.
//!
//! Runs one fetch per input with at most `max_concurrent` in flight and
//! hands results back by input position, so callers keep discovery order no
//! matter which request finishes first.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

use crate::error::{Error, Result};

/// Type alias for boxed futures tagged with their input position
type IndexedFuture<'a, T> = Pin<Box<dyn Future<Output = (usize, Result<T>)> + Send + 'a>>;

/// Outcome of a fan-out.
///
/// `results[i]` holds the value for input `i` if its fetch completed. When
/// `error` is set, no fetch was started after the failure; fetches already
/// in flight were allowed to finish and their values kept.
#[derive(Debug)]
pub struct FanOut<T> {
    /// Results by input position
    pub results: Vec<Option<T>>,
    /// First failure, if any
    pub error: Option<Error>,
}

impl<T> FanOut<T> {
    /// Number of inputs that produced a value.
    pub fn completed(&self) -> usize {
        self.results.iter().filter(|r| r.is_some()).count()
    }
}

/// Fetch one resource per input, in input order, with bounded concurrency.
///
/// With `max_concurrent == 1` this is a plain sequential loop that stops at
/// the first failure. `on_complete` is called once per finished fetch,
/// successful or not.
///
/// # Example
///
/// ```ignore
/// let fan_out = fetch_ordered(
///     guids,
///     |guid| async move { fetch_resource::<ProcessResource>(fetcher, &path_for(&guid)).await },
///     4,
///     || bar.inc(1),
/// )
/// .await;
/// ```
pub async fn fetch_ordered<'a, I, T, F, Fut>(
    inputs: Vec<I>,
    fetch: F,
    max_concurrent: usize,
    mut on_complete: impl FnMut(),
) -> FanOut<T>
where
    T: Send + 'a,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'a,
{
    let total = inputs.len();
    let max_concurrent = max_concurrent.max(1);
    let mut results: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut first_error: Option<Error> = None;

    debug!(
        "Fetching {} resources with max {} concurrent",
        total, max_concurrent
    );

    let mut futures: FuturesUnordered<IndexedFuture<'a, T>> = FuturesUnordered::new();
    let mut pending = inputs.into_iter().enumerate();

    let make_future = |index: usize, input: I| -> IndexedFuture<'a, T> {
        let fut = fetch(input);
        Box::pin(async move { (index, fut.await) })
    };

    // Seed initial batch up to max_concurrent
    for (index, input) in pending.by_ref().take(max_concurrent) {
        futures.push(make_future(index, input));
    }

    while let Some((index, result)) = futures.next().await {
        on_complete();

        match result {
            Ok(value) => results[index] = Some(value),
            Err(err) => {
                debug!("Fetch {} of {} failed: {}", index + 1, total, err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        // Stop starting new work once anything has failed; drain the rest
        if first_error.is_none() {
            if let Some((next_index, input)) = pending.next() {
                futures.push(make_future(next_index, input));
            }
        }
    }

    FanOut {
        results,
        error: first_error,
    }
}
