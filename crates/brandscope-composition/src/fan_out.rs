//! Concurrent per-item execution

use crate::error::FanOutError;
use futures::future::try_join_all;
use std::future::Future;
use tracing::debug;

/// Run `f` for every item concurrently and collect the results in input order
///
/// All futures are created up front and polled together. The first failure
/// resolves the call with that item's index; the remaining in-flight futures
/// are dropped and every partial result is discarded. An empty input
/// resolves immediately to an empty list.
///
/// # Errors
/// [`FanOutError`] carrying the failing item's position and error.
pub async fn fan_out<I, T, E, F, Fut>(items: I, mut f: F) -> Result<Vec<T>, FanOutError<E>>
where
    I: IntoIterator,
    F: FnMut(usize, I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
{
    let futures: Vec<_> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let future = f(index, item);
            async move {
                future
                    .await
                    .map_err(|source| FanOutError::new(index, source))
            }
        })
        .collect();

    debug!(items = futures.len(), "fan-out started");
    let results = try_join_all(futures).await?;
    debug!(items = results.len(), "fan-out joined");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep, Instant};

    #[derive(Debug, Clone, PartialEq, thiserror::Error)]
    #[error("item {0} failed")]
    struct ItemError(usize);

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn empty_input_is_empty_output() {
        let results: Vec<u32> = fan_out(Vec::<u32>::new(), |_, n| async move { Ok::<_, ItemError>(n) })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn results_follow_input_order_not_completion_order() {
        let delays = [30_u64, 5, 20, 0];
        let results = fan_out(delays, |index, delay| async move {
            sleep(Duration::from_millis(delay)).await;
            Ok::<_, ItemError>(index * 10)
        })
        .await
        .unwrap();
        assert_eq!(results, vec![0, 10, 20, 30]);
    }

    #[tokio::test]
    async fn items_run_concurrently() {
        let started = Instant::now();
        fan_out(0..5, |_, _| async {
            sleep(Duration::from_millis(50)).await;
            Ok::<_, ItemError>(())
        })
        .await
        .unwrap();
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn one_failure_fails_the_whole_call() {
        let completed = Arc::new(AtomicUsize::new(0));
        let err = fan_out(0..4, |index, _| {
            let completed = completed.clone();
            async move {
                if index == 2 {
                    return Err(ItemError(index));
                }
                sleep(Duration::from_millis(20)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(index)
            }
        })
        .await
        .unwrap_err();

        assert_eq!(err.index, 2);
        assert_eq!(err.source, ItemError(2));
        assert_eq!(err.to_string(), "fan-out item 2 failed: item 2 failed");
        // Siblings were dropped before finishing
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn ordering_and_all_or_nothing(
            delays in prop::collection::vec(0_u64..4, 0..8),
            fail_at in prop::option::of(0_usize..8),
        ) {
            let n = delays.len();
            let outcome = runtime().block_on(fan_out(delays, |index, delay| async move {
                sleep(Duration::from_millis(delay)).await;
                if Some(index) == fail_at {
                    Err(ItemError(index))
                } else {
                    Ok(index)
                }
            }));

            match fail_at.filter(|i| *i < n) {
                Some(failing) => {
                    let err = outcome.unwrap_err();
                    prop_assert_eq!(err.index, failing);
                }
                None => prop_assert_eq!(outcome.unwrap(), (0..n).collect::<Vec<_>>()),
            }
        }
    }
}
