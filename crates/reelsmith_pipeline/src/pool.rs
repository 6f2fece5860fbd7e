//! Order-preserving bounded-concurrency mapper.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Map `worker` over `items` with at most `limit` invocations in flight.
///
/// `results[i]` corresponds to `items[i]` regardless of completion order:
/// `min(limit, items.len())` cooperative worker loops share an atomic
/// claim cursor, and each result lands in the slot of the index it was
/// claimed for. The call resolves once every item has been processed.
///
/// The pool defines no failure mode of its own. A fallible worker returns
/// its `Result` as an ordinary value, keeping one item's failure isolated
/// from its siblings.
///
/// # Examples
///
/// ```
/// use reelsmith_pipeline::map_bounded;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let doubled = map_bounded(&[1, 2, 3], 2, |n, _| {
///     let n = *n;
///     async move { n * 2 }
/// })
/// .await;
/// assert_eq!(doubled, vec![2, 4, 6]);
/// # }
/// ```
pub async fn map_bounded<T, R, F, Fut>(items: &[T], limit: usize, worker: F) -> Vec<R>
where
    F: Fn(&T, usize) -> Fut,
    Fut: Future<Output = R>,
{
    if items.is_empty() {
        return Vec::new();
    }

    let cursor = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<R>>> = Mutex::new((0..items.len()).map(|_| None).collect());
    let worker_count = limit.max(1).min(items.len());

    let runners = (0..worker_count).map(|_| {
        let cursor = &cursor;
        let slots = &slots;
        let worker = &worker;
        async move {
            loop {
                let index = cursor.fetch_add(1, Ordering::SeqCst);
                if index >= items.len() {
                    break;
                }
                let result = worker(&items[index], index).await;
                slots.lock().expect("result slots lock")[index] = Some(result);
            }
        }
    });

    futures::future::join_all(runners).await;

    slots
        .into_inner()
        .expect("result slots lock")
        .into_iter()
        .map(|slot| slot.expect("claimed index resolved"))
        .collect()
}
