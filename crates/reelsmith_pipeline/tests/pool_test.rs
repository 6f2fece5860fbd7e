//! Bounded worker pool tests: order preservation and the concurrency cap.

use reelsmith_pipeline::map_bounded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn results_match_items_by_index_for_any_limit() {
    let items: Vec<usize> = (0..10).collect();
    let expected: Vec<usize> = items.iter().map(|n| n * 10).collect();

    for limit in [1, 2, 3, 7, 10, 50] {
        // Later items finish earlier, so completion order inverts input order
        let results = map_bounded(&items, limit, |n, index| {
            let n = *n;
            async move {
                tokio::time::sleep(Duration::from_millis((10 - index as u64) * 3)).await;
                n * 10
            }
        })
        .await;

        assert_eq!(results, expected, "limit {limit}");
    }
}

#[tokio::test]
async fn worker_receives_the_matching_index() {
    let items = vec!["a", "b", "c", "d"];

    let results = map_bounded(&items, 2, |item, index| {
        let item = *item;
        async move { format!("{index}:{item}") }
    })
    .await;

    assert_eq!(results, vec!["0:a", "1:b", "2:c", "3:d"]);
}

#[tokio::test]
async fn in_flight_workers_never_exceed_the_limit() {
    let items: Vec<usize> = (0..12).collect();
    let in_flight = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    map_bounded(&items, 3, |_, _| {
        let in_flight = &in_flight;
        let peak = &peak;
        async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    })
    .await;

    assert_eq!(peak.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn empty_input_resolves_immediately() {
    let items: Vec<u32> = Vec::new();
    let results = map_bounded(&items, 4, |n, _| {
        let n = *n;
        async move { n }
    })
    .await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn one_failed_item_stays_isolated_in_its_slot() {
    let items: Vec<u32> = vec![1, 2, 3];

    let results = map_bounded(&items, 2, |n, _| {
        let n = *n;
        async move {
            if n == 2 {
                Err(format!("item {n} exploded"))
            } else {
                Ok(n * 100)
            }
        }
    })
    .await;

    assert_eq!(results[0], Ok(100));
    assert_eq!(results[1], Err("item 2 exploded".to_string()));
    assert_eq!(results[2], Ok(300));
}
