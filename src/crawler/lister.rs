//! Generic windowed listing
//!
//! The space catalogue and each space's page list are both paginated the
//! same way: request a window at an offset, get back up to `window_size`
//! items. This module hides the windowing behind one complete traversal.

use crate::ClientError;
use std::future::Future;

/// Fetches one logical collection completely, window by window.
///
/// Starts at offset 0, appends each returned window, and advances the
/// offset by the number of items actually returned. The only termination
/// signal is a window shorter than `window_size` — which includes the
/// zero-length window, so a collection of exactly `k * window_size` items
/// costs one extra empty-terminal request. Listing N items under window W
/// therefore costs exactly `ceil((N+1)/W)` requests.
///
/// An error on any window aborts this listing only; the caller decides how
/// to record it.
pub async fn list_all<T, F, Fut>(
    window_size: usize,
    mut fetch_window: F,
) -> Result<Vec<T>, ClientError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ClientError>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let window = fetch_window(offset).await?;
        let count = window.len();
        items.extend(window);
        offset += count;

        if count < window_size {
            break;
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves a fake collection of `total` items and counts requests.
    fn fake_collection(
        total: usize,
        window_size: usize,
    ) -> (
        Arc<AtomicUsize>,
        impl FnMut(usize) -> std::future::Ready<Result<Vec<usize>, ClientError>>,
    ) {
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        let fetch = move |offset: usize| {
            counter.fetch_add(1, Ordering::SeqCst);
            let end = (offset + window_size).min(total);
            let window: Vec<usize> = (offset..end).collect();
            std::future::ready(Ok(window))
        };
        (requests, fetch)
    }

    #[tokio::test]
    async fn test_empty_collection_single_request() {
        let (requests, fetch) = fake_collection(0, 25);
        let items = list_all(25, fetch).await.unwrap();

        assert!(items.is_empty());
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_first_window_single_request() {
        let (requests, fetch) = fake_collection(7, 25);
        let items = list_all(25, fetch).await.unwrap();

        assert_eq!(items.len(), 7);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_empty_terminal_window() {
        // 50 items under window 25: two full windows plus one empty probe.
        let (requests, fetch) = fake_collection(50, 25);
        let items = list_all(25, fetch).await.unwrap();

        assert_eq!(items.len(), 50);
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_thirty_items_window_twenty_five() {
        // The listing shape from a 30-page space: 25 then 5.
        let (requests, fetch) = fake_collection(30, 25);
        let items = list_all(25, fetch).await.unwrap();

        assert_eq!(items.len(), 30);
        assert_eq!(requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_request_count_property() {
        // ceil((N+1)/W) requests for all N, W combinations checked here.
        for window_size in [1usize, 2, 5, 25] {
            for total in [0usize, 1, 4, 5, 6, 24, 25, 26, 50, 99] {
                let (requests, fetch) = fake_collection(total, window_size);
                let items = list_all(window_size, fetch).await.unwrap();

                assert_eq!(items.len(), total);
                assert_eq!(items, (0..total).collect::<Vec<_>>());
                let expected = (total + 1).div_ceil(window_size);
                assert_eq!(
                    requests.load(Ordering::SeqCst),
                    expected,
                    "total={} window={}",
                    total,
                    window_size
                );
            }
        }
    }

    #[tokio::test]
    async fn test_error_aborts_listing() {
        let mut calls = 0;
        let result: Result<Vec<usize>, _> = list_all(2, |offset| {
            calls += 1;
            std::future::ready(if offset == 0 {
                Ok(vec![0, 1])
            } else {
                Err(ClientError::Status {
                    url: "http://wiki.example.com/rest/api/space?start=2".to_string(),
                    status: 500,
                })
            })
        })
        .await;

        assert!(matches!(
            result,
            Err(ClientError::Status { status: 500, .. })
        ));
        assert_eq!(calls, 2);
    }
}
