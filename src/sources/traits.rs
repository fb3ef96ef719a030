use crate::models::{ListingPage, Property, SortOrder};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Upper bound on page requests in flight during `fetch_all`
pub const MAX_CONCURRENT_PAGES: usize = 6;

/// Common trait for paged listing sources.
/// Implementors only serve single pages; `fetch_all` stitches them together.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one 1-indexed page in the given sort order
    async fn fetch_page(&self, page: usize, sort: SortOrder) -> Result<ListingPage>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;

    /// Fetch every page and concatenate the items in page order.
    ///
    /// Page 1 tells us `pageCount`; pages `2..=pageCount` are then requested
    /// concurrently, at most `MAX_CONCURRENT_PAGES` at a time. Any failed page
    /// fails the whole fetch.
    async fn fetch_all(&self, sort: SortOrder) -> Result<Vec<Property>> {
        let first = self
            .fetch_page(1, sort)
            .await
            .with_context(|| format!("Failed to fetch page 1 from {}", self.source_name()))?;

        let page_count = first.meta.page_count;
        let mut all_items = first.items;

        if page_count > 1 {
            debug!("Fetching pages 2..={} from {}", page_count, self.source_name());
            let pages: Vec<ListingPage> = stream::iter(2..=page_count)
                .map(|page| async move {
                    self.fetch_page(page, sort).await.with_context(|| {
                        format!("Failed to fetch page {} from {}", page, self.source_name())
                    })
                })
                .buffered(MAX_CONCURRENT_PAGES)
                .try_collect()
                .await?;

            for page in pages {
                all_items.extend(page.items);
            }
        }

        info!(
            "Fetched {} properties across {} page(s) from {}",
            all_items.len(),
            page_count.max(1),
            self.source_name()
        );
        Ok(all_items)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::PageMeta;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory source serving fixed pages of `per_page` items
    pub(crate) struct FakeSource {
        pub items: Vec<Property>,
        pub per_page: usize,
        pub failing_page: Option<usize>,
        pub requests: Mutex<Vec<(usize, SortOrder)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeSource {
        pub(crate) fn new(items: Vec<Property>, per_page: usize) -> Self {
            Self {
                items,
                per_page,
                failing_page: None,
                requests: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ListingSource for FakeSource {
        async fn fetch_page(&self, page: usize, sort: SortOrder) -> Result<ListingPage> {
            self.requests.lock().unwrap().push((page, sort));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing_page == Some(page) {
                anyhow::bail!("connection reset");
            }
            let page_count = self.items.len().div_ceil(self.per_page);
            let start = ((page - 1) * self.per_page).min(self.items.len());
            let end = (start + self.per_page).min(self.items.len());
            Ok(ListingPage {
                items: self.items[start..end].to_vec(),
                meta: PageMeta {
                    total_count: self.items.len(),
                    page_count,
                    current_page: page,
                    per_page: self.per_page,
                },
            })
        }

        fn source_name(&self) -> &'static str {
            "fake"
        }
    }

    pub(crate) fn numbered(count: usize) -> Vec<Property> {
        (1..=count)
            .map(|i| serde_json::from_value(json!({ "id": i, "name": format!("Unit {}", i) })).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_all_concatenates_pages_in_order() {
        let source = FakeSource::new(numbered(25), 10);
        let all = source.fetch_all(SortOrder::PriceAsc).await.unwrap();

        let ids: Vec<String> = all.iter().map(|p| p.id.clone()).collect();
        let expected: Vec<String> = (1..=25).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);

        let mut requests = source.requests.lock().unwrap().clone();
        requests.sort_by_key(|(page, _)| *page);
        assert_eq!(
            requests,
            vec![
                (1, SortOrder::PriceAsc),
                (2, SortOrder::PriceAsc),
                (3, SortOrder::PriceAsc)
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_caps_pages_in_flight() {
        let source = FakeSource::new(numbered(250), 10);
        let all = source.fetch_all(SortOrder::Default).await.unwrap();

        assert_eq!(all.len(), 250);
        assert_eq!(all[0].id, "1");
        assert_eq!(all[249].id, "250");
        assert_eq!(source.request_count(), 25);
        let peak = source.max_in_flight.load(Ordering::SeqCst);
        assert!(peak > 1, "pages were fetched one at a time");
        assert!(peak <= MAX_CONCURRENT_PAGES, "{} pages in flight", peak);
    }

    #[tokio::test]
    async fn test_fetch_all_single_page() {
        let source = FakeSource::new(numbered(4), 10);
        assert_eq!(source.fetch_all(SortOrder::Default).await.unwrap().len(), 4);
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_empty_listing() {
        let source = FakeSource::new(Vec::new(), 10);
        assert!(source.fetch_all(SortOrder::Default).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_fails_when_any_page_fails() {
        let mut source = FakeSource::new(numbered(25), 10);
        source.failing_page = Some(3);
        let err = source.fetch_all(SortOrder::Default).await.unwrap_err();
        assert!(format!("{:#}", err).contains("page 3"));
    }
}
