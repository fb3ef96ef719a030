use crate::models::PageMeta;

pub const DEFAULT_PER_PAGE: usize = 20;

/// A borrowed slice of results plus the metadata describing it
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub meta: PageMeta,
}

/// Slice `items` into 1-indexed pages of `per_page`.
///
/// The requested page is clamped into `1..=page_count` (page 1 when there is
/// nothing to show), so an out-of-range page from a stale URL still renders.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_count = items.len();
    let page_count = total_count.div_ceil(per_page);
    let current_page = page.clamp(1, page_count.max(1));
    let start = ((current_page - 1) * per_page).min(total_count);
    let end = (start + per_page).min(total_count);

    Page {
        items: &items[start..end],
        meta: PageMeta {
            total_count,
            page_count,
            current_page,
            per_page,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let items: Vec<u32> = (1..=30).collect();
        let page = paginate(&items, 2, 12);
        assert_eq!(page.items, &items[12..24]);
        assert_eq!(
            page.meta,
            PageMeta {
                total_count: 30,
                page_count: 3,
                current_page: 2,
                per_page: 12
            }
        );
    }

    #[test]
    fn test_paginate_last_page_is_partial() {
        let items: Vec<u32> = (1..=30).collect();
        let page = paginate(&items, 3, 12);
        assert_eq!(page.items, &[25, 26, 27, 28, 29, 30]);
    }

    #[test]
    fn test_paginate_clamps_out_of_range_pages() {
        let items: Vec<u32> = (1..=30).collect();
        assert_eq!(paginate(&items, 99, 12).meta.current_page, 3);
        assert_eq!(paginate(&items, 0, 12).meta.current_page, 1);
        assert_eq!(paginate(&items, 0, 12).items.len(), 12);
    }

    #[test]
    fn test_paginate_empty_input() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 4, DEFAULT_PER_PAGE);
        assert!(page.items.is_empty());
        assert_eq!(page.meta.page_count, 0);
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.per_page, 20);
    }

    #[test]
    fn test_paginate_zero_per_page() {
        let items = ["a", "b"];
        let page = paginate(&items, 2, 0);
        assert_eq!(page.items, &["b"]);
        assert_eq!(page.meta.page_count, 2);
    }
}
