use serde::{Serialize, Serializer};

/// Maximum number of numbered buttons in the pagination display.
const MAX_PAGE_BUTTONS: u32 = 5;

/// One element of the pagination display strip: a page number or an
/// ellipsis marker. Serializes as a number or the string `"..."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u32(*n),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Number of pages needed for `total` records at `per_page` each.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        total.div_ceil(per_page)
    }
}

/// The records of one 1-based page.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    if start >= items.len() || per_page == 0 {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

/// Pagination display window: at most [`MAX_PAGE_BUTTONS`] numbered
/// buttons centered on the current page (clamped to the ends), with
/// first/last page markers and ellipses for the truncated ranges.
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    let mut pages = Vec::new();
    if total == 0 {
        return pages;
    }

    if total <= MAX_PAGE_BUTTONS {
        pages.extend((1..=total).map(PageItem::Page));
        return pages;
    }

    let half = MAX_PAGE_BUTTONS / 2;
    let mut start = current.saturating_sub(half);
    let mut end = current + half;
    if start <= 1 {
        start = 1;
        end = MAX_PAGE_BUTTONS;
    } else if end >= total {
        start = total - MAX_PAGE_BUTTONS + 1;
        end = total;
    }

    if start > 1 {
        pages.push(PageItem::Page(1));
        if start > 2 {
            pages.push(PageItem::Ellipsis);
        }
    }

    pages.extend((start..=end).map(PageItem::Page));

    if end < total {
        if end < total - 1 {
            pages.push(PageItem::Ellipsis);
        }
        pages.push(PageItem::Page(total));
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pages(items: &[PageItem]) -> Vec<String> {
        items
            .iter()
            .map(|item| match item {
                PageItem::Page(n) => n.to_string(),
                PageItem::Ellipsis => "...".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_window_in_the_middle() {
        let window = page_window(10, 20);
        assert_eq!(
            pages(&window),
            vec!["1", "...", "8", "9", "10", "11", "12", "...", "20"]
        );
    }

    #[test]
    fn test_window_at_the_start() {
        assert_eq!(pages(&page_window(1, 20)), vec!["1", "2", "3", "4", "5", "...", "20"]);
        assert_eq!(pages(&page_window(2, 20)), vec!["1", "2", "3", "4", "5", "...", "20"]);
    }

    #[test]
    fn test_window_at_the_end() {
        assert_eq!(
            pages(&page_window(20, 20)),
            vec!["1", "...", "16", "17", "18", "19", "20"]
        );
        assert_eq!(
            pages(&page_window(19, 20)),
            vec!["1", "...", "16", "17", "18", "19", "20"]
        );
    }

    #[test]
    fn test_window_omits_redundant_ellipsis() {
        // window ending right next to the boundary pages
        assert_eq!(
            pages(&page_window(4, 7)),
            vec!["1", "2", "3", "4", "5", "6", "7"]
        );
        assert_eq!(
            pages(&page_window(4, 8)),
            vec!["1", "2", "3", "4", "5", "6", "...", "8"]
        );
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn test_few_pages_shown_in_full(#[case] total: u32) {
        let window = page_window(1, total);
        assert_eq!(window.len(), total as usize);
        assert_eq!(window[0], PageItem::Page(1));
        assert_eq!(window[total as usize - 1], PageItem::Page(total));
    }

    #[test]
    fn test_no_pages_no_window() {
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_page_item_serialization() {
        let window = page_window(10, 20);
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, r#"[1,"...",8,9,10,11,12,"...",20]"#);
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(42, 10, 5)]
    fn test_total_pages(#[case] total: usize, #[case] per_page: usize, #[case] expected: usize) {
        assert_eq!(total_pages(total, per_page), expected);
    }

    #[test]
    fn test_paginate_slices_one_page() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&items, 1, 10), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 2, 10), (11..=20).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 3, 10), (21..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
    }
}
