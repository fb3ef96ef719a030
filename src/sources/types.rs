use crate::models::SortOrder;

/// Query parameters for a single listing page request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    /// 1-indexed page number
    pub page: usize,
    pub sort: SortOrder,
}

impl PageRequest {
    pub fn new(page: usize, sort: SortOrder) -> Self {
        Self { page, sort }
    }

    /// `page` always, `sort` only when not the default order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if !self.sort.is_default() {
            pairs.push(("sort", self.sort.as_param().to_string()));
        }
        pairs
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            sort: SortOrder::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_omit_default_sort() {
        assert_eq!(PageRequest::default().query_pairs(), vec![("page", "1".to_string())]);
        assert_eq!(
            PageRequest::new(3, SortOrder::PriceDesc).query_pairs(),
            vec![("page", "3".to_string()), ("sort", "-price".to_string())]
        );
    }
}
