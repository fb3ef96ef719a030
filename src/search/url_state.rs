//! Mirrors filters, sort and page into a shareable query string and back.

use crate::models::{FilterSet, SortOrder};
use tracing::{debug, warn};

/// Everything needed to reproduce a search from its URL
#[derive(Debug, Clone, PartialEq)]
pub struct UrlState {
    pub filters: FilterSet,
    pub sort: SortOrder,
    pub page: usize,
}

impl Default for UrlState {
    fn default() -> Self {
        Self {
            filters: FilterSet::default(),
            sort: SortOrder::Default,
            page: 1,
        }
    }
}

impl UrlState {
    /// Encode only the parts that differ from the defaults.
    /// Multi-valued filters repeat their key (`types=a&types=b`).
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        let filters = &self.filters;

        if !self.sort.is_default() {
            pairs.push(("sort", self.sort.as_param().to_string()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if !filters.search.is_empty() {
            pairs.push(("search", filters.search.clone()));
        }
        if let Some(min) = filters.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = filters.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        pairs.extend(filters.types.iter().map(|t| ("types", t.clone())));
        pairs.extend(filters.categories.iter().map(|c| ("categories", c.clone())));
        if let Some(state) = filters.state() {
            pairs.push(("state", state.to_string()));
        }
        if let Some(city) = filters.city() {
            pairs.push(("city", city.to_string()));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Build a full shareable URL for `base`
    pub fn share_url(&self, base: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }

    /// Parse a query string (with or without the leading `?`).
    ///
    /// Malformed values fall back to their defaults instead of failing, the
    /// same way a browser would just render the unfiltered page.
    pub fn parse(query: &str) -> Self {
        let mut state = UrlState::default();
        let query = query.trim().trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(raw_value);
            if value.is_empty() {
                continue;
            }

            match key {
                "sort" => match value.parse() {
                    Ok(sort) => state.sort = sort,
                    Err(e) => warn!("Ignoring sort from URL: {}", e),
                },
                "page" => state.page = parse_page(&value),
                "search" => state.filters.search = value,
                "minPrice" => state.filters.min_price = parse_price(key, &value),
                "maxPrice" => state.filters.max_price = parse_price(key, &value),
                "types" => state.filters.types.push(value),
                "categories" => state.filters.categories.push(value),
                "state" => state.filters.state = Some(value),
                "city" => state.filters.city = Some(value),
                other => debug!("Ignoring unknown query parameter '{}'", other),
            }
        }

        state
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

fn parse_page(value: &str) -> usize {
    match value.trim().parse::<i64>() {
        Ok(page) if page >= 1 => page as usize,
        _ => 1,
    }
}

fn parse_price(key: &str, value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Some(price),
        _ => {
            warn!("Ignoring non-numeric {} '{}' from URL", key, value);
            None
        }
    }
}
