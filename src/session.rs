//! Page-level search state: filters, sort and page kept consistent with each
//! other and with the shareable query string, plus the fetched dataset.

use crate::models::{FilterSet, PageMeta, Property, PropertyField, SortOrder};
use crate::search::pagination::DEFAULT_PER_PAGE;
use crate::search::{apply_filters, get_cities_for_state, get_unique_values, paginate, UrlState};
use crate::sources::ListingSource;
use anyhow::Result;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

struct CachedListing {
    properties: Vec<Property>,
    fetched_at: Instant,
}

/// Everything needed to render one results page
#[derive(Debug, Clone)]
pub struct SearchView {
    pub items: Vec<Property>,
    pub meta: PageMeta,
    /// Listings matching the filters, across all pages
    pub filtered_count: usize,
    pub property_types: Vec<String>,
    pub states: Vec<String>,
    /// Cities of the selected state, or all cities
    pub cities: Vec<String>,
    pub furnishings: Vec<String>,
    pub active_filter_count: usize,
}

pub struct SearchSession {
    filters: FilterSet,
    sort: SortOrder,
    page: usize,
    per_page: usize,
    cache: HashMap<SortOrder, CachedListing>,
    cache_ttl: Duration,
}

impl SearchSession {
    /// A `per_page` of 0 falls back to the paginator default
    pub fn new(per_page: usize, cache_ttl: Duration) -> Self {
        let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
        Self {
            filters: FilterSet::default(),
            sort: SortOrder::Default,
            page: 1,
            per_page,
            cache: HashMap::new(),
            cache_ttl,
        }
    }

    /// Restore filters, sort and page from a shared query string
    pub fn from_query(query: &str, per_page: usize, cache_ttl: Duration) -> Self {
        let state = UrlState::parse(query);
        let mut session = Self::new(per_page, cache_ttl);
        session.filters = state.filters;
        session.sort = state.sort;
        session.page = state.page;
        session
    }

    pub fn url_state(&self) -> UrlState {
        UrlState {
            filters: self.filters.clone(),
            sort: self.sort,
            page: self.page,
        }
    }

    /// The query string mirroring the current state
    pub fn to_query(&self) -> String {
        self.url_state().to_query_string()
    }

    /// `base` with the current query string appended
    pub fn share_url(&self, base: &str) -> String {
        self.url_state().share_url(base)
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: &str) {
        self.filters.search = search.to_string();
        self.page = 1;
    }

    pub fn set_price_range(&mut self, min_price: Option<f64>, max_price: Option<f64>) {
        self.filters.min_price = min_price;
        self.filters.max_price = max_price;
        self.page = 1;
    }

    pub fn set_types(&mut self, types: Vec<String>) {
        self.filters.types = types;
        self.page = 1;
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.filters.categories = categories;
        self.page = 1;
    }

    /// Changing the state invalidates any selected city
    pub fn set_state(&mut self, state: Option<String>) {
        self.filters.state = state;
        self.filters.city = None;
        self.page = 1;
    }

    pub fn set_city(&mut self, city: Option<String>) {
        self.filters.city = city;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(FilterSet::default());
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn load_saved(&mut self, filters: &FilterSet) {
        self.set_filters(filters.clone());
    }

    /// Make sure the dataset for the current sort order is loaded.
    ///
    /// A dataset fetched within the cache TTL is reused instead of refetched.
    pub async fn load(&mut self, source: &dyn ListingSource) -> Result<()> {
        if let Some(cached) = self.cache.get(&self.sort) {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                debug!("Reusing cached listing for sort {:?}", self.sort);
                return Ok(());
            }
        }

        info!("Loading properties ({})...", self.sort);
        let properties = source.fetch_all(self.sort).await?;
        self.cache.insert(
            self.sort,
            CachedListing {
                properties,
                fetched_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// The full dataset for the current sort order (empty until loaded)
    pub fn properties(&self) -> &[Property] {
        self.cache
            .get(&self.sort)
            .map(|c| c.properties.as_slice())
            .unwrap_or(&[])
    }

    pub fn view(&self) -> SearchView {
        let properties = self.properties();
        let filtered = apply_filters(properties, &self.filters);
        let page = paginate(&filtered, self.page, self.per_page);

        SearchView {
            items: page.items.to_vec(),
            meta: page.meta,
            filtered_count: filtered.len(),
            property_types: get_unique_values(properties, PropertyField::Type),
            states: get_unique_values(properties, PropertyField::State),
            cities: get_cities_for_state(properties, self.filters.state()),
            furnishings: get_unique_values(properties, PropertyField::Furnishings),
            active_filter_count: self.filters.active_filter_count(),
        }
    }

    /// Build the view and pull the page back to the one actually shown, so a
    /// page past the end never leaks into the share URL.
    pub fn settle_view(&mut self) -> SearchView {
        let view = self.view();
        if view.meta.current_page != self.page {
            debug!(
                "Page {} is out of range, showing page {} of {}",
                self.page, view.meta.current_page, view.meta.page_count
            );
            self.page = view.meta.current_page;
        }
        view
    }
}
