//! Named filter presets persisted to a local JSON file.
//!
//! The file holds the whole list as one JSON array and is rewritten after
//! every change. Storage failures never abort the caller: they are logged and
//! the in-memory list stays authoritative for the rest of the run.

use crate::models::{FilterSet, SavedSearch};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Fixed storage key; the store file is `<data_dir>/<STORAGE_KEY>.json`
pub const STORAGE_KEY: &str = "propertyGenie_savedSearches";

pub struct SavedSearchStore {
    path: PathBuf,
    searches: Vec<SavedSearch>,
}

impl SavedSearchStore {
    /// Open the store under `data_dir`, starting empty if nothing readable is there
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(format!("{}.json", STORAGE_KEY));
        let searches = match Self::read(&path) {
            Ok(searches) => searches,
            Err(e) => {
                error!("Error loading saved searches: {:#}", e);
                Vec::new()
            }
        };
        debug!("Loaded {} saved searches from {}", searches.len(), path.display());
        Self { path, searches }
    }

    fn read(path: &Path) -> Result<Vec<SavedSearch>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Newest first
    pub fn list(&self) -> &[SavedSearch] {
        &self.searches
    }

    pub fn get(&self, id: &str) -> Option<&SavedSearch> {
        self.searches.iter().find(|s| s.id == id)
    }

    /// Save `filters` under `name` (or "Search N" when blank) at the front of the list
    pub fn save_search(&mut self, filters: FilterSet, name: Option<&str>) -> SavedSearch {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => format!("Search {}", self.searches.len() + 1),
        };

        let search = SavedSearch {
            id: self.next_id(),
            name,
            filters,
            created_at: Utc::now(),
        };

        info!("💾 Saved search '{}' ({})", search.name, search.id);
        self.searches.insert(0, search.clone());
        self.persist();
        search
    }

    /// Returns whether a search with `id` existed
    pub fn delete_search(&mut self, id: &str) -> bool {
        let before = self.searches.len();
        self.searches.retain(|s| s.id != id);
        let removed = self.searches.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Returns whether a search with `id` existed
    pub fn update_search_name(&mut self, id: &str, new_name: &str) -> bool {
        match self.searches.iter_mut().find(|s| s.id == id) {
            Some(search) => {
                search.name = new_name.to_string();
                self.persist();
                true
            }
            None => false,
        }
    }

    pub fn clear_all_searches(&mut self) {
        self.searches.clear();
        self.persist();
    }

    /// Epoch millis, bumped past any id already in use
    fn next_id(&self) -> String {
        let mut id = Utc::now().timestamp_millis();
        while self.searches.iter().any(|s| s.id == id.to_string()) {
            id += 1;
        }
        id.to_string()
    }

    fn persist(&self) {
        if let Err(e) = self.write() {
            error!("Error saving searches: {:#}", e);
        }
    }

    fn write(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string(&self.searches)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// One-line description of a filter set, e.g. `"vista" · Price filter · 2 type(s) · Selangor`
pub fn summary(filters: &FilterSet) -> String {
    let mut parts = Vec::new();
    if !filters.search.is_empty() {
        parts.push(format!("\"{}\"", filters.search));
    }
    // A zero bound is not worth mentioning
    let set = |bound: Option<f64>| bound.is_some_and(|v| v != 0.0);
    if set(filters.min_price) || set(filters.max_price) {
        parts.push("Price filter".to_string());
    }
    if !filters.types.is_empty() {
        parts.push(format!("{} type(s)", filters.types.len()));
    }
    if !filters.categories.is_empty() {
        parts.push(filters.categories.join("/"));
    }
    if let Some(state) = filters.state() {
        parts.push(state.to_string());
    }
    if let Some(city) = filters.city() {
        parts.push(city.to_string());
    }

    if parts.is_empty() {
        "No filters".to_string()
    } else {
        parts.join(" · ")
    }
}
