mod config;
mod display;
mod format;
mod models;
mod saved;
mod search;
mod session;
mod sources;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{Config, DEFAULT_CONFIG_FILE};
use models::{FilterSet, SortOrder};
use saved::SavedSearchStore;
use search::presets::find_preset;
use serde_json::json;
use session::SearchSession;
use sources::PropertyGenieApi;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search Property Genie listings from the terminal", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch listings and show one page of filtered results
    Search {
        /// Query string of a shared search, e.g. "types=condominium&page=2"
        #[arg(long)]
        query: Option<String>,
        /// Start from a saved search
        #[arg(long)]
        saved: Option<String>,
        /// Drop the filters carried by --query or --saved before applying flags
        #[arg(long)]
        clear: bool,
        #[command(flatten)]
        filters: FilterArgs,
        /// "price" (low to high) or "-price" (high to low)
        #[arg(long, allow_hyphen_values = true, value_parser = parse_sort)]
        sort: Option<SortOrder>,
        #[arg(long)]
        page: Option<usize>,
        /// Print the page as JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// List the property types, states and cities available to filter on
    Facets {
        /// Only list cities of this state
        #[arg(long)]
        state: Option<String>,
    },
    /// Manage saved searches
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(Subcommand, Debug)]
enum SavedAction {
    List,
    /// Save the given filters under a name
    Save {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        query: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    Delete { id: String },
    Rename { id: String, name: String },
    Clear,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Text matched against property name and address
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_parser = parse_price)]
    min_price: Option<f64>,
    #[arg(long, value_parser = parse_price)]
    max_price: Option<f64>,
    /// Price preset label, e.g. "500K - 1M" or "5M+"
    #[arg(long)]
    preset: Option<String>,
    /// Property type (repeatable)
    #[arg(long = "type")]
    types: Vec<String>,
    /// "sale" or "rent" (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    city: Option<String>,
}

impl FilterArgs {
    /// Apply each given flag through the session, as if edited one by one
    fn apply(&self, session: &mut SearchSession) -> Result<()> {
        if let Some(search) = &self.search {
            session.set_search(search);
        }
        if let Some(label) = &self.preset {
            let preset = find_preset(label)
                .with_context(|| format!("Unknown price preset '{}'", label))?;
            session.set_price_range(preset.min, preset.max);
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let current = session.filters();
            let min = self.min_price.or(current.min_price);
            let max = self.max_price.or(current.max_price);
            session.set_price_range(min, max);
        }
        if !self.types.is_empty() {
            session.set_types(self.types.clone());
        }
        if !self.categories.is_empty() {
            session.set_categories(self.categories.clone());
        }
        if let Some(state) = &self.state {
            session.set_state(Some(state.clone()));
        }
        if let Some(city) = &self.city {
            session.set_city(Some(city.clone()));
        }
        Ok(())
    }
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_price(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(price) if price.is_finite() => Ok(price),
        _ => Err(format!("'{}' is not a valid price", value)),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::load_with_env(&config_path)?;

    match cli.command {
        Command::Search {
            query,
            saved,
            clear,
            filters,
            sort,
            page,
            json,
        } => {
            let mut session = new_session(&config, query.as_deref());
            if let Some(id) = saved {
                let store = SavedSearchStore::open(&config.storage.data_dir);
                let search = store
                    .get(&id)
                    .with_context(|| format!("No saved search with id '{}'", id))?;
                info!("Loading saved search '{}'", search.name);
                session.load_saved(&search.filters);
            }
            if clear {
                session.clear_filters();
            }
            filters.apply(&mut session)?;
            if let Some(sort) = sort {
                session.set_sort(sort);
            }
            if let Some(page) = page {
                session.set_page(page);
            }

            load_listings(&config, &mut session).await?;

            let view = session.settle_view();
            debug!("Showing page {} of {}", session.page(), view.meta.page_count);
            let share_url = session.share_url(&config.listing.share_base);
            if json {
                let output = json!({
                    "items": view.items,
                    "_meta": view.meta,
                    "filteredCount": view.filtered_count,
                    "query": session.to_query(),
                    "share": share_url,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                display::print_results(&view, session.sort(), &share_url);
            }
        }
        Command::Facets { state } => {
            let mut session = new_session(&config, None);
            session.set_state(state.clone());
            load_listings(&config, &mut session).await?;
            display::print_facets(&session.view(), state.as_deref());
        }
        Command::Saved { action } => run_saved(&config, action)?,
    }

    Ok(())
}

fn new_session(config: &Config, query: Option<&str>) -> SearchSession {
    SearchSession::from_query(
        query.unwrap_or_default(),
        config.listing.per_page,
        Duration::from_secs(config.listing.cache_ttl_secs),
    )
}

/// Fetch the dataset; any failure prints the generic banner before the error is returned
async fn load_listings(config: &Config, session: &mut SearchSession) -> Result<()> {
    let result = async {
        let api = PropertyGenieApi::new(&config.api)?;
        info!("🏠 Fetching listings from {}", api.base_url());
        session.load(&api).await
    }
    .await;

    if let Err(e) = &result {
        error!("API Error: {:#}", e);
        eprintln!("{}", display::LOAD_ERROR_BANNER);
    }
    result.context("Failed to load properties")
}

fn run_saved(config: &Config, action: SavedAction) -> Result<()> {
    let mut store = SavedSearchStore::open(&config.storage.data_dir);

    match action {
        SavedAction::List => {
            display::print_saved_searches(store.list());
            info!("Saved searches are stored in {}", store.path().display());
        }
        SavedAction::Save {
            name,
            query,
            filters,
        } => {
            let mut session = new_session(config, query.as_deref());
            filters.apply(&mut session)?;
            let filters: FilterSet = session.filters().clone();
            if !filters.has_active_filters() {
                bail!("Apply filters first to save a search");
            }
            let search = store.save_search(filters, name.as_deref());
            println!("Saved '{}' as {}", search.name, search.id);
            println!("   {}", saved::summary(&search.filters));
        }
        SavedAction::Delete { id } => {
            if !store.delete_search(&id) {
                bail!("No saved search with id '{}'", id);
            }
            println!("Deleted {}", id);
        }
        SavedAction::Rename { id, name } => {
            if !store.update_search_name(&id, &name) {
                bail!("No saved search with id '{}'", id);
            }
            println!("Renamed {} to '{}'", id, name);
        }
        SavedAction::Clear => {
            let count = store.list().len();
            store.clear_all_searches();
            println!("Cleared {} saved search(es)", count);
        }
    }

    Ok(())
}
