use crate::format::{
    format_date, format_price, format_property_type, format_size, truncate_text, DEFAULT_TRUNCATE_LEN,
};
use crate::models::{Property, SavedSearch, SortOrder};
use crate::saved;
use crate::search::presets::{
    custom_range_summary, price_option_label, MAX_PRICE_OPTIONS, MIN_PRICE_OPTIONS, PRICE_PRESETS,
};
use crate::session::SearchView;

pub const LOAD_ERROR_BANNER: &str = "Failed to load properties. Please try again later.";

/// One listing, laid out like a result card
pub fn print_property_card(position: usize, property: &Property) {
    let category = if property.is_for_sale() { "For Sale" } else { "For Rent" };
    let name = property.name.as_deref().unwrap_or("Untitled listing");

    println!(
        "{}. {} [{}] {}",
        position,
        truncate_text(name, DEFAULT_TRUNCATE_LEN),
        category,
        format_price(property.price)
    );

    if let Some(kind) = property.property_type.as_deref() {
        println!("   {}", format_property_type(kind));
    }

    let location: Vec<&str> = [property.city.as_deref(), property.state.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !location.is_empty() {
        println!("   {}", location.join(", "));
    }

    let mut features = Vec::new();
    if let Some(beds) = property.bed_rooms {
        features.push(format!("{} Beds", beds));
    }
    if let Some(baths) = property.bath_rooms {
        features.push(format!("{} Baths", baths));
    }
    if property.floor_size.is_some_and(|s| s != 0.0) {
        features.push(format_size(property.floor_size));
    }
    if let Some(furnishings) = property.furnishings.as_deref().filter(|f| !f.is_empty()) {
        features.push(furnishings.to_string());
    }
    if !features.is_empty() {
        println!("   {}", features.join(" · "));
    }

    println!("   Agent: {}", property.agent_name());
    if let Some(image) = property.image.as_deref() {
        println!("   Image: {}", image);
    }
    println!("   ID: {}", property.id);
    println!();
}

/// Result count, active filters and the cards of the current page
pub fn print_results(view: &SearchView, sort: SortOrder, share_url: &str) {
    let mut header = format!("{} properties found", view.filtered_count);
    if view.active_filter_count > 0 {
        let plural = if view.active_filter_count > 1 { "s" } else { "" };
        header.push_str(&format!(" ({} filter{} active)", view.active_filter_count, plural));
    }
    println!("{}", header);
    println!("Sort: {}", sort);
    println!();

    if view.filtered_count == 0 {
        println!("No properties found");
        println!("Try adjusting your filters or search criteria");
    } else {
        let offset = (view.meta.current_page - 1) * view.meta.per_page;
        for (i, property) in view.items.iter().enumerate() {
            print_property_card(offset + i + 1, property);
        }
        println!("Page {} of {}", view.meta.current_page, view.meta.page_count);
    }

    println!("Share: {}", share_url);
}

/// Values available to filter on
pub fn print_facets(view: &SearchView, selected_state: Option<&str>) {
    let types: Vec<String> = view.property_types.iter().map(|t| format_property_type(t)).collect();
    println!("Property types: {}", join_or_none(&types));
    println!("States: {}", join_or_none(&view.states));
    match selected_state {
        Some(state) => println!("Cities in {}: {}", state, join_or_none(&view.cities)),
        None => println!("Cities: {}", join_or_none(&view.cities)),
    }
    println!("Furnishings: {}", join_or_none(&view.furnishings));

    let presets: Vec<String> = PRICE_PRESETS.iter().map(|p| p.label.to_string()).collect();
    println!("Price presets: {}", presets.join(", "));
    let mins: Vec<String> = MIN_PRICE_OPTIONS.iter().map(|v| price_option_label(*v)).collect();
    let maxes: Vec<String> = MAX_PRICE_OPTIONS.iter().map(|v| price_option_label(*v)).collect();
    println!("Min price options: {}", mins.join(", "));
    println!("Max price options: {}", maxes.join(", "));
    println!(
        "Sort orders: {}",
        SortOrder::ALL
            .iter()
            .map(|s| format!("{} ({})", s.label(), if s.is_default() { "default" } else { s.as_param() }))
            .collect::<Vec<_>>()
            .join(", ")
    );
}

pub fn print_saved_searches(searches: &[SavedSearch]) {
    if searches.is_empty() {
        println!("No saved searches yet");
        return;
    }
    println!("Saved Searches ({})", searches.len());
    for search in searches {
        println!("{}  {}", search.id, search.name);
        println!("   {}", saved::summary(&search.filters));
        if let Some(range) = custom_range_summary(search.filters.min_price, search.filters.max_price) {
            println!("   {}", range);
        }
        println!("   Saved {}", format_date(&search.created_at.to_rfc3339()));
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}
