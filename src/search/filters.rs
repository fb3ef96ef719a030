use crate::models::{FilterSet, Property, PropertyField};
use std::collections::BTreeSet;

/// Keep properties priced within `[min_price, max_price]`.
///
/// A listing without a price compares as 0, so it survives an upper bound
/// but not a positive lower bound.
pub fn filter_by_price(
    properties: &[Property],
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| {
            let price = p.price.unwrap_or(0.0);
            !(min_price.is_some_and(|min| price < min) || max_price.is_some_and(|max| price > max))
        })
        .cloned()
        .collect()
}

/// Keep properties whose type is one of `types`; an empty list keeps everything
pub fn filter_by_type(properties: &[Property], types: &[String]) -> Vec<Property> {
    filter_by_membership(properties, PropertyField::Type, types)
}

/// Keep properties whose category is one of `categories`; an empty list keeps everything
pub fn filter_by_category(properties: &[Property], categories: &[String]) -> Vec<Property> {
    filter_by_membership(properties, PropertyField::Category, categories)
}

fn filter_by_membership(
    properties: &[Property],
    field: PropertyField,
    allowed: &[String],
) -> Vec<Property> {
    if allowed.is_empty() {
        return properties.to_vec();
    }
    properties
        .iter()
        .filter(|p| {
            p.field(field)
                .is_some_and(|value| allowed.iter().any(|a| a == value))
        })
        .cloned()
        .collect()
}

/// Keep properties in the given state and/or city (exact match)
pub fn filter_by_location(
    properties: &[Property],
    state: Option<&str>,
    city: Option<&str>,
) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| {
            state.map_or(true, |s| p.state.as_deref() == Some(s))
                && city.map_or(true, |c| p.city.as_deref() == Some(c))
        })
        .cloned()
        .collect()
}

/// Case-insensitive substring match on name or address
pub fn filter_by_search(properties: &[Property], query: &str) -> Vec<Property> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return properties.to_vec();
    }
    properties
        .iter()
        .filter(|p| {
            let matches = |field: &Option<String>| {
                field
                    .as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&term))
            };
            matches(&p.name) || matches(&p.address)
        })
        .cloned()
        .collect()
}

/// Run the whole filter chain: search, price, type, category, location.
/// Inactive filters are skipped and the input is left untouched.
pub fn apply_filters(properties: &[Property], filters: &FilterSet) -> Vec<Property> {
    let mut result = properties.to_vec();

    if let Some(query) = filters.search_text() {
        result = filter_by_search(&result, query);
    }
    if filters.has_price_range() {
        result = filter_by_price(&result, filters.min_price, filters.max_price);
    }
    if !filters.types.is_empty() {
        result = filter_by_type(&result, &filters.types);
    }
    if !filters.categories.is_empty() {
        result = filter_by_category(&result, &filters.categories);
    }
    if filters.has_location() {
        result = filter_by_location(&result, filters.state(), filters.city());
    }

    result
}

/// Distinct non-empty values of `field`, sorted ascending
pub fn get_unique_values(properties: &[Property], field: PropertyField) -> Vec<String> {
    properties
        .iter()
        .filter_map(|p| p.field(field))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Cities available for `state`, or every city when no state is selected
pub fn get_cities_for_state(properties: &[Property], state: Option<&str>) -> Vec<String> {
    match state.filter(|s| !s.is_empty()) {
        None => get_unique_values(properties, PropertyField::City),
        Some(state) => {
            let in_state: Vec<Property> = properties
                .iter()
                .filter(|p| p.state.as_deref() == Some(state))
                .cloned()
                .collect();
            get_unique_values(&in_state, PropertyField::City)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn listing(
        id: &str,
        name: &str,
        kind: &str,
        price: Option<f64>,
        state: &str,
        city: &str,
    ) -> Property {
        let category = if kind == "room" { "rent" } else { "sale" };
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "type": kind,
            "category": category,
            "price": price,
            "address": format!("{} Jalan Utama", id),
            "state": state,
            "city": city,
        }))
        .unwrap()
    }

    pub(crate) fn sample_listings() -> Vec<Property> {
        vec![
            listing("1", "Residensi Vista", "condominium", Some(450000.0), "Selangor", "Petaling Jaya"),
            listing("2", "Taman Melati Terrace", "terrace", Some(780000.0), "Selangor", "Shah Alam"),
            listing("3", "Skyline Suites", "condominium", Some(1250000.0), "Kuala Lumpur", "Bukit Bintang"),
            listing("4", "Cozy Room Near LRT", "room", Some(900.0), "Kuala Lumpur", "Cheras"),
            listing("5", "Heritage Bungalow", "bungalow", None, "Penang", "George Town"),
            listing("6", "Vista Heights", "condominium", Some(2100000.0), "Selangor", "Petaling Jaya"),
        ]
    }

    fn ids(properties: &[Property]) -> Vec<&str> {
        properties.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_filter_by_price_bounds_are_inclusive() {
        let all = sample_listings();
        let result = filter_by_price(&all, Some(450000.0), Some(1250000.0));
        assert_eq!(ids(&result), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_filter_by_price_missing_price_counts_as_zero() {
        let all = sample_listings();
        assert!(ids(&filter_by_price(&all, None, Some(1000.0))).contains(&"5"));
        assert!(!ids(&filter_by_price(&all, Some(1.0), None)).contains(&"5"));
    }

    #[test]
    fn test_filter_by_price_nan_price_counts_as_missing() {
        let mut all = sample_listings();
        all.push(serde_json::from_value(json!({ "id": "7", "price": "NaN" })).unwrap());
        assert!(!ids(&filter_by_price(&all, Some(1.0), None)).contains(&"7"));
        assert!(ids(&filter_by_price(&all, None, Some(1000.0))).contains(&"7"));
    }

    #[test]
    fn test_filter_by_type_empty_keeps_all() {
        let all = sample_listings();
        assert_eq!(filter_by_type(&all, &[]).len(), all.len());
        let condos = filter_by_type(&all, &["condominium".to_string()]);
        assert_eq!(ids(&condos), vec!["1", "3", "6"]);
    }

    #[test]
    fn test_filter_by_category() {
        let all = sample_listings();
        let rentals = filter_by_category(&all, &["rent".to_string()]);
        assert_eq!(ids(&rentals), vec!["4"]);
    }

    #[test]
    fn test_filter_by_location() {
        let all = sample_listings();
        assert_eq!(filter_by_location(&all, Some("Selangor"), None).len(), 3);
        assert_eq!(
            ids(&filter_by_location(&all, Some("Selangor"), Some("Petaling Jaya"))),
            vec!["1", "6"]
        );
        assert_eq!(ids(&filter_by_location(&all, None, Some("Cheras"))), vec!["4"]);
        assert!(filter_by_location(&all, Some("Sabah"), None).is_empty());
    }

    #[test]
    fn test_filter_by_search_matches_name_and_address() {
        let all = sample_listings();
        assert_eq!(ids(&filter_by_search(&all, "  VISTA ")), vec!["1", "6"]);
        assert_eq!(ids(&filter_by_search(&all, "3 jalan")), vec!["3"]);
        assert_eq!(filter_by_search(&all, "   ").len(), all.len());
    }

    #[test]
    fn test_apply_filters_composes_predicates() {
        let all = sample_listings();
        let filters = FilterSet {
            search: "vista".to_string(),
            max_price: Some(1000000.0),
            types: vec!["condominium".to_string()],
            state: Some("Selangor".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&all, &filters)), vec!["1"]);
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn test_apply_filters_default_is_identity() {
        let all = sample_listings();
        assert_eq!(apply_filters(&all, &FilterSet::default()), all);
    }

    #[test]
    fn test_get_unique_values_sorted_and_distinct() {
        let all = sample_listings();
        assert_eq!(
            get_unique_values(&all, PropertyField::Type),
            vec!["bungalow", "condominium", "room", "terrace"]
        );
        assert_eq!(
            get_unique_values(&all, PropertyField::State),
            vec!["Kuala Lumpur", "Penang", "Selangor"]
        );
        assert!(get_unique_values(&all, PropertyField::Furnishings).is_empty());
    }

    #[test]
    fn test_get_cities_for_state() {
        let all = sample_listings();
        assert_eq!(
            get_cities_for_state(&all, Some("Selangor")),
            vec!["Petaling Jaya", "Shah Alam"]
        );
        assert_eq!(get_cities_for_state(&all, None).len(), 5);
        assert_eq!(get_cities_for_state(&all, Some("")).len(), 5);
        assert!(get_cities_for_state(&all, Some("Sabah")).is_empty());
    }
}
