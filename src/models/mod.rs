use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Agent account a listing is published under
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Account {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub raw_data: Map<String, Value>,
}

/// Core property data model, as served by the listing API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub property_type: Option<String>,
    /// `sale` or `rent`
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bed_rooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub bath_rooms: Option<f64>,
    /// Built-up size in sq ft
    #[serde(default, deserialize_with = "lenient_number")]
    pub floor_size: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub land_size: Option<f64>,
    #[serde(default)]
    pub furnishings: Option<String>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub image: Option<String>,
    /// Everything else the API sends, kept so records round-trip
    #[serde(flatten)]
    pub raw_data: Map<String, Value>,
}

/// Text fields that facets can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyField {
    Type,
    Category,
    State,
    City,
    Furnishings,
}

impl Property {
    /// Value of a text field, `None` when missing or empty
    pub fn field(&self, field: PropertyField) -> Option<&str> {
        let value = match field {
            PropertyField::Type => self.property_type.as_deref(),
            PropertyField::Category => self.category.as_deref(),
            PropertyField::State => self.state.as_deref(),
            PropertyField::City => self.city.as_deref(),
            PropertyField::Furnishings => self.furnishings.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    pub fn agent_name(&self) -> &str {
        self.account
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or("Agent")
    }

    pub fn is_for_sale(&self) -> bool {
        self.category.as_deref() == Some("sale")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// Accepts numbers, numeric strings ("1,200") and null.
/// Anything that does not parse to a finite value becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite()))
}

/// Pagination metadata, both for API envelopes and local pages
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMeta {
    pub total_count: usize,
    pub page_count: usize,
    pub current_page: usize,
    pub per_page: usize,
}

/// One page of the listing API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub items: Vec<Property>,
    #[serde(rename = "_meta", default)]
    pub meta: PageMeta,
}

/// Server-side sort order, forwarded as the `sort` query parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Latest first
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Default, SortOrder::PriceAsc, SortOrder::PriceDesc];

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Default => "",
            SortOrder::PriceAsc => "price",
            SortOrder::PriceDesc => "-price",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Default => "Default (Latest)",
            SortOrder::PriceAsc => "Price: Low to High",
            SortOrder::PriceDesc => "Price: High to Low",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == SortOrder::Default
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "" => Ok(SortOrder::Default),
            "price" => Ok(SortOrder::PriceAsc),
            "-price" => Ok(SortOrder::PriceDesc),
            other => bail!("Unknown sort order '{}' (expected 'price' or '-price')", other),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The set of client-side filters applied to the listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSet {
    /// Free text matched against name and address
    pub search: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl FilterSet {
    pub fn search_text(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref().filter(|s| !s.is_empty())
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }

    pub fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    pub fn has_location(&self) -> bool {
        self.state().is_some() || self.city().is_some()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Search, price range, types, categories and location count once each
    pub fn active_filter_count(&self) -> usize {
        [
            self.search_text().is_some(),
            self.has_price_range(),
            !self.types.is_empty(),
            !self.categories.is_empty(),
            self.has_location(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

/// A named filter set kept in the local store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub filters: FilterSet,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_deserializes_api_record() {
        let property: Property = serde_json::from_value(json!({
            "id": 1042,
            "name": "Residensi Vista",
            "type": "condominium",
            "category": "sale",
            "price": 650000,
            "state": "Selangor",
            "city": "Petaling Jaya",
            "bedRooms": 3,
            "bathRooms": "2",
            "floorSize": "1,200",
            "landSize": null,
            "account": { "name": "Aisyah Realty", "id": 7 },
            "image": "https://img.example/1042.jpg",
            "tenure": "freehold"
        }))
        .unwrap();

        assert_eq!(property.id, "1042");
        assert_eq!(property.property_type.as_deref(), Some("condominium"));
        assert_eq!(property.price, Some(650000.0));
        assert_eq!(property.bath_rooms, Some(2.0));
        assert_eq!(property.floor_size, Some(1200.0));
        assert_eq!(property.land_size, None);
        assert_eq!(property.agent_name(), "Aisyah Realty");
        assert!(property.is_for_sale());
        assert_eq!(property.raw_data.get("tenure"), Some(&json!("freehold")));
    }

    #[test]
    fn test_non_finite_numeric_strings_are_dropped() {
        let property: Property = serde_json::from_value(json!({
            "id": "x",
            "price": "NaN",
            "bedRooms": "inf",
            "floorSize": "-Infinity",
            "landSize": "abc"
        }))
        .unwrap();

        assert_eq!(property.price, None);
        assert_eq!(property.bed_rooms, None);
        assert_eq!(property.floor_size, None);
        assert_eq!(property.land_size, None);
    }

    #[test]
    fn test_property_field_skips_empty_values() {
        let property: Property =
            serde_json::from_value(json!({ "id": "a", "state": "", "city": "Ipoh" })).unwrap();
        assert_eq!(property.field(PropertyField::State), None);
        assert_eq!(property.field(PropertyField::City), Some("Ipoh"));
        assert_eq!(property.agent_name(), "Agent");
    }

    #[test]
    fn test_listing_page_without_meta() {
        let page: ListingPage = serde_json::from_value(json!({ "items": [] })).unwrap();
        assert_eq!(page.meta.page_count, 0);
    }

    #[test]
    fn test_sort_order_params() {
        for sort in SortOrder::ALL {
            assert_eq!(sort.as_param().parse::<SortOrder>().unwrap(), sort);
        }
        assert!("newest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_active_filter_count() {
        let mut filters = FilterSet::default();
        assert!(!filters.has_active_filters());

        filters.search = "   ".to_string();
        assert_eq!(filters.active_filter_count(), 0);

        filters.search = "vista".to_string();
        filters.min_price = Some(100000.0);
        filters.max_price = Some(500000.0);
        filters.state = Some("Johor".to_string());
        filters.city = Some("Johor Bahru".to_string());
        assert_eq!(filters.active_filter_count(), 3);
    }

    #[test]
    fn test_filter_set_reads_legacy_saved_shape() {
        let filters: FilterSet = serde_json::from_value(json!({
            "search": "",
            "minPrice": null,
            "maxPrice": 500000,
            "types": ["condominium"],
            "state": null,
            "city": null
        }))
        .unwrap();
        assert_eq!(filters.max_price, Some(500000.0));
        assert!(filters.categories.is_empty());

        let encoded = serde_json::to_value(&filters).unwrap();
        assert!(encoded.get("categories").is_none());
        assert_eq!(encoded["minPrice"], Value::Null);
    }
}
