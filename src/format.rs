use chrono::{DateTime, NaiveDate};

pub const DEFAULT_TRUNCATE_LEN: usize = 50;

/// "RM 1,250,000"; listings without a price read "Price on Request"
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("RM {}", group_number(price)),
        None => "Price on Request".to_string(),
    }
}

/// "1,200 sq ft", or "-" when unknown
pub fn format_size(size: Option<f64>) -> String {
    match size {
        Some(size) if size != 0.0 => format!("{} sq ft", group_number(size)),
        _ => "-".to_string(),
    }
}

/// `semi_detached` -> "Semi Detached"
pub fn format_property_type(property_type: &str) -> String {
    property_type
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// ISO timestamp or date -> "5 Jan 2024"; unparsable input gives an empty string
pub fn format_date(date: &str) -> String {
    let date = date.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return timestamp.format("%-d %b %Y").to_string();
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%-d %b %Y").to_string())
        .unwrap_or_default()
}

/// Cut `text` to `max_len` characters, marking the cut with "..."
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_len).collect();
    format!("{}...", cut)
}

/// Thousands separators, at most two decimals, trailing zeros dropped
fn group_number(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.2}", value.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let fraction = fraction.trim_end_matches('0');
    let sign = if negative { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(1250000.0)), "RM 1,250,000");
        assert_eq!(format_price(Some(950.0)), "RM 950");
        assert_eq!(format_price(Some(1850.5)), "RM 1,850.5");
        assert_eq!(format_price(Some(0.0)), "RM 0");
        assert_eq!(format_price(None), "Price on Request");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(Some(1200.0)), "1,200 sq ft");
        assert_eq!(format_size(Some(0.0)), "-");
        assert_eq!(format_size(None), "-");
    }

    #[test]
    fn test_format_property_type() {
        assert_eq!(format_property_type("semi_detached"), "Semi Detached");
        assert_eq!(format_property_type("CONDOMINIUM"), "Condominium");
        assert_eq!(format_property_type(""), "");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05T10:30:00.000Z"), "5 Jan 2024");
        assert_eq!(format_date("2023-11-20"), "20 Nov 2023");
        assert_eq!(format_date("yesterday"), "");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", DEFAULT_TRUNCATE_LEN), "short");
        assert_eq!(truncate_text("Residensi Vista Ampang", 9), "Residensi...");
        assert_eq!(truncate_text("Kondominium Désa", 13), "Kondominium D...");
    }
}
