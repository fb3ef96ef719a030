/// A named price range shortcut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePreset {
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub const PRICE_PRESETS: [PricePreset; 6] = [
    PricePreset { label: "Any", min: None, max: None },
    PricePreset { label: "< 500K", min: None, max: Some(500_000.0) },
    PricePreset { label: "500K - 1M", min: Some(500_000.0), max: Some(1_000_000.0) },
    PricePreset { label: "1M - 2M", min: Some(1_000_000.0), max: Some(2_000_000.0) },
    PricePreset { label: "2M - 5M", min: Some(2_000_000.0), max: Some(5_000_000.0) },
    PricePreset { label: "5M+", min: Some(5_000_000.0), max: None },
];

/// Choices offered for a custom lower bound
pub const MIN_PRICE_OPTIONS: [f64; 11] = [
    100_000.0, 200_000.0, 300_000.0, 400_000.0, 500_000.0, 750_000.0, 1_000_000.0, 1_500_000.0,
    2_000_000.0, 3_000_000.0, 5_000_000.0,
];

/// Choices offered for a custom upper bound
pub const MAX_PRICE_OPTIONS: [f64; 11] = [
    200_000.0, 300_000.0, 400_000.0, 500_000.0, 750_000.0, 1_000_000.0, 1_500_000.0, 2_000_000.0,
    3_000_000.0, 5_000_000.0, 10_000_000.0,
];

/// Look a preset up by label, ignoring case and surrounding whitespace
pub fn find_preset(label: &str) -> Option<&'static PricePreset> {
    let label = label.trim();
    PRICE_PRESETS
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(label))
}

/// The preset exactly matching the current bounds, if any
pub fn active_preset(min: Option<f64>, max: Option<f64>) -> Option<&'static PricePreset> {
    PRICE_PRESETS.iter().find(|p| p.min == min && p.max == max)
}

/// Short label for an option value ("RM 750K", "RM 1.5M")
pub fn price_option_label(value: f64) -> String {
    if value >= 1_000_000.0 {
        let millions = value / 1_000_000.0;
        if millions.fract() == 0.0 {
            format!("RM {}M", millions)
        } else {
            format!("RM {:.1}M", millions)
        }
    } else {
        format!("RM {:.0}K", value / 1000.0)
    }
}

/// Summary shown for a range that is not one of the presets
pub fn custom_range_summary(min: Option<f64>, max: Option<f64>) -> Option<String> {
    if active_preset(min, max).is_some() {
        return None;
    }
    let k = |v: f64| format!("RM {:.0}K", v / 1000.0);
    match (min, max) {
        (Some(min), Some(max)) => Some(format!("{} - {}", k(min), k(max))),
        (Some(min), None) => Some(format!("From {}", k(min))),
        (None, Some(max)) => Some(format!("Up to {}", k(max))),
        (None, None) => None,
    }
}
