use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder for optional fields the backend did not send
pub const NOT_AVAILABLE: &str = "N/A";

const VOLUME_UNITS: [(u64, &str); 3] = [
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

const MARKET_CAP_UNITS: [(u64, &str); 3] = [
    (1_000_000_000_000, "T"),
    (1_000_000_000, "B"),
    (1_000_000, "M"),
];

/// Round half away from zero and pad to exactly `dp` fraction digits.
///
/// Values already using all 28 significant digits (near `Decimal::MAX`) have
/// no room for padding and come back with fewer fraction digits.
fn fixed(value: Decimal, dp: u32) -> Decimal {
    let mut value = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(dp);
    value
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn scaled(value: u64, units: &[(u64, &str)]) -> Option<String> {
    units
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(threshold, suffix)| {
            let short = fixed(Decimal::from(value) / Decimal::from(*threshold), 1);
            format!("{short}{suffix}")
        })
}

/// US-dollar currency with two fraction digits
/// Example: 2750.1 → $2,750.10, -3 → -$3.00, -0.001 → -$0.00
pub fn format_currency(value: Decimal) -> String {
    let rounded = fixed(value, 2);
    let sign = if value < Decimal::ZERO { "-" } else { "" };
    let text = rounded.abs().to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{fraction}", group_thousands(integer))
}

/// Signed percentage, `+` for zero and above
/// Example: 2.15 → +2.15%, -1.25 → -1.25%, -0.004 → -0.00%
pub fn format_percent(value: Decimal) -> String {
    let rounded = fixed(value, 2).abs();
    let sign = if value >= Decimal::ZERO { "+" } else { "-" };
    format!("{sign}{rounded}%")
}

/// Volume with B/M/K suffix, plain integer below one thousand
/// Example: 12500000 → 12.5M
pub fn format_volume(volume: u64) -> String {
    scaled(volume, &VOLUME_UNITS).unwrap_or_else(|| volume.to_string())
}

/// Market capitalisation with T/B/M suffix and a USD label
/// Example: 2400000000000 → 2.4T USD
pub fn format_market_cap(market_cap: u64) -> String {
    let short = scaled(market_cap, &MARKET_CAP_UNITS).unwrap_or_else(|| market_cap.to_string());
    format!("{short} USD")
}

/// Ratio with one fraction digit, e.g. a P/E of 28.43 → 28.4
pub fn format_ratio(value: Decimal) -> String {
    fixed(value, 1).to_string()
}
