use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use super::NOT_AVAILABLE;

/// A backend timestamp resolved to UTC. Date-only values carry no time.
fn parse_utc(raw: &str) -> Option<(Date, Option<Time>)> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if !raw.contains(['T', 't', ' ']) {
        return raw.parse::<Date>().ok().map(|date| (date, None));
    }

    if let Ok(ts) = raw.parse::<Timestamp>() {
        let dt = ts.to_zoned(TimeZone::UTC).datetime();
        return Some((dt.date(), Some(dt.time())));
    }
    // Naive values are taken to be UTC already
    raw.parse::<DateTime>()
        .ok()
        .map(|dt| (dt.date(), Some(dt.time())))
}

/// `Mar 05, 2024`, or "N/A" for missing or unparsable input
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(parse_utc)
        .map(|(date, _)| date.strftime("%b %d, %Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `02:30 PM`, or "N/A" when the input has no time component
pub fn format_time(raw: Option<&str>) -> String {
    raw.and_then(parse_utc)
        .and_then(|(_, time)| time)
        .map(|time| time.strftime("%I:%M %p").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Amount with two decimals and thousands separators
pub fn format_amount(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, cents % 100)
}

/// The value, or `fallback` when missing or blank
pub fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
