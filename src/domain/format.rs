// src/domain/format.rs

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Odometer reading Tesla writes onto every car before the customer sees
/// it. A reported odometer at this value is pre-delivery test driving,
/// not real usage.
pub const PRE_DELIVERY_TEST_ODOMETER: f64 = 30.0;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

static WINDOW_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(?P<day_first>\d{1,2})(?:st|nd|rd|th)?\s+(?P<month_first>[A-Za-z]{3,})|(?P<month_second>[A-Za-z]{3,})\s+(?P<day_second>\d{1,2})(?:st|nd|rd|th)?)",
    )
    .unwrap()
});

const MONTH_ABBREVIATIONS: &[(&str, &str)] = &[
    ("JAN", "Jan"),
    ("JANUARY", "Jan"),
    ("FEB", "Feb"),
    ("FEBRUARY", "Feb"),
    ("MAR", "Mar"),
    ("MARCH", "Mar"),
    ("APR", "Apr"),
    ("APRIL", "Apr"),
    ("MAY", "May"),
    ("JUN", "Jun"),
    ("JUNE", "Jun"),
    ("JUL", "Jul"),
    ("JULY", "Jul"),
    ("AUG", "Aug"),
    ("AUGUST", "Aug"),
    ("SEP", "Sep"),
    ("SEPT", "Sep"),
    ("SEPTEMBER", "Sep"),
    ("OCT", "Oct"),
    ("OCTOBER", "Oct"),
    ("NOV", "Nov"),
    ("NOVEMBER", "Nov"),
    ("DEC", "Dec"),
    ("DECEMBER", "Dec"),
];

/// Parse an ISO-8601-ish timestamp the way the upstream sends them: with or
/// without a zone offset, with or without a time part, trailing `Z` allowed.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if let Some(stripped) = trimmed.strip_suffix('Z') {
        format!("{stripped}+00:00")
    } else {
        trimmed.to_string()
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

/// Format a timestamp as `05 Mar 2024 14:30`. Upstream sometimes sends
/// pre-formatted display text in the same slot, so parse failure returns
/// the input unchanged instead of erroring.
pub fn format_timestamp(raw: &str) -> String {
    match parse_datetime(raw) {
        Some(dt) => dt.format("%d %b %Y %H:%M").to_string(),
        None => raw.trim().to_string(),
    }
}

/// Date-only variant: the first three tokens of the full format.
pub fn format_date_only(raw: &str) -> String {
    let formatted = format_timestamp(raw);
    let tokens: Vec<&str> = formatted.split_whitespace().collect();
    if tokens.len() >= 3 {
        tokens[..3].join(" ")
    } else {
        formatted
    }
}

/// Extract the first signed decimal number from free text. Non-finite
/// results count as absent.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let m = LEADING_NUMBER.find(text)?;
    m.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let bytes = digits.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Render a number with thousands separators; two decimals unless the
/// value is within 0.01 of an integer.
fn format_number(numeric: f64) -> String {
    if (numeric - numeric.round()).abs() < 0.01 {
        let rounded = numeric.round() as i64;
        let digits = rounded.unsigned_abs().to_string();
        let grouped = group_thousands(&digits);
        if rounded < 0 {
            format!("-{grouped}")
        } else {
            grouped
        }
    } else {
        let fixed = format!("{:.2}", numeric.abs());
        let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let grouped = group_thousands(whole);
        if numeric < 0.0 {
            format!("-{grouped}.{frac}")
        } else {
            format!("{grouped}.{frac}")
        }
    }
}

fn normalize_mileage_unit(unit: Option<&str>) -> &str {
    let token = unit.unwrap_or("mi").trim();
    match token.to_lowercase().as_str() {
        "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => "km",
        "mi" | "mile" | "miles" => "mi",
        "" => "mi",
        _ => token,
    }
}

/// Format an odometer/mileage reading with its unit. The value may carry
/// thousands separators or trailing text; non-numeric input is returned
/// trimmed, as-is.
pub fn format_mileage(value: &str, unit: Option<&str>) -> Option<String> {
    let text = value.trim();
    if text.is_empty() {
        return None;
    }
    let first_token = text.replace(',', "");
    let token = first_token.split_whitespace().next()?;
    let numeric = match token.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => return Some(text.to_string()),
    };
    Some(format!(
        "{} {}",
        format_number(numeric),
        normalize_mileage_unit(unit)
    ))
}

/// Format a currency amount, prefixing the currency code when supplied.
/// Unparseable amounts fall back to the raw text.
pub fn format_currency(amount: &str, currency: Option<&str>) -> Option<String> {
    let text = amount.trim();
    if text.is_empty() {
        return None;
    }
    let formatted = match text.parse::<f64>() {
        Ok(n) if n.is_finite() => {
            let fixed = format!("{:.2}", n.abs());
            let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
            let grouped = group_thousands(whole);
            if n < 0.0 {
                format!("-{grouped}.{frac}")
            } else {
                format!("{grouped}.{frac}")
            }
        }
        _ => text.to_string(),
    };
    match currency {
        Some(code) if !code.trim().is_empty() => Some(format!("{} {}", code.trim(), formatted)),
        _ => Some(formatted),
    }
}

/// Canonical 3-letter month form for a free-text month token.
pub fn abbreviate_month_token(token: &str) -> Option<String> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Some((_, abbrev)) = MONTH_ABBREVIATIONS.iter().find(|(k, _)| *k == cleaned) {
        return Some((*abbrev).to_string());
    }
    let prefix: String = cleaned.chars().take(3).collect();
    if let Some((_, abbrev)) = MONTH_ABBREVIATIONS.iter().find(|(k, _)| *k == prefix) {
        return Some((*abbrev).to_string());
    }
    // Naive fallback: capitalize and truncate.
    let mut chars = cleaned.chars();
    let first = chars.next()?;
    let rest: String = chars.take(2).map(|c| c.to_ascii_lowercase()).collect();
    Some(format!("{first}{rest}"))
}

/// Shorten a free-text delivery window ("between March 3rd and 10 March")
/// to `03 Mar - 10 Mar`. Returns `None` unless two day/month pairs are
/// found; two identical endpoints render once.
pub fn shorten_delivery_window(value: &str) -> Option<String> {
    let text = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    let mut endpoints: Vec<(String, u32)> = Vec::new();
    for caps in WINDOW_DATE.captures_iter(&text) {
        let (day, month) = if let Some(day) = caps.name("day_first") {
            (day.as_str(), caps.name("month_first")?.as_str())
        } else {
            (
                caps.name("day_second")?.as_str(),
                caps.name("month_second")?.as_str(),
            )
        };
        let Some(month_abbrev) = abbreviate_month_token(month) else {
            continue;
        };
        let Ok(day_value) = day.parse::<u32>() else {
            continue;
        };
        endpoints.push((month_abbrev, day_value));
        if endpoints.len() >= 2 {
            break;
        }
    }

    if endpoints.len() < 2 {
        return None;
    }
    let start = format!("{:02} {}", endpoints[0].1, endpoints[0].0);
    let end = format!("{:02} {}", endpoints[1].1, endpoints[1].0);
    if start == end {
        Some(start)
    } else {
        Some(format!("{start} - {end}"))
    }
}

/// Replace underscores with spaces and title-case each word.
pub fn title_case(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>()
                        + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse an upstream status value to a stable token: uppercase, every
/// run of non-alphanumerics becomes one underscore, outer underscores
/// trimmed. `"in-progress"`, `"IN_PROGRESS"` and `"In   Progress"` all
/// land on `IN_PROGRESS`.
pub fn normalize_status_token(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_uppercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
