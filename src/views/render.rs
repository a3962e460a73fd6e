//! Small text formatting helpers shared by the views.

use chrono::{DateTime, Utc};

pub fn heading(title: &str) -> String {
    format!("{title}\n{}\n", "=".repeat(title.chars().count()))
}

pub fn section(title: &str) -> String {
    format!("\n{title}\n{}\n", "-".repeat(title.chars().count()))
}

/// Whole lira with thousands separators, e.g. `25.000 TL`
pub fn money(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{grouped} TL")
}

pub fn date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub fn optional_date(value: Option<&DateTime<Utc>>) -> String {
    value.map(date).unwrap_or_else(|| "-".to_string())
}

/// `label: value` padded to a common width
pub fn field(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {label:<14} {value}\n")
}
