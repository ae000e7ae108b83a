//! Display labels for booking views.
//!
//! Month names come from a fixed table rather than the process locale, so
//! labels are identical on every host.

use chrono::{Datelike, NaiveDate};

const MONTH_ABBREVIATIONS: [(&str, &str); 12] = [
    ("Jan", "Jan"),
    ("Feb", "Feb"),
    ("Mar", "Mar"),
    ("Apr", "Apr"),
    ("May", "Mei"),
    ("Jun", "Jun"),
    ("Jul", "Jul"),
    ("Aug", "Agu"),
    ("Sep", "Sep"),
    ("Oct", "Okt"),
    ("Nov", "Nov"),
    ("Dec", "Des"),
];

/// Maps an English three-letter month abbreviation to its Indonesian form.
pub fn translate_month(abbreviation: &str) -> Option<&'static str> {
    MONTH_ABBREVIATIONS
        .iter()
        .find(|(english, _)| *english == abbreviation)
        .map(|(_, local)| *local)
}

/// Two-digit day followed by the local month abbreviation, e.g. `"17 Agu"`.
pub fn booking_date_label(date: NaiveDate) -> String {
    let english = date.format("%b").to_string();
    let month = translate_month(&english).unwrap_or(english.as_str());
    format!("{:02} {}", date.day(), month)
}

/// Parses an ISO `YYYY-MM-DD` date and renders it with [`booking_date_label`].
pub fn convert_month_name(input: &str) -> Option<String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(booking_date_label)
}

/// Formats an amount as rupiah with dot thousands separators: `Rp. 150.000`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-Rp. {}", grouped)
    } else {
        format!("Rp. {}", grouped)
    }
}
