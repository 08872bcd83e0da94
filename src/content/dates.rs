use crate::model::{DatePoint, Period};

use super::labels::{Labels, capitalize};

const BASE_MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

const DUTCH_MONTHS: [&str; 12] = [
    "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus", "september",
    "oktober", "november", "december",
];

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Zero-based month index for English names or prefixes, Dutch names, or 1..=12.
pub fn month_index(month: &str) -> Option<usize> {
    let input = month.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }
    BASE_MONTHS
        .iter()
        .position(|m| *m == input || m.starts_with(input.as_str()))
        .or_else(|| DUTCH_MONTHS.iter().position(|m| *m == input))
        .or_else(|| {
            input
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=12).contains(n))
                .map(|n| n - 1)
        })
}

/// "Mar 2021". Empty when month or year is missing; unknown months render verbatim.
/// Short month names can be overridden with the `month.N` labels (N = 1..=12).
pub fn format_date(point: &DatePoint, labels: &Labels) -> String {
    let month = point.month.trim();
    let year = point.year.trim();
    if month.is_empty() || year.is_empty() {
        return String::new();
    }
    match month_index(month) {
        Some(i) => {
            let key = format!("month.{}", i + 1);
            let short = labels.lookup(&key).unwrap_or(SHORT_MONTHS[i]);
            format!("{} {year}", capitalize(short))
        }
        None => format!("{} {year}", capitalize(month)),
    }
}

pub fn format_period(period: &Period, labels: &Labels, separator: &str) -> String {
    let start = format_date(&period.start, labels);
    let end = if period.current {
        labels.get("current").to_string()
    } else {
        format_date(&period.end, labels)
    };
    [start, end]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
