//! Presentation helpers: Indian currency units, growth labels and chart series.

use crate::trend::TrendEntry;
use serde::Serialize;

pub const LAKH: f64 = 1_00_000.0;
pub const CRORE: f64 = 1_00_00_000.0;

/// Placeholder shown wherever a growth figure cannot be computed.
pub const NOT_ENOUGH_DATA: &str = "Not enough data";

/// Two-tier rendering: crores from one crore upwards, lakhs below.
pub fn format_currency(amount: f64) -> String {
    if amount >= CRORE {
        format!("₹{:.2} Cr", amount / CRORE)
    } else {
        format!("₹{:.2} L", amount / LAKH)
    }
}

/// Full amount with Indian digit grouping, e.g. `1,25,00,000`.
///
/// At most three fraction digits are kept and trailing zeros are dropped.
pub fn format_inr(value: f64) -> String {
    let formatted = format!("{:.3}", value.abs());
    let (integer_part, decimal_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let decimal_part = decimal_part.trim_end_matches('0');

    let sign = if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    if decimal_part.is_empty() {
        format!("{sign}{}", group_indian(integer_part))
    } else {
        format!("{sign}{}.{decimal_part}", group_indian(integer_part))
    }
}

// Last three digits form the first group, every group above it has two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<String> = head
        .chars()
        .rev()
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|chunk| chunk.iter().rev().collect::<String>())
        .collect();
    groups.reverse();
    groups.push(tail.to_string());
    groups.join(",")
}

pub fn format_growth(percentage: Option<f64>) -> String {
    match percentage {
        Some(p) => format!("{p}%"),
        None => NOT_ENOUGH_DATA.to_string(),
    }
}

/// Label/value series handed to a chart renderer. Values are in whole lakhs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

impl ChartSeries {
    pub fn from_trend(trend: &[TrendEntry]) -> ChartSeries {
        ChartSeries {
            label: "Value (₹ Lakhs)".to_string(),
            labels: trend.iter().map(|entry| entry.year.to_string()).collect(),
            values: trend
                .iter()
                .map(|entry| (entry.price / LAKH).round() as i64)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A chart needs at least two points to draw a line.
    pub fn is_drawable(&self) -> bool {
        self.len() > 1
    }

    pub fn tooltip(&self, index: usize) -> Option<String> {
        self.values.get(index).map(|v| format!("₹{v} Lakhs"))
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, i64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
