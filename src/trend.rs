//! Year-keyed price trends and the growth calculation over them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Year label to price, as returned by the backend (`{"2019": 5000000}`).
///
/// Only finite, non-negative numeric prices are kept. Labels are stored as
/// received and parsed to years by [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct PriceTrend(BTreeMap<String, f64>);

impl PriceTrend {
    pub fn new() -> PriceTrend {
        PriceTrend(BTreeMap::new())
    }

    /// Returns false (and stores nothing) for a negative or non-finite price.
    pub fn insert(&mut self, label: impl Into<String>, price: f64) -> bool {
        if !is_valid_price(price) {
            return false;
        }
        self.0.insert(label.into(), price);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, price)| (label.as_str(), *price))
    }
}

impl From<BTreeMap<String, Value>> for PriceTrend {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let mut trend = PriceTrend::new();
        for (label, value) in raw {
            if let Some(price) = value.as_f64() {
                trend.insert(label, price);
            }
        }
        trend
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PriceTrend {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut trend = PriceTrend::new();
        for (label, price) in iter {
            trend.insert(label, price);
        }
        trend
    }
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// A single point of a normalized trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub year: i32,
    pub price: f64,
}

impl TrendEntry {
    pub fn new(year: i32, price: f64) -> TrendEntry {
        TrendEntry { year, price }
    }
}

/// Orders a trend by numeric year.
///
/// Missing or empty input gives an empty vec. Labels that do not parse as a
/// year are skipped. When two labels parse to the same year the
/// lexicographically greater label wins, so years stay strictly increasing.
pub fn normalize(trend: Option<&PriceTrend>) -> Vec<TrendEntry> {
    let Some(trend) = trend else {
        return Vec::new();
    };

    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for (label, price) in trend.iter() {
        if let Some(year) = parse_year(label) {
            by_year.insert(year, price);
        }
    }

    by_year
        .into_iter()
        .map(|(year, price)| TrendEntry::new(year, price))
        .collect()
}

// Integral float labels such as "2020.0" or "2e3" count as years too.
fn parse_year(label: &str) -> Option<i32> {
    let label = label.trim();
    if let Ok(year) = label.parse::<i32>() {
        return Some(year);
    }
    let value = label.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

pub fn latest(trend: &[TrendEntry]) -> Option<&TrendEntry> {
    trend.last()
}

/// The entry exactly `years` before the latest one. No nearest-year fallback.
pub fn entry_years_before(trend: &[TrendEntry], years: i32) -> Option<&TrendEntry> {
    let latest = latest(trend)?;
    trend
        .iter()
        .find(|entry| latest.year.checked_sub(entry.year) == Some(years))
}

/// Percentage growth over `window_years`, rounded to two decimals.
///
/// `None` means there is not enough data: fewer than two entries, a
/// non-positive window, no entry exactly `window_years` before the latest one,
/// or a zero baseline.
pub fn compute_growth(trend: &[TrendEntry], window_years: i32) -> Option<f64> {
    if trend.len() < 2 || window_years <= 0 {
        return None;
    }
    let latest = latest(trend)?;
    let base = entry_years_before(trend, window_years)?;
    percent_change(base.price, latest.price)
}

/// `(latest - base) / base * 100` rounded to two decimals, `None` on a zero base.
pub fn percent_change(base: f64, latest: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some(round2((latest - base) / base * 100.0))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(points: &[(&str, f64)]) -> PriceTrend {
        points.iter().map(|(label, price)| (*label, *price)).collect()
    }

    #[test]
    fn test_normalize_sorts_by_numeric_year() {
        let t = trend(&[("2022", 8.0), ("999", 1.0), ("2019", 5.0), ("2020", 6.0)]);
        let entries = normalize(Some(&t));
        let years: Vec<i32> = entries.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![999, 2019, 2020, 2022]);
        assert_eq!(entries[0].price, 1.0);
    }

    #[test]
    fn test_normalize_missing_or_empty() {
        assert!(normalize(None).is_empty());
        assert!(normalize(Some(&PriceTrend::new())).is_empty());
    }

    #[test]
    fn test_normalize_skips_non_numeric_labels() {
        let t = trend(&[("2020", 1.0), ("latest", 2.0), ("", 3.0), (" 2021 ", 4.0)]);
        let entries = normalize(Some(&t));
        assert_eq!(entries, vec![TrendEntry::new(2020, 1.0), TrendEntry::new(2021, 4.0)]);
    }

    #[test]
    fn test_normalize_accepts_integral_float_labels() {
        let t = trend(&[("2020.0", 1.0), ("2e3", 2.0), ("2021.5", 3.0), ("NaN", 4.0), ("inf", 5.0)]);
        let entries = normalize(Some(&t));
        assert_eq!(entries, vec![TrendEntry::new(2000, 2.0), TrendEntry::new(2020, 1.0)]);
    }

    #[test]
    fn test_growth_with_extreme_years_does_not_overflow() {
        let t = normalize(Some(&trend(&[("-2147483648", 1.0), ("2147483647", 2.0)])));
        assert_eq!(t.len(), 2);
        for window in [1, 3, 5] {
            assert_eq!(compute_growth(&t, window), None);
        }
        assert_eq!(entry_years_before(&t, 3), None);
    }

    #[test]
    fn test_normalize_duplicate_years_stay_strict() {
        let t = trend(&[("2020", 1.0), ("02020", 2.0), ("2021", 3.0)]);
        let entries = normalize(Some(&t));
        assert_eq!(entries, vec![TrendEntry::new(2020, 1.0), TrendEntry::new(2021, 3.0)]);
    }

    #[test]
    fn test_normalize_does_not_mutate_input() {
        let t = trend(&[("2022", 8.0), ("x", 1.0)]);
        let before = t.clone();
        let _ = normalize(Some(&t));
        assert_eq!(t, before);
    }

    #[test]
    fn test_deserialize_drops_invalid_prices() {
        let t: PriceTrend =
            serde_json::from_str(r#"{"2019": 5000000, "2020": "n/a", "2021": -5, "2022": 8000000.5}"#)
                .unwrap();
        assert_eq!(t.len(), 2);
        let entries = normalize(Some(&t));
        assert_eq!(entries.last(), Some(&TrendEntry::new(2022, 8000000.5)));
    }

    #[test]
    fn test_insert_rejects_invalid_prices() {
        let mut t = PriceTrend::new();
        assert!(!t.insert("2020", -1.0));
        assert!(!t.insert("2020", f64::NAN));
        assert!(t.insert("2020", 0.0));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn test_growth_over_exact_window() {
        let t = normalize(Some(&trend(&[("2019", 5_000_000.0), ("2022", 8_000_000.0)])));
        assert_eq!(compute_growth(&t, 3), Some(60.0));
    }

    #[test]
    fn test_growth_requires_exact_match() {
        let t = normalize(Some(&trend(&[("2020", 5_000_000.0), ("2022", 8_000_000.0)])));
        assert_eq!(compute_growth(&t, 3), None);
    }

    #[test]
    fn test_growth_needs_two_entries() {
        let single = vec![TrendEntry::new(2022, 1.0)];
        for window in [1, 3, 5] {
            assert_eq!(compute_growth(&[], window), None);
            assert_eq!(compute_growth(&single, window), None);
        }
    }

    #[test]
    fn test_growth_zero_baseline() {
        let t = vec![TrendEntry::new(2021, 0.0), TrendEntry::new(2022, 100.0)];
        assert_eq!(compute_growth(&t, 1), None);
    }

    #[test]
    fn test_growth_non_positive_window() {
        let t = vec![TrendEntry::new(2021, 50.0), TrendEntry::new(2022, 100.0)];
        assert_eq!(compute_growth(&t, 0), None);
        assert_eq!(compute_growth(&t, -1), None);
    }

    #[test]
    fn test_growth_rounds_and_handles_decline() {
        let t = vec![
            TrendEntry::new(2021, 3_000_000.0),
            TrendEntry::new(2022, 2_000_000.0),
        ];
        assert_eq!(compute_growth(&t, 1), Some(-33.33));
        // Idempotent over an immutable trend
        assert_eq!(compute_growth(&t, 1), compute_growth(&t, 1));
    }

    #[test]
    fn test_entry_years_before() {
        let t = vec![
            TrendEntry::new(2017, 1.0),
            TrendEntry::new(2019, 2.0),
            TrendEntry::new(2022, 3.0),
        ];
        assert_eq!(entry_years_before(&t, 3), Some(&TrendEntry::new(2019, 2.0)));
        assert_eq!(entry_years_before(&t, 4), None);
        assert_eq!(entry_years_before(&[], 1), None);
    }
}
