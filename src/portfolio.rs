use crate::growth::{GrowthResult, GrowthWindow};
use crate::property::Property;
use crate::trend::{entry_years_before, latest, normalize, percent_change, PriceTrend, TrendEntry};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Window used for the portfolio-wide appreciation figure.
pub const SUMMARY_WINDOW_YEARS: i32 = 3;

/// Portfolio-level totals derived from a list of properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_base: f64,
    pub aggregate_growth_percent: Option<f64>,
    pub total_area: f64,
}

/// Sums latest and three-years-earlier prices across all properties.
///
/// A property without trend data contributes 0 to both sums. The baseline of
/// each property is taken relative to its own latest year.
pub fn summarize(properties: &[Property]) -> PortfolioSummary {
    let mut total_value = 0.0;
    let mut total_base = 0.0;
    let mut total_area = 0.0;

    for property in properties {
        let trend = property.trend();
        total_value += latest(&trend).map_or(0.0, |entry| entry.price);
        total_base += entry_years_before(&trend, SUMMARY_WINDOW_YEARS).map_or(0.0, |entry| entry.price);
        total_area += property.size;
    }

    PortfolioSummary {
        total_value,
        total_base,
        aggregate_growth_percent: percent_change(total_base, total_value),
        total_area,
    }
}

/// Aggregate view over all of a user's properties. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub total_value: f64,
    #[serde(default, deserialize_with = "ordered_trend")]
    pub price_trend: Vec<TrendEntry>,
}

impl Portfolio {
    /// Builds the portfolio locally by summing property prices per year.
    pub fn from_properties(properties: &[Property]) -> Portfolio {
        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for property in properties {
            for entry in property.trend() {
                *by_year.entry(entry.year).or_insert(0.0) += entry.price;
            }
        }

        Portfolio {
            total_value: summarize(properties).total_value,
            price_trend: by_year
                .into_iter()
                .map(|(year, price)| TrendEntry::new(year, price))
                .collect(),
        }
    }

    pub fn growth(&self, window: GrowthWindow) -> GrowthResult {
        window.result(&self.price_trend)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrend {
    List(Vec<RawTrendEntry>),
    Map(PriceTrend),
}

#[derive(Deserialize)]
struct RawTrendEntry {
    year: Value,
    price: Value,
}

// The portfolio endpoint sends `[{year: "2020", price: ..}]`; older payloads
// use the same year -> price object as a single property.
fn ordered_trend<'de, D>(deserializer: D) -> Result<Vec<TrendEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let trend = match Option::<RawTrend>::deserialize(deserializer)? {
        Some(RawTrend::Map(trend)) => trend,
        Some(RawTrend::List(entries)) => {
            let mut trend = PriceTrend::new();
            for entry in entries {
                let label = match entry.year {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    _ => continue,
                };
                if let Some(price) = entry.price.as_f64() {
                    trend.insert(label, price);
                }
            }
            trend
        }
        None => return Ok(Vec::new()),
    };
    Ok(normalize(Some(&trend)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortfolioBody {
    Envelope { data: Portfolio },
    Bare(Portfolio),
}

/// Parses a portfolio response, with or without the `{"data": ..}` envelope.
pub fn from_string(data: &str) -> Result<Portfolio, serde_json::Error> {
    let body: PortfolioBody = serde_json::from_str(data)?;
    Ok(match body {
        PortfolioBody::Envelope { data } => data,
        PortfolioBody::Bare(portfolio) => portfolio,
    })
}
