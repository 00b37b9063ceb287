//! Terminal rendering of properties, growth figures and chart series.

use crate::format::{format_currency, format_growth, format_inr, ChartSeries};
use crate::growth::{GrowthView, GrowthWindow};
use crate::portfolio::{PortfolioSummary, SUMMARY_WINDOW_YEARS};
use crate::property::Property;
use crate::trend::TrendEntry;
use comfy_table::{
    presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table,
};

const BAR_WIDTH: usize = 40;

fn new_table(width: u16) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);
    table
}

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn growth_cell(percentage: Option<f64>) -> Cell {
    let cell = Cell::new(format_growth(percentage)).set_alignment(CellAlignment::Right);
    match percentage {
        Some(p) if p >= 0.0 => cell.fg(Color::Green),
        Some(_) => cell.fg(Color::Red),
        None => cell,
    }
}

pub fn properties_table(properties: &[Property]) -> Table {
    let mut table = new_table(120);
    table.set_header(header(&["#", "Size", "Area", "Land", "Value", "3Y Growth"]));

    for (i, property) in properties.iter().enumerate() {
        let value = property
            .latest_value()
            .map(format_currency)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{} sqft", property.size)).set_alignment(CellAlignment::Right),
            Cell::new(property.area_type),
            Cell::new(property.land_type),
            Cell::new(value).set_alignment(CellAlignment::Right),
            growth_cell(property.growth(GrowthWindow::ThreeYears).percentage),
        ]);
    }
    table
}

/// One-line description of the whole portfolio.
pub fn summary_sentence(summary: &PortfolioSummary) -> String {
    let head = format!(
        "Your portfolio is currently worth {}, covers a total of {} sqft",
        format_currency(summary.total_value),
        format_inr(summary.total_area)
    );
    match summary.aggregate_growth_percent {
        Some(p) => format!("{head}, and has {p}% appreciation over the last {SUMMARY_WINDOW_YEARS} years."),
        None => format!("{head}, and no {SUMMARY_WINDOW_YEARS}-year growth data is available."),
    }
}

/// Growth for every window, starting with the one currently shown.
pub fn growth_table(trend: &[TrendEntry], view: GrowthView) -> Table {
    let mut table = new_table(64);
    table.set_header(header(&["Period", "Growth"]));
    for v in view.cycle() {
        table.add_row(vec![
            Cell::new(v.window.label()),
            growth_cell(v.result(trend).percentage),
        ]);
    }
    table
}

pub fn chart_table(series: &ChartSeries) -> Table {
    let mut table = new_table(80);
    table.set_header(header(&["Year", "₹ Lakhs", ""]));

    let max = series.values.iter().copied().max().unwrap_or(0).max(1);
    for (label, value) in series.points() {
        let len = (value.max(0) as f64 / max as f64 * BAR_WIDTH as f64) as usize;
        table.add_row(vec![
            Cell::new(label),
            Cell::new(value).set_alignment(CellAlignment::Right),
            Cell::new("█".repeat(len)).fg(Color::Cyan),
        ]);
    }
    table
}

/// The property detail view: facts, current value, growth and chart.
pub fn property_detail(index: usize, property: &Property, view: GrowthView) -> String {
    let trend = property.trend();
    let mut out = format!(
        "Property {}\nArea Type: {}\nLand Type: {}\nSize: {} sqft\n",
        index + 1,
        property.area_type,
        property.land_type,
        property.size
    );

    if let Some(latest) = trend.last() {
        out.push_str(&format!(
            "Estimated Current Value: ₹ {}\n",
            format_inr(latest.price)
        ));
    }

    out.push_str(&format!("{}\n", growth_table(&trend, view)));

    let series = ChartSeries::from_trend(&trend);
    if series.is_drawable() {
        out.push_str(&format!("{}\n{}", series.label, chart_table(&series)));
    } else {
        out.push_str("Data Unavailable: no price trend data available for this property yet.");
    }
    out
}
