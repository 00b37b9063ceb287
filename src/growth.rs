use crate::trend::{compute_growth, TrendEntry};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Lookback windows offered by the growth view, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum GrowthWindow {
    #[default]
    FiveYears,
    ThreeYears,
    OneYear,
}

impl GrowthWindow {
    pub fn all() -> &'static [GrowthWindow] {
        &[
            GrowthWindow::FiveYears,
            GrowthWindow::ThreeYears,
            GrowthWindow::OneYear,
        ]
    }

    pub fn years(self) -> i32 {
        match self {
            GrowthWindow::FiveYears => 5,
            GrowthWindow::ThreeYears => 3,
            GrowthWindow::OneYear => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GrowthWindow::FiveYears => "Last 5 Years",
            GrowthWindow::ThreeYears => "Last 3 Years",
            GrowthWindow::OneYear => "Last 1 Year",
        }
    }

    /// Cyclic transition 5Y -> 3Y -> 1Y -> 5Y.
    pub fn next(self) -> GrowthWindow {
        match self {
            GrowthWindow::FiveYears => GrowthWindow::ThreeYears,
            GrowthWindow::ThreeYears => GrowthWindow::OneYear,
            GrowthWindow::OneYear => GrowthWindow::FiveYears,
        }
    }

    pub fn result(self, trend: &[TrendEntry]) -> GrowthResult {
        GrowthResult {
            window_years: self.years(),
            percentage: compute_growth(trend, self.years()),
        }
    }
}

impl FromStr for GrowthWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5" | "5y" => Ok(GrowthWindow::FiveYears),
            "3" | "3y" => Ok(GrowthWindow::ThreeYears),
            "1" | "1y" => Ok(GrowthWindow::OneYear),
            _ => Err(format!("Unknown growth window: '{s}' (expected 1, 3 or 5)")),
        }
    }
}

impl fmt::Display for GrowthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Y", self.years())
    }
}

/// Growth over one window. `percentage` is `None` when there is not enough data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub window_years: i32,
    pub percentage: Option<f64>,
}

/// The rotating growth panel of the property detail view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthView {
    pub window: GrowthWindow,
}

impl GrowthView {
    pub fn new(window: GrowthWindow) -> GrowthView {
        GrowthView { window }
    }

    pub fn rotate(self) -> GrowthView {
        GrowthView {
            window: self.window.next(),
        }
    }

    pub fn result(&self, trend: &[TrendEntry]) -> GrowthResult {
        self.window.result(trend)
    }

    /// Every window once, starting from the current one.
    pub fn cycle(self) -> impl Iterator<Item = GrowthView> {
        std::iter::successors(Some(self), |view| Some(view.rotate())).take(GrowthWindow::all().len())
    }
}

pub fn growth_results(trend: &[TrendEntry]) -> Vec<GrowthResult> {
    GrowthWindow::all()
        .iter()
        .map(|window| window.result(trend))
        .collect()
}
