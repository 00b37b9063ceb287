//! Value-growth analytics for a real-estate portfolio.
//!
//! Property valuations arrive from the backend as year -> price mappings.
//! [`trend`] orders them and computes growth over exact lookback windows,
//! [`portfolio`] aggregates them across properties and [`format`] turns the
//! results into lakh/crore amounts and chart series.

pub mod client;
pub mod error;
pub mod format;
pub mod growth;
pub mod portfolio;
pub mod property;
pub mod report;
pub mod session;
pub mod trend;

pub use error::{ApiError, Result, ValidationError};
pub use growth::{GrowthResult, GrowthView, GrowthWindow};
pub use portfolio::{summarize, Portfolio, PortfolioSummary};
pub use property::{AreaType, Coordinates, LandType, NewProperty, Property};
pub use session::Session;
pub use trend::{compute_growth, normalize, PriceTrend, TrendEntry};
