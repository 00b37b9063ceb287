//! Error types for property_portfolio
//!
//! This module defines domain-specific error types that provide clear,
//! actionable error messages to users. Missing growth data is not an error:
//! the analytics functions report it as `None`.

use thiserror::Error;

/// Validation errors for a property submitted through `propfolio add`.
///
/// These errors are shown directly to users and should be clear and actionable.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Size must be at least 1 sqft, got {0}")]
    SizeTooSmall(f64),

    #[error("Invalid area type: {0} (expected URBAN or RURAL)")]
    InvalidAreaType(String),

    #[error("Invalid land type: {0} (expected RESIDENTIAL or COMMERCIAL)")]
    InvalidLandType(String),

    #[error("Latitude is required")]
    LatitudeRequired,

    #[error("Longitude is required")]
    LongitudeRequired,

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),

    #[error("Latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
}

/// Errors raised while talking to the property backend or reading its data.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Missing auth token or user ID")]
    MissingSession,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, ApiError>;
