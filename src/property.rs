use crate::error::ValidationError;
use crate::growth::{GrowthResult, GrowthWindow};
use crate::trend::{latest, normalize, PriceTrend, TrendEntry};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum AreaType {
    Urban,
    Rural,
}

impl AreaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaType::Urban => "URBAN",
            AreaType::Rural => "RURAL",
        }
    }
}

impl FromStr for AreaType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "URBAN" => Ok(AreaType::Urban),
            "RURAL" => Ok(AreaType::Rural),
            _ => Err(ValidationError::InvalidAreaType(s.to_string())),
        }
    }
}

impl TryFrom<String> for AreaType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum LandType {
    Residential,
    Commercial,
}

impl LandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandType::Residential => "RESIDENTIAL",
            LandType::Commercial => "COMMERCIAL",
        }
    }
}

impl FromStr for LandType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "RESIDENTIAL" => Ok(LandType::Residential),
            "COMMERCIAL" => Ok(LandType::Commercial),
            _ => Err(ValidationError::InvalidLandType(s.to_string())),
        }
    }
}

impl TryFrom<String> for LandType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// WGS84 decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "number_or_string")]
    pub latitude: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

// The create form posts coordinates as strings, the list endpoint returns numbers.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Read-only snapshot of a property as held by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub size: f64,
    pub area_type: AreaType,
    pub land_type: LandType,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub price_trend: Option<PriceTrend>,
}

impl Property {
    pub fn trend(&self) -> Vec<TrendEntry> {
        normalize(self.price_trend.as_ref())
    }

    /// Price at the most recent year, if the property has any trend data.
    pub fn latest_value(&self) -> Option<f64> {
        latest(&self.trend()).map(|entry| entry.price)
    }

    pub fn growth(&self, window: GrowthWindow) -> GrowthResult {
        window.result(&self.trend())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PropertyListBody {
    Envelope { data: PropertyListData },
    Listing(PropertyListData),
    Bare(Vec<Property>),
}

#[derive(Deserialize)]
struct PropertyListData {
    properties: Vec<Property>,
}

/// Parses a property listing: the backend's `{"data": {"properties": [..]}}`
/// envelope, a `{"properties": [..]}` object, or a bare array.
pub fn from_string(data: &str) -> Result<Vec<Property>, serde_json::Error> {
    let body: PropertyListBody = serde_json::from_str(data)?;
    Ok(match body {
        PropertyListBody::Envelope { data } => data.properties,
        PropertyListBody::Listing(data) => data.properties,
        PropertyListBody::Bare(properties) => properties,
    })
}

/// A property about to be submitted to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub size: f64,
    pub area_type: AreaType,
    pub land_type: LandType,
    pub coordinates: Coordinates,
}

impl NewProperty {
    /// Builds a property from raw form input and validates it.
    pub fn parse(
        size: f64,
        area_type: &str,
        land_type: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<NewProperty, ValidationError> {
        let property = NewProperty {
            size,
            area_type: area_type.parse()?,
            land_type: land_type.parse()?,
            coordinates: Coordinates {
                latitude: parse_coordinate(latitude, ValidationError::LatitudeRequired)?,
                longitude: parse_coordinate(longitude, ValidationError::LongitudeRequired)?,
            },
        };
        property.validate()?;
        Ok(property)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.size.is_finite() || self.size < 1.0 {
            return Err(ValidationError::SizeTooSmall(self.size));
        }
        self.coordinates.validate()
    }

    /// JSON body for the create endpoint. Coordinates go out as strings.
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "size": self.size,
            "areaType": self.area_type,
            "coordinates": {
                "latitude": self.coordinates.latitude.to_string(),
                "longitude": self.coordinates.longitude.to_string(),
            },
            "landType": self.land_type,
        })
    }
}

fn parse_coordinate(input: &str, missing: ValidationError) -> Result<f64, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(missing);
    }
    input
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidCoordinate(input.to_string()))
}
