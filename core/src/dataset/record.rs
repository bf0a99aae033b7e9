use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Facility type as published in the airport dataset's `type` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AirportCategory {
    SmallAirport,
    MediumAirport,
    LargeAirport,
    Heliport,
    SeaplaneBase,
    BalloonPort,
    Closed,
    Unknown(String),
}

impl AirportCategory {
    /// Categories that never take part in a range search.
    pub const EXCLUDED: [AirportCategory; 4] = [
        AirportCategory::Heliport,
        AirportCategory::Closed,
        AirportCategory::SeaplaneBase,
        AirportCategory::BalloonPort,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "small_airport" => Self::SmallAirport,
            "medium_airport" => Self::MediumAirport,
            "large_airport" => Self::LargeAirport,
            "heliport" => Self::Heliport,
            "seaplane_base" => Self::SeaplaneBase,
            "balloonport" => Self::BalloonPort,
            "closed" => Self::Closed,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SmallAirport => "small_airport",
            Self::MediumAirport => "medium_airport",
            Self::LargeAirport => "large_airport",
            Self::Heliport => "heliport",
            Self::SeaplaneBase => "seaplane_base",
            Self::BalloonPort => "balloonport",
            Self::Closed => "closed",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_excluded(&self) -> bool {
        Self::EXCLUDED.contains(self)
    }

    /// Human readable label used by the report and the map legend.
    pub fn label(&self) -> &str {
        match self {
            Self::SmallAirport => "Small airport",
            Self::MediumAirport => "Medium airport",
            Self::LargeAirport => "Large airport",
            Self::Heliport => "Heliport",
            Self::SeaplaneBase => "Seaplane base",
            Self::BalloonPort => "Balloon port",
            Self::Closed => "Closed",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for AirportCategory {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<AirportCategory> for String {
    fn from(value: AirportCategory) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AirportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized row of the airport dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub identifier: String,
    pub name: String,
    pub category: AirportCategory,
    pub longitude: f64,
    pub latitude: f64,
}

impl AirportRecord {
    pub fn new(
        identifier: &str,
        name: &str,
        category: AirportCategory,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            identifier: normalize_identifier(identifier),
            name: name.to_string(),
            category,
            longitude,
            latitude,
        }
    }

    /// Planar position in degree space, x = longitude, y = latitude.
    pub fn position(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    pub fn has_valid_position(&self) -> bool {
        is_valid_position(self.longitude, self.latitude)
    }
}

/// Finite longitude in [-180, 180] and latitude in [-90, 90].
pub fn is_valid_position(longitude: f64, latitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude) && (-90.0..=90.0).contains(&latitude)
}

/// Lookup keys are trimmed and uppercased.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}
