use csv::StringRecord;
use geo::Point;
use serde::{Deserialize, Serialize};

use crate::prelude::DataLoadError;

/// Where a row's position comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionColumns {
    /// Two numeric columns in decimal degrees.
    LonLat { longitude: String, latitude: String },
    /// A single `POINT(lon lat)` column.
    Wkt { column: String },
}

/// Column mapping that adapts one tabular source to [`AirportRecord`](super::AirportRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub identifier: String,
    pub name: String,
    pub category: String,
    pub position: PositionColumns,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self::our_airports()
    }
}

impl DatasetSchema {
    /// Layout of the OurAirports `airports.csv` export.
    pub fn our_airports() -> Self {
        Self {
            identifier: "ident".into(),
            name: "name".into(),
            category: "type".into(),
            position: PositionColumns::LonLat {
                longitude: "longitude_deg".into(),
                latitude: "latitude_deg".into(),
            },
        }
    }

    /// Export variant that stores the position as serialized WKT.
    pub fn wkt_point() -> Self {
        Self {
            identifier: "icao_code".into(),
            name: "airport_name".into(),
            category: "type".into(),
            position: PositionColumns::Wkt {
                column: "geometry".into(),
            },
        }
    }

    /// Resolve the mapped column names against a header row.
    pub fn bind(&self, headers: &StringRecord) -> Result<BoundSchema, DataLoadError> {
        let position = match &self.position {
            PositionColumns::LonLat {
                longitude,
                latitude,
            } => BoundPosition::LonLat {
                longitude: column_index(headers, longitude)?,
                latitude: column_index(headers, latitude)?,
            },
            PositionColumns::Wkt { column } => BoundPosition::Wkt {
                column: column_index(headers, column)?,
            },
        };

        Ok(BoundSchema {
            identifier: column_index(headers, &self.identifier)?,
            name: column_index(headers, &self.name)?,
            category: column_index(headers, &self.category)?,
            position,
        })
    }
}

fn column_index(headers: &StringRecord, column: &str) -> Result<usize, DataLoadError> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| DataLoadError::MissingColumn {
            column: column.to_string(),
        })
}

/// Column indices for one concrete header row.
#[derive(Debug, Clone, Copy)]
pub struct BoundSchema {
    pub identifier: usize,
    pub name: usize,
    pub category: usize,
    pub position: BoundPosition,
}

#[derive(Debug, Clone, Copy)]
pub enum BoundPosition {
    LonLat { longitude: usize, latitude: usize },
    Wkt { column: usize },
}

/// Parse `POINT(lon lat)` (keyword case-insensitive, optional space before the parenthesis).
pub fn parse_wkt_point(raw: &str) -> Option<Point<f64>> {
    let trimmed = raw.trim();
    let keyword = trimmed.get(..5)?;
    if !keyword.eq_ignore_ascii_case("POINT") {
        return None;
    }
    let body = trimmed[5..]
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;

    let mut parts = body.split_whitespace();
    let lon = parts.next()?.parse::<f64>().ok()?;
    let lat = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Point::new(lon, lat))
}
