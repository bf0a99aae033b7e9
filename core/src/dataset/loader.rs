use csv::{ByteRecord, ReaderBuilder, StringRecord};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::collection::AirportDataset;
use super::record::{is_valid_position, AirportCategory, AirportRecord};
use super::schema::{parse_wkt_point, BoundPosition, BoundSchema, DatasetSchema};
use crate::prelude::DataLoadError;
use crate::telemetry::log::LogManager;

/// Reads a CSV airport table and normalizes it into an [`AirportDataset`].
pub struct DatasetLoader {
    schema: DatasetSchema,
    logger: LogManager,
}

impl DatasetLoader {
    pub fn new(schema: DatasetSchema) -> Self {
        Self {
            schema,
            logger: LogManager::for_component("dataset"),
        }
    }

    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<AirportDataset, DataLoadError> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref).map_err(|source| DataLoadError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;
        let dataset = self.load_from_reader(file)?;
        self.logger.record(&format!(
            "loaded {} airports from {}",
            dataset.len(),
            path_ref.display()
        ));
        Ok(dataset)
    }

    /// Malformed cells are sanitized or the row is skipped; only structural
    /// problems (unreadable stream, missing columns) fail the load.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<AirportDataset, DataLoadError> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers = StringRecord::from_byte_record_lossy(csv_reader.byte_headers()?.clone());
        let bound = self.schema.bind(&headers)?;

        let mut dataset = AirportDataset::default();
        let mut row = ByteRecord::new();
        let mut line = 1usize;
        while csv_reader.read_byte_record(&mut row)? {
            line += 1;
            dataset.summary_mut().rows_read += 1;
            match normalize_row(&row, &bound) {
                Some(record) => dataset.insert(record),
                None => {
                    warn!("skipping dataset row {}: no usable identifier or position", line);
                    dataset.summary_mut().skipped += 1;
                }
            }
        }

        let summary = dataset.summary();
        debug!(
            "dataset rows {} kept {} excluded {} skipped {} duplicates {}",
            summary.rows_read,
            dataset.len(),
            summary.excluded,
            summary.skipped,
            summary.duplicates
        );
        Ok(dataset)
    }
}

fn cell(row: &ByteRecord, index: usize) -> String {
    row.get(index)
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .unwrap_or_default()
}

/// Coerce a raw name cell to printable text.
pub fn sanitize_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn normalize_row(row: &ByteRecord, bound: &BoundSchema) -> Option<AirportRecord> {
    let identifier = cell(row, bound.identifier);
    if identifier.is_empty() {
        return None;
    }
    let name = row.get(bound.name).map(sanitize_name).unwrap_or_default();
    let category = AirportCategory::parse(&cell(row, bound.category));

    let (longitude, latitude) = match bound.position {
        BoundPosition::LonLat {
            longitude,
            latitude,
        } => (
            cell(row, longitude).parse::<f64>().ok()?,
            cell(row, latitude).parse::<f64>().ok()?,
        ),
        BoundPosition::Wkt { column } => {
            let point = parse_wkt_point(&cell(row, column))?;
            (point.x(), point.y())
        }
    };

    if !is_valid_position(longitude, latitude) {
        return None;
    }

    Some(AirportRecord::new(
        &identifier,
        &name,
        category,
        longitude,
        latitude,
    ))
}
