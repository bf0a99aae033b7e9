use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::request::SearchRequest;
use crate::dataset::{AirportCategory, AirportRecord, AirportSource};
use crate::math::{compute_range, resolve_speed};
use crate::prelude::RangeResult;
use crate::query::{find_around, lookup_reference};
use crate::telemetry::log::LogManager;

/// Result of one range search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub reference: AirportRecord,
    pub speed_knots: f64,
    pub distance_nm: f64,
    pub airports: Vec<AirportRecord>,
}

impl SearchOutcome {
    pub fn count(&self) -> usize {
        self.airports.len()
    }

    pub fn category_counts(&self) -> BTreeMap<AirportCategory, usize> {
        let mut counts = BTreeMap::new();
        for airport in &self.airports {
            *counts.entry(airport.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Validate, resolve speed, compute range, load a fresh dataset and query it.
pub fn run_search(source: &dyn AirportSource, request: &SearchRequest) -> RangeResult<SearchOutcome> {
    let logger = LogManager::for_component("search");
    request.validate()?;

    let speed_knots = resolve_speed(f64::from(request.speed_kts), request.speed_mach)?;
    let distance_nm = compute_range(speed_knots, f64::from(request.duration_minutes))?;
    logger.record(&format!(
        "search {} -> {:.1} kts for {} min = {:.2} nm",
        request.identifier, speed_knots, request.duration_minutes, distance_nm
    ));

    let dataset = source.load()?;
    let reference = lookup_reference(&dataset, &request.identifier)?;
    let airports: Vec<AirportRecord> = find_around(&dataset, reference, distance_nm)
        .into_iter()
        .cloned()
        .collect();

    Ok(SearchOutcome {
        reference: reference.clone(),
        speed_knots,
        distance_nm,
        airports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AirportDataset, CsvSource, DatasetSchema};
    use crate::math::MACH_TO_KNOTS;
    use crate::prelude::RangeError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn abc_dataset() -> AirportDataset {
        AirportDataset::from_records(vec![
            AirportRecord::new("A", "Alpha", AirportCategory::SmallAirport, 0.0, 0.0),
            AirportRecord::new("B", "Bravo", AirportCategory::SmallAirport, 1.0, 0.0),
            AirportRecord::new("C", "Charlie", AirportCategory::SmallAirport, 10.0, 0.0),
        ])
    }

    #[test]
    fn half_hour_at_120_kts_reaches_neighbour_only() {
        let outcome = run_search(&abc_dataset(), &SearchRequest::new("a", 30, 120, 0.0)).unwrap();
        assert_eq!(outcome.speed_knots, 120.0);
        assert_eq!(outcome.distance_nm, 60.0);
        let found: Vec<&str> = outcome.airports.iter().map(|a| a.identifier.as_str()).collect();
        assert_eq!(found, vec!["A", "B"]);
        assert_eq!(outcome.reference.identifier, "A");
    }

    #[test]
    fn mach_speed_is_used_when_knots_are_zero() {
        let outcome = run_search(&abc_dataset(), &SearchRequest::new("A", 60, 0, 1.0)).unwrap();
        assert_eq!(outcome.speed_knots, MACH_TO_KNOTS);
        assert_eq!(outcome.count(), 3);
    }

    #[test]
    fn invalid_request_is_rejected_before_loading() {
        let source = CsvSource::new("/missing/airports.csv", DatasetSchema::our_airports());
        let err = run_search(&source, &SearchRequest::new("A", 0, 120, 0.0)).unwrap_err();
        assert!(matches!(err, RangeError::InvalidInput(_)));
    }

    #[test]
    fn missing_dataset_is_a_data_load_error() {
        let source = CsvSource::new("/missing/airports.csv", DatasetSchema::our_airports());
        let err = run_search(&source, &SearchRequest::new("A", 30, 120, 0.0)).unwrap_err();
        assert!(matches!(err, RangeError::DataLoad(_)));
    }

    #[test]
    fn unknown_reference_reports_normalized_identifier() {
        let err = run_search(&abc_dataset(), &SearchRequest::new(" zz ", 30, 120, 0.0)).unwrap_err();
        match err {
            RangeError::ReferenceNotFound { identifier } => assert_eq!(identifier, "ZZ"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn category_counts_group_results() {
        let dataset = AirportDataset::from_records(vec![
            AirportRecord::new("A", "Alpha", AirportCategory::LargeAirport, 0.0, 0.0),
            AirportRecord::new("B", "Bravo", AirportCategory::SmallAirport, 0.5, 0.0),
            AirportRecord::new("C", "Charlie", AirportCategory::SmallAirport, 0.0, 0.5),
        ]);
        let outcome = run_search(&dataset, &SearchRequest::new("A", 60, 60, 0.0)).unwrap();
        let counts = outcome.category_counts();
        assert_eq!(counts[&AirportCategory::SmallAirport], 2);
        assert_eq!(counts[&AirportCategory::LargeAirport], 1);
    }

    #[test]
    fn repeated_searches_from_disk_are_identical() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"ident,name,type,longitude_deg,latitude_deg\n\
              A,Alpha,small_airport,0.0,0.0\n\
              B,Bravo,small_airport,1.0,0.0\n\
              H,Pad,heliport,0.5,0.0\n\
              C,Charlie,small_airport,10.0,0.0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let source = CsvSource::new(path.to_path_buf(), DatasetSchema::our_airports());
        let request = SearchRequest::new("A", 30, 120, 0.0);

        let first = run_search(&source, &request).unwrap();
        let second = run_search(&source, &request).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.count(), 2);
    }

    #[test]
    fn outcome_encodes_to_json() {
        let outcome = run_search(&abc_dataset(), &SearchRequest::new("A", 30, 120, 0.0)).unwrap();
        let json = outcome.to_json().unwrap();
        assert!(json.contains("\"distance_nm\": 60.0"));
        assert!(json.contains("\"small_airport\""));
    }

    #[test]
    fn sample_dataset_search_around_frankfurt() {
        let dataset = crate::dataset::DatasetLoader::new(DatasetSchema::our_airports())
            .load_from_reader(include_str!("../../../data/airports.csv").as_bytes())
            .unwrap();
        assert_eq!(dataset.len(), 21);
        assert_eq!(dataset.summary().excluded, 5);

        let outcome = run_search(&dataset, &SearchRequest::new("eddf", 30, 120, 0.0)).unwrap();
        let found: Vec<&str> = outcome.airports.iter().map(|a| a.identifier.as_str()).collect();
        for ident in ["EDDF", "EDFE", "EDFM", "EDFZ"] {
            assert!(found.contains(&ident), "{ident} should be in range");
        }
        for ident in ["EDFH", "EDDK", "DE-0001", "DE-0003"] {
            assert!(!found.contains(&ident), "{ident} should not be in range");
        }
    }

    #[test]
    fn wkt_sample_matches_lon_lat_sample() {
        let wkt = crate::dataset::DatasetLoader::new(DatasetSchema::wkt_point())
            .load_from_reader(include_str!("../../../data/airports_wkt.csv").as_bytes())
            .unwrap();
        let lon_lat = crate::dataset::DatasetLoader::new(DatasetSchema::our_airports())
            .load_from_reader(include_str!("../../../data/airports.csv").as_bytes())
            .unwrap();
        for record in wkt.iter() {
            assert_eq!(Some(record.position()), lon_lat.get(&record.identifier).map(|r| r.position()));
        }
    }
}
