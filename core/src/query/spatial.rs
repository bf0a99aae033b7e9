use geo::{EuclideanDistance, Point};

use crate::dataset::{normalize_identifier, AirportDataset, AirportRecord};
use crate::prelude::{ensure_non_negative, RangeError, RangeResult};
use crate::telemetry::log::LogManager;

/// Nautical miles per degree of latitude.
pub const NM_PER_DEGREE: f64 = 60.0;

/// Convert a linear distance to an angular radius.
///
/// Known limitation: one degree is treated as 60 nm along both axes, so the
/// east-west reach shrinks with latitude. This is a planar buffer in degree
/// space, not a geodesic circle.
pub fn nm_to_degrees(distance_nm: f64) -> f64 {
    distance_nm / NM_PER_DEGREE
}

/// Closed disk in longitude/latitude degree space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeDisk {
    pub center: Point<f64>,
    pub radius_deg: f64,
}

impl RangeDisk {
    pub fn new(center: Point<f64>, radius_deg: f64) -> Self {
        Self { center, radius_deg }
    }

    pub fn from_nautical_miles(center: Point<f64>, distance_nm: f64) -> Self {
        Self::new(center, nm_to_degrees(distance_nm))
    }

    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.center.euclidean_distance(point) <= self.radius_deg
    }
}

/// Resolve the reference airport, or fail with [`RangeError::ReferenceNotFound`].
pub fn lookup_reference<'a>(
    dataset: &'a AirportDataset,
    identifier: &str,
) -> RangeResult<&'a AirportRecord> {
    dataset
        .get(identifier)
        .ok_or_else(|| RangeError::ReferenceNotFound {
            identifier: normalize_identifier(identifier),
        })
}

/// All airports whose position falls inside the disk around `reference_identifier`.
///
/// The reference itself is always part of the result. Records come back in
/// dataset order.
pub fn find_within_range<'a>(
    dataset: &'a AirportDataset,
    reference_identifier: &str,
    distance_nm: f64,
) -> RangeResult<Vec<&'a AirportRecord>> {
    ensure_non_negative(distance_nm, "distance")?;
    let reference = lookup_reference(dataset, reference_identifier)?;
    Ok(find_around(dataset, reference, distance_nm))
}

/// Same as [`find_within_range`] for a reference that was already resolved.
pub fn find_around<'a>(
    dataset: &'a AirportDataset,
    reference: &AirportRecord,
    distance_nm: f64,
) -> Vec<&'a AirportRecord> {
    let disk = RangeDisk::from_nautical_miles(reference.position(), distance_nm);
    let matches: Vec<&AirportRecord> = dataset
        .iter()
        .filter(|record| disk.contains(&record.position()))
        .collect();

    LogManager::for_component("query").record(&format!(
        "{} airports within {:.2} nm ({:.4} deg) of {}",
        matches.len(),
        distance_nm,
        disk.radius_deg,
        reference.identifier
    ));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AirportCategory;

    fn abc_dataset() -> AirportDataset {
        AirportDataset::from_records(vec![
            AirportRecord::new("A", "Alpha", AirportCategory::SmallAirport, 0.0, 0.0),
            AirportRecord::new("B", "Bravo", AirportCategory::SmallAirport, 1.0, 0.0),
            AirportRecord::new("C", "Charlie", AirportCategory::SmallAirport, 10.0, 0.0),
        ])
    }

    fn idents(records: &[&AirportRecord]) -> Vec<String> {
        records.iter().map(|r| r.identifier.clone()).collect()
    }

    #[test]
    fn sixty_nm_reaches_one_degree() {
        let dataset = abc_dataset();
        let found = find_within_range(&dataset, "A", 60.0).unwrap();
        assert_eq!(idents(&found), vec!["A", "B"]);
    }

    #[test]
    fn reference_is_included_at_zero_distance() {
        let dataset = abc_dataset();
        let found = find_within_range(&dataset, "c", 0.0).unwrap();
        assert_eq!(idents(&found), vec!["C"]);
    }

    #[test]
    fn larger_radius_returns_a_superset() {
        let dataset = abc_dataset();
        let mut previous: Vec<String> = Vec::new();
        for distance in [0.0, 30.0, 60.0, 300.0, 600.0, 6000.0] {
            let current = idents(&find_within_range(&dataset, "A", distance).unwrap());
            assert!(previous.iter().all(|ident| current.contains(ident)));
            previous = current;
        }
        assert_eq!(previous, vec!["A", "B", "C"]);
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let dataset = abc_dataset();
        match find_within_range(&dataset, "zzzz", 60.0) {
            Err(RangeError::ReferenceNotFound { identifier }) => assert_eq!(identifier, "ZZZZ"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn empty_dataset_reports_missing_reference() {
        let dataset = AirportDataset::default();
        assert!(matches!(
            find_within_range(&dataset, "A", 60.0),
            Err(RangeError::ReferenceNotFound { .. })
        ));
    }

    #[test]
    fn reference_with_unusable_position_never_enters_the_dataset() {
        let dataset = AirportDataset::from_records(vec![
            AirportRecord::new("A", "Alpha", AirportCategory::SmallAirport, f64::NAN, 0.0),
            AirportRecord::new("B", "Bravo", AirportCategory::SmallAirport, 1.0, 0.0),
        ]);
        assert!(matches!(
            find_within_range(&dataset, "A", 60.0),
            Err(RangeError::ReferenceNotFound { .. })
        ));
        for record in dataset.iter() {
            let found = find_within_range(&dataset, &record.identifier, 60.0).unwrap();
            assert!(found.contains(&record));
        }
    }

    #[test]
    fn lookup_reference_normalizes_and_reports_missing() {
        let dataset = abc_dataset();
        assert_eq!(lookup_reference(&dataset, " b ").unwrap().name, "Bravo");
        assert!(matches!(
            lookup_reference(&dataset, "x"),
            Err(RangeError::ReferenceNotFound { identifier }) if identifier == "X"
        ));
    }

    #[test]
    fn negative_distance_is_rejected() {
        let dataset = abc_dataset();
        assert!(matches!(
            find_within_range(&dataset, "A", -1.0),
            Err(RangeError::InvalidInput(_))
        ));
    }

    #[test]
    fn disk_uses_planar_degree_distance() {
        let disk = RangeDisk::from_nautical_miles(Point::new(0.0, 0.0), 300.0);
        assert_eq!(disk.radius_deg, 5.0);
        assert!(disk.contains(&Point::new(3.0, 4.0)));
        assert!(!disk.contains(&Point::new(3.0, 4.1)));
    }
}
