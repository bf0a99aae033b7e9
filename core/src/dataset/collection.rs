use log::warn;
use serde::Serialize;
use std::collections::HashMap;

use super::record::{normalize_identifier, AirportRecord};

/// Row counters gathered while normalizing a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub excluded: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Read-only, category-filtered airport collection indexed by identifier.
#[derive(Debug, Clone, Default)]
pub struct AirportDataset {
    records: Vec<AirportRecord>,
    index: HashMap<String, usize>,
    summary: LoadSummary,
}

impl AirportDataset {
    /// Build a dataset from records that did not come through the CSV loader.
    ///
    /// Identifiers are normalized and the same row rules apply: excluded
    /// categories are dropped, rows without an identifier or a valid position
    /// are counted as skipped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AirportRecord>,
    {
        let mut dataset = Self::default();
        for record in records {
            dataset.summary.rows_read += 1;
            dataset.insert(record);
        }
        dataset
    }

    pub(crate) fn insert(&mut self, mut record: AirportRecord) {
        record.identifier = normalize_identifier(&record.identifier);
        if record.identifier.is_empty() || !record.has_valid_position() {
            warn!(
                "skipping airport '{}': no usable identifier or position",
                record.identifier
            );
            self.summary.skipped += 1;
            return;
        }
        if record.category.is_excluded() {
            self.summary.excluded += 1;
            return;
        }
        match self.index.get(&record.identifier) {
            // last write wins, the slot keeps its original position
            Some(&slot) => {
                self.records[slot] = record;
                self.summary.duplicates += 1;
            }
            None => {
                self.index
                    .insert(record.identifier.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub(crate) fn summary_mut(&mut self) -> &mut LoadSummary {
        &mut self.summary
    }

    pub fn get(&self, identifier: &str) -> Option<&AirportRecord> {
        self.index
            .get(&normalize_identifier(identifier))
            .map(|&slot| &self.records[slot])
    }

    pub fn records(&self) -> &[AirportRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> LoadSummary {
        self.summary
    }
}
