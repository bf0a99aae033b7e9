use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::collection::AirportDataset;
use super::loader::DatasetLoader;
use super::schema::DatasetSchema;
use crate::prelude::DataLoadError;

/// Anything that can hand out a fresh airport dataset for one search.
pub trait AirportSource {
    fn load(&self) -> Result<AirportDataset, DataLoadError>;

    fn describe(&self) -> String;
}

/// CSV file on disk read through a column mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvSource {
    pub path: PathBuf,
    #[serde(default)]
    pub schema: DatasetSchema,
}

impl CsvSource {
    pub fn new<P: Into<PathBuf>>(path: P, schema: DatasetSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }
}

impl AirportSource for CsvSource {
    fn load(&self) -> Result<AirportDataset, DataLoadError> {
        DatasetLoader::new(self.schema.clone()).load_path(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Already loaded records, cloned for every search.
impl AirportSource for AirportDataset {
    fn load(&self) -> Result<AirportDataset, DataLoadError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory dataset ({} airports)", self.len())
    }
}
