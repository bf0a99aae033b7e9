use anyhow::Context;
use clap::ValueEnum;
use rangercore::dataset::{CsvSource, DatasetSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Built-in column mappings selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaPreset {
    OurAirports,
    WktPoint,
}

impl SchemaPreset {
    pub fn schema(self) -> DatasetSchema {
        match self {
            SchemaPreset::OurAirports => DatasetSchema::our_airports(),
            SchemaPreset::WktPoint => DatasetSchema::wkt_point(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RangerConfig {
    pub dataset: PathBuf,
    pub schema: DatasetSchema,
    pub bind: SocketAddr,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/airports.csv"),
            schema: DatasetSchema::our_airports(),
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
        }
    }
}

impl RangerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading ranger config {}", path_ref.display()))?;
        let config: RangerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing ranger config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Command-line values win over the file.
    pub fn with_overrides(
        mut self,
        dataset: Option<PathBuf>,
        preset: Option<SchemaPreset>,
        bind: Option<SocketAddr>,
    ) -> Self {
        if let Some(dataset) = dataset {
            self.dataset = dataset;
        }
        if let Some(preset) = preset {
            self.schema = preset.schema();
        }
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    pub fn to_source(&self) -> CsvSource {
        CsvSource::new(self.dataset.clone(), self.schema.clone())
    }
}
