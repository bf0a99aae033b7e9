pub mod collection;
pub mod loader;
pub mod record;
pub mod schema;
pub mod source;

pub use collection::{AirportDataset, LoadSummary};
pub use loader::{sanitize_name, DatasetLoader};
pub use record::{is_valid_position, normalize_identifier, AirportCategory, AirportRecord};
pub use schema::{parse_wkt_point, DatasetSchema, PositionColumns};
pub use source::{AirportSource, CsvSource};
