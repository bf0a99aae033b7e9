pub mod pipeline;
pub mod request;

pub use pipeline::{run_search, SearchOutcome};
pub use request::SearchRequest;
