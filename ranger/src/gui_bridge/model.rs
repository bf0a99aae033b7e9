use rangercore::dataset::AirportRecord;
use rangercore::search::{SearchOutcome, SearchRequest};
use serde::{Deserialize, Serialize};

/// Snapshot served to the visualizer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub request: Option<SearchRequest>,
    pub reference: Option<AirportRecord>,
    pub speed_knots: f64,
    pub distance_nm: f64,
    pub airport_count: usize,
    pub airports: Vec<AirportRecord>,
    pub notes: Vec<String>,
}

impl VisualizationModel {
    pub fn from_outcome(request: &SearchRequest, outcome: &SearchOutcome) -> Self {
        let notes = outcome
            .category_counts()
            .into_iter()
            .map(|(category, count)| format!("{}: {}", category.label(), count))
            .collect();

        Self {
            request: Some(request.clone()),
            reference: Some(outcome.reference.clone()),
            speed_knots: outcome.speed_knots,
            distance_nm: outcome.distance_nm,
            airport_count: outcome.count(),
            airports: outcome.airports.clone(),
            notes,
        }
    }
}
