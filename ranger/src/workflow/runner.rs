use anyhow::Context;
use rangercore::dataset::AirportSource;
use rangercore::search::{run_search, SearchOutcome, SearchRequest};
use rangercore::telemetry::{MetricsRecorder, SearchMetrics};
use std::sync::Arc;

/// Runs searches against one airport source; every call loads its own copy.
#[derive(Clone)]
pub struct Runner {
    source: Arc<dyn AirportSource + Send + Sync>,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(source: Arc<dyn AirportSource + Send + Sync>) -> Self {
        Self {
            source,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn execute(&self, request: &SearchRequest) -> anyhow::Result<SearchOutcome> {
        match run_search(&*self.source, request)
            .with_context(|| format!("searching around {}", self.describe_request(request)))
        {
            Ok(outcome) => {
                self.metrics.record_search(outcome.count());
                Ok(outcome)
            }
            Err(err) => {
                self.metrics.record_error();
                Err(err)
            }
        }
    }

    pub fn metrics(&self) -> SearchMetrics {
        self.metrics.snapshot()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    fn describe_request(&self, request: &SearchRequest) -> String {
        format!("{} in {}", request.identifier, self.source.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangercore::dataset::{AirportCategory, AirportDataset, AirportRecord};
    use rangercore::RangeError;

    fn runner() -> Runner {
        let dataset = AirportDataset::from_records(vec![
            AirportRecord::new("A", "Alpha", AirportCategory::SmallAirport, 0.0, 0.0),
            AirportRecord::new("B", "Bravo", AirportCategory::SmallAirport, 1.0, 0.0),
            AirportRecord::new("C", "Charlie", AirportCategory::SmallAirport, 10.0, 0.0),
        ]);
        Runner::new(Arc::new(dataset))
    }

    #[test]
    fn runner_executes_search() {
        let runner = runner();
        let outcome = runner
            .execute(&SearchRequest::new("A", 30, 120, 0.0))
            .unwrap();
        assert_eq!(outcome.distance_nm, 60.0);
        assert_eq!(outcome.count(), 2);
        assert_eq!(runner.metrics().completed, 1);
        assert_eq!(runner.metrics().airports_returned, 2);
    }

    #[test]
    fn runner_counts_failures_and_keeps_the_cause() {
        let runner = runner();
        let err = runner
            .execute(&SearchRequest::new("ZZZZ", 30, 120, 0.0))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RangeError>(),
            Some(RangeError::ReferenceNotFound { .. })
        ));
        assert!(format!("{:#}", err).contains("ZZZZ"));
        assert_eq!(runner.metrics().failed, 1);
    }
}
