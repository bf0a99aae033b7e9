use rangercore::search::SearchOutcome;
use std::fmt::Write;

/// Plain-text rendering of an outcome for the terminal.
pub fn render_text(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Departure: {} {} ({:.4}, {:.4})",
        outcome.reference.identifier,
        outcome.reference.name,
        outcome.reference.latitude,
        outcome.reference.longitude
    );
    let _ = writeln!(out, "Speed: {:.2} kts", outcome.speed_knots);
    let _ = writeln!(out, "Distance (rounded): {:.2} nm", outcome.distance_nm);
    let _ = writeln!(out, "Found: {} airports", outcome.count());

    for (category, count) in outcome.category_counts() {
        let _ = writeln!(out, "\n{} ({})", category.label(), count);
        for airport in outcome.airports.iter().filter(|a| a.category == category) {
            let _ = writeln!(out, "  {:<8} {}", airport.identifier, airport.name);
        }
    }
    out
}

/// One line appended to the report log per search.
pub fn summary_line(outcome: &SearchOutcome) -> String {
    format!(
        "reference={} speed_kts={:.2} distance_nm={:.2} found={}\n",
        outcome.reference.identifier,
        outcome.speed_knots,
        outcome.distance_nm,
        outcome.count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangercore::dataset::{AirportCategory, AirportRecord};

    fn outcome() -> SearchOutcome {
        let a = AirportRecord::new("A", "Alpha", AirportCategory::LargeAirport, 0.0, 0.0);
        let b = AirportRecord::new("B", "Bravo", AirportCategory::SmallAirport, 1.0, 0.0);
        SearchOutcome {
            reference: a.clone(),
            speed_knots: 120.0,
            distance_nm: 60.0,
            airports: vec![a, b],
        }
    }

    #[test]
    fn text_report_shows_distance_count_and_groups() {
        let text = render_text(&outcome());
        assert!(text.contains("Distance (rounded): 60.00 nm"));
        assert!(text.contains("Found: 2 airports"));
        assert!(text.contains("Small airport (1)"));
        assert!(text.contains("Large airport (1)"));
    }

    #[test]
    fn summary_line_is_single_line() {
        let line = summary_line(&outcome());
        assert_eq!(line, "reference=A speed_kts=120.00 distance_nm=60.00 found=2\n");
    }
}
