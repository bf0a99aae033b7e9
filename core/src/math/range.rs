use crate::prelude::{ensure_non_negative, RangeResult};

pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Straight-line distance in nautical miles covered at `speed_knots` for
/// `duration_minutes`. No wind, temperature or great-circle correction.
pub fn compute_range(speed_knots: f64, duration_minutes: f64) -> RangeResult<f64> {
    ensure_non_negative(speed_knots, "speed")?;
    ensure_non_negative(duration_minutes, "duration")?;
    Ok(speed_knots * (duration_minutes / MINUTES_PER_HOUR))
}
