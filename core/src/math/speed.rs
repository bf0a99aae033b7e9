use crate::prelude::{ensure_non_negative, RangeResult};

/// Knots per Mach 1, sea-level approximation.
pub const MACH_TO_KNOTS: f64 = 666.738661;

/// Resolve the user's speed into knots.
///
/// A non-zero true airspeed in knots always wins; otherwise the Mach number
/// is converted with [`MACH_TO_KNOTS`].
pub fn resolve_speed(speed_kts: f64, speed_mach: f64) -> RangeResult<f64> {
    ensure_non_negative(speed_kts, "speed in knots")?;
    ensure_non_negative(speed_mach, "speed in Mach")?;

    if speed_kts != 0.0 {
        return Ok(speed_kts);
    }
    Ok(speed_mach * MACH_TO_KNOTS)
}
