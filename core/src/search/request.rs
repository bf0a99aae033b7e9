use serde::{Deserialize, Serialize};

use crate::dataset::normalize_identifier;
use crate::prelude::{RangeError, RangeResult};

pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 3680;
pub const MAX_SPEED_KTS: u32 = 1000;
pub const MAX_SPEED_MACH: f64 = 3.0;

/// Everything one search needs, collected by whichever front end runs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub identifier: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub speed_kts: u32,
    #[serde(default)]
    pub speed_mach: f64,
}

impl SearchRequest {
    pub fn new(identifier: &str, duration_minutes: u32, speed_kts: u32, speed_mach: f64) -> Self {
        Self {
            identifier: normalize_identifier(identifier),
            duration_minutes,
            speed_kts,
            speed_mach,
        }
    }

    /// Enforce the limits offered by the input forms.
    pub fn validate(&self) -> RangeResult<()> {
        if normalize_identifier(&self.identifier).is_empty() {
            return Err(RangeError::InvalidInput(
                "an airport identifier is required".into(),
            ));
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(RangeError::InvalidInput(format!(
                "flight time must be between {} and {} minutes (got {})",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES, self.duration_minutes
            )));
        }
        if self.speed_kts > MAX_SPEED_KTS {
            return Err(RangeError::InvalidInput(format!(
                "speed must be at most {} kts (got {})",
                MAX_SPEED_KTS, self.speed_kts
            )));
        }
        if !self.speed_mach.is_finite() || !(0.0..=MAX_SPEED_MACH).contains(&self.speed_mach) {
            return Err(RangeError::InvalidInput(format!(
                "Mach must be between 0.0 and {:.1} (got {})",
                MAX_SPEED_MACH, self.speed_mach
            )));
        }
        Ok(())
    }
}
