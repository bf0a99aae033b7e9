pub mod range;
pub mod speed;

pub use range::compute_range;
pub use speed::{resolve_speed, MACH_TO_KNOTS};
