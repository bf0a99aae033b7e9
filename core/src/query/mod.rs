pub mod spatial;

pub use spatial::{
    find_around, find_within_range, lookup_reference, nm_to_degrees, RangeDisk, NM_PER_DEGREE,
};
