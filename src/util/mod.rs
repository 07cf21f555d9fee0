//! Small helpers shared across layers and tests

pub mod path;
pub mod testing;
