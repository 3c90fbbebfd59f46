//! Analysis modules.
//!
//! Status and solver aggregation live in `aggregator`; the size/time
//! scatter and its trend live in `distribution`.

pub mod aggregator;
pub mod distribution;

pub use aggregator::*;
pub use distribution::{distribution, BinningOptions};
