//! Analysis modules.
//!
//! Pure functions over the loaded record sets: the join, statistics,
//! chart buckets, filtering and leave handling.

pub mod aggregator;
pub mod filter;
pub mod leave;

pub use aggregator::*;
pub use filter::*;
pub use leave::*;
