//! Ordered aggregates.

mod median;

pub use median::Median;
