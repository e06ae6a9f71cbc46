//! Pure derivations over catalog data: OEE, batch progress, search, layout.

pub mod batch;
pub mod grouping;
pub mod knowledge;
pub mod oee;
pub mod units;
