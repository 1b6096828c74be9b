//! Comparison of two independently produced sets of object-detection
//! annotations.
//!
//! Boxes from source A are matched against boxes from source B by a
//! containment-style overlap ratio, classified by label agreement, and
//! aggregated into corpus-wide statistics.

pub mod annotations;
pub mod comparison;
pub mod matching;
pub mod report;
pub mod shared;
