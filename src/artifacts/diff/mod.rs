//! Line diffs
//!
//! - `myers`: Myers' shortest edit script over any sequence of comparable items
//! - `diff_op`: line-level diff of two texts built on top of it

pub mod diff_op;
pub mod myers;
