//! Specialized collections shared by the bitmap64 crates.

pub mod int_hash;
