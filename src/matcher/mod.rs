//! Pattern matching for deployment addresses.
//!
//! A rule names a desired hex prefix and/or suffix. Case-insensitive rules
//! compare against the lowercase hex form; case-sensitive rules compare
//! against the checksum-cased (EIP-55) text.

mod pattern;

pub use pattern::{MatchResult, Pattern};
