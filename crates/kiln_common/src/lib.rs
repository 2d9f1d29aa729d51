//! Shared foundational types for the kiln compilation cache.
//!
//! Currently this is the fixed-width content digest used for fingerprints,
//! per-file hashes, and cache partition names.

#![warn(missing_docs)]

pub mod hash;

pub use hash::{ContentHash, ParseHashError};
