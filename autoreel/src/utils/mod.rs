//! Utility functions for run identifiers, digests, and timestamp handling.

mod ids;
pub mod timestamps;

pub use ids::{generate_run_id, sha256_hex};
pub use timestamps::{elapsed_ms, iso_timestamp};
