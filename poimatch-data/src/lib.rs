//! Spatial query access for the poimatch engine.
//!
//! Responsibilities:
//! - Fetch match candidates from the Overpass API.
//! - Bridge fetched elements into `poimatch-core` resolution.
//! - Resolve batches of reference POIs concurrently.
//!
//! Boundaries:
//! - Do not encode matching rules (live in `poimatch-core`).
//! - Keep blocking I/O off async executors; the client is async throughout.
//!
//! Invariants:
//! - A failed fetch is an error, never a "no match".
//! - No global mutable state.

mod batch;
pub mod overpass;
mod source;

#[doc(hidden)]
pub mod test_support;

pub use batch::resolve_all;
pub use source::{CandidateSource, ElementMatch, has_match, load_matching, load_nearest};
