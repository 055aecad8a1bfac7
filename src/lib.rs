// rxdiff: medical transcript comparison
//
// This is the library root. `compare` is the core engine; the other modules
// feed it text (ingest), present its results (output, web), or provide the
// companion condition classifier (condition).

pub mod compare;
pub mod condition;
pub mod config;
pub mod ingest;
pub mod output;
pub mod status;

#[cfg(feature = "web")]
pub mod web;

pub use compare::{compare, ComparisonResult, CompareError};
