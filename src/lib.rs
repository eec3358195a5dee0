//! # voicing_gen
//!
//! Finds playable fingerings on a fretted instrument for a chord name
//! (`G7`, `Bbm7b5`, `Dsus2`) or an explicit set of notes.
//!
//! ```rust
//! use voicing_gen::{search_by_query, SearchOptions};
//!
//! let options = SearchOptions::default();
//! let results = search_by_query("G", &options).unwrap();
//! assert!(results.iter().any(|r| r.strings.to_string() == "320003"));
//! ```

pub mod config;
pub mod error;
pub mod grammar;
pub mod pitch;
pub mod practical;
pub mod query;
pub mod search;
pub mod voicing;

#[cfg(feature = "wasm-plugin")]
mod plugin;

pub use config::{SearchOptions, SearchOptionsBuilder, Tuning};
pub use error::SearchError;
pub use pitch::{Interval, PitchClass, TuningEntry};
pub use query::{normalize_query, ChordConstraint, SearchRequest};
pub use voicing::{rank, Voicing, VoicingResult};

/// Searches for a free-text query: a chord name, a quoted note list such as
/// `'G B`, or anything else read as a note list.
pub fn search_by_query(
    query: &str,
    options: &SearchOptions,
) -> Result<Vec<VoicingResult>, SearchError> {
    let constraint = normalize_query(query)?;
    search::search(&constraint, options)
}

/// Searches for explicit notes; options set on the request override
/// `defaults`.
pub fn search_by_constraint(
    request: &SearchRequest,
    defaults: &SearchOptions,
) -> Result<Vec<VoicingResult>, SearchError> {
    let constraint = request.constraint()?;
    let options = request.options(defaults)?;
    search::search(&constraint, &options)
}
