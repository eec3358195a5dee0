use thiserror::Error;

/// Errors surfaced by the voicing search.
///
/// A chord name that does not fit the grammar is not an error: the query is
/// reinterpreted as a literal note list instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A note token has a bad letter or an accidental other than `#`/`b`.
    #[error("invalid note `{0}`")]
    InvalidNote(String),

    /// A tuning entry is not `<letter><accidentals><octave>`, e.g. `E2`.
    #[error("invalid tuning entry `{0}`")]
    InvalidTuning(String),

    /// The query names no notes at all.
    #[error("query `{0}` does not name any notes")]
    EmptyQuery(String),

    /// Neither required nor optional notes were given.
    #[error("must specify required or optional notes")]
    MissingConstraint,

    /// A search option is out of its supported range.
    #[error("invalid option `{arg}`: {msg}")]
    InvalidOption {
        /// The name of the option.
        arg: &'static str,
        /// What is wrong with it.
        msg: String,
    },
}
