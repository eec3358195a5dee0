//! Search options and the defaults they start from.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::SearchError;
use crate::pitch::{PitchClass, TuningEntry};

/// Standard six-string guitar tuning as (pitch class, octave), lowest string
/// first: E2 A2 D3 G3 B3 E4.
pub const STANDARD_TUNING: [(PitchClass, u8); 6] = [
    (PitchClass::new(4), 2),
    (PitchClass::new(9), 2),
    (PitchClass::new(2), 3),
    (PitchClass::new(7), 3),
    (PitchClass::new(11), 3),
    (PitchClass::new(4), 4),
];
pub const MAX_SPAN: u8 = 4;
pub const MAX_FRET: u8 = 12;
pub const MAX_FINGERS: u8 = 4;
/// Outer strings that may be muted to make an unplayable shape playable.
pub const STRINGS_TO_DROP: usize = 2;

const MAX_STRINGS: usize = 12;
const FRET_LIMIT: u8 = 36;
const SPAN_LIMIT: u8 = 12;
/// Most candidates one window may enumerate, `max_span ^ strings`.
const CANDIDATE_LIMIT: u64 = 1 << 24;

/// Open-string pitches, lowest string first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuning {
    entries: Vec<TuningEntry>,
    names: Vec<String>,
}

impl Tuning {
    pub fn standard() -> Self {
        let (entries, names) = STANDARD_TUNING
            .iter()
            .map(|&(pitch_class, octave)| {
                (
                    TuningEntry::new(pitch_class, octave),
                    format!("{pitch_class}{octave}"),
                )
            })
            .unzip();
        Tuning { entries, names }
    }

    /// Parses one token per string, e.g. `["E2", "A2", ...]`.
    pub fn from_entries<I, S>(tokens: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = vec![];
        let mut names = vec![];
        for token in tokens {
            let token = token.as_ref().trim();
            entries.push(token.parse()?);
            names.push(token.to_string());
        }
        Ok(Tuning { entries, names })
    }

    #[inline]
    pub fn strings(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TuningEntry] {
        &self.entries
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromStr for Tuning {
    type Err = SearchError;

    /// Whitespace-separated tokens, e.g. `"E2 A2 D3 G3 B3 E4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_entries(s.split_whitespace())
    }
}

impl Display for Tuning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names.join(" "))
    }
}

/// Limits for one search. Built once and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub tuning: Tuning,
    /// Width of a fret window, in frets.
    pub max_span: u8,
    /// Highest fret considered, inclusive.
    pub max_fret: u8,
    pub max_fingers: u8,
    /// Fewest strings a voicing may sound. Unset keeps every voicing.
    pub min_notes: Option<u8>,
    pub strings_to_drop: usize,
}

impl SearchOptions {
    pub fn builder() -> SearchOptionsBuilder {
        SearchOptionsBuilder::new()
    }

    /// Checks the bounds the search relies on; oversized values make the
    /// enumeration grow exponentially.
    pub fn validate(&self) -> Result<(), SearchError> {
        let strings = self.tuning.strings();
        if strings == 0 || strings > MAX_STRINGS {
            return Err(SearchError::InvalidOption {
                arg: "tuning",
                msg: format!("must have 1 to {MAX_STRINGS} strings, got {strings}"),
            });
        }
        if self.max_span == 0 || self.max_span > SPAN_LIMIT {
            return Err(SearchError::InvalidOption {
                arg: "max_span",
                msg: format!("must be within 1..={SPAN_LIMIT}, got {}", self.max_span),
            });
        }
        if self.max_fret < self.max_span || self.max_fret > FRET_LIMIT {
            return Err(SearchError::InvalidOption {
                arg: "max_fret",
                msg: format!(
                    "must be within {}..={FRET_LIMIT}, got {}",
                    self.max_span, self.max_fret
                ),
            });
        }
        if self.max_fingers == 0 {
            return Err(SearchError::InvalidOption {
                arg: "max_fingers",
                msg: "must be >= 1".to_string(),
            });
        }
        let candidates = u64::from(self.max_span).checked_pow(strings as u32);
        if candidates.map_or(true, |n| n > CANDIDATE_LIMIT) {
            return Err(SearchError::InvalidOption {
                arg: "max_span",
                msg: format!(
                    "{} frets over {strings} strings exceeds {CANDIDATE_LIMIT} candidates per window",
                    self.max_span
                ),
            });
        }
        Ok(())
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            tuning: Tuning::standard(),
            max_span: MAX_SPAN,
            max_fret: MAX_FRET,
            max_fingers: MAX_FINGERS,
            min_notes: None,
            strings_to_drop: STRINGS_TO_DROP,
        }
    }
}

/// Builder for [`SearchOptions`], starting from the defaults.
pub struct SearchOptionsBuilder {
    options: SearchOptions,
}

impl SearchOptionsBuilder {
    pub fn new() -> Self {
        SearchOptionsBuilder {
            options: SearchOptions::default(),
        }
    }

    pub fn tuning(mut self, tuning: Tuning) -> Self {
        self.options.tuning = tuning;
        self
    }

    pub fn max_span(mut self, value: u8) -> Self {
        self.options.max_span = value;
        self
    }

    pub fn max_fret(mut self, value: u8) -> Self {
        self.options.max_fret = value;
        self
    }

    pub fn max_fingers(mut self, value: u8) -> Self {
        self.options.max_fingers = value;
        self
    }

    /// Takes a count, or `None` to keep voicings of any size.
    pub fn min_notes(mut self, value: impl Into<Option<u8>>) -> Self {
        self.options.min_notes = value.into();
        self
    }

    pub fn strings_to_drop(mut self, value: usize) -> Self {
        self.options.strings_to_drop = value;
        self
    }

    /// Validates and returns the options.
    pub fn build(self) -> Result<SearchOptions, SearchError> {
        self.options.validate()?;
        Ok(self.options)
    }
}

impl Default for SearchOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
