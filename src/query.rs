//! Turns a free-text query or an explicit request into a [`ChordConstraint`].

use log::debug;
use serde::Deserialize;

use crate::config::{SearchOptions, Tuning};
use crate::error::SearchError;
use crate::grammar::parse_chord_name;
use crate::pitch::PitchClass;

/// The notes a voicing must contain and the notes it may contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordConstraint {
    /// Set for named chords; literal note lists have no root.
    pub root: Option<PitchClass>,
    pub required: Vec<PitchClass>,
    pub optional: Vec<PitchClass>,
}

impl ChordConstraint {
    /// Every token is a required note.
    pub fn literal<I, S>(tokens: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(ChordConstraint {
            root: None,
            required: normalize_all(tokens)?,
            optional: vec![],
        })
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    /// Whether a string sounding `note` can be part of a voicing.
    pub fn allows(&self, note: PitchClass) -> bool {
        self.required.contains(&note) || self.optional.contains(&note)
    }
}

/// Interprets a query.
///
/// * `'G B` (leading quote): the literal notes G and B.
/// * `G7`: a chord name, see [`crate::grammar`].
/// * anything else: whitespace-separated literal notes.
pub fn normalize_query(query: &str) -> Result<ChordConstraint, SearchError> {
    let trimmed = query.trim();

    let constraint = if trimmed.starts_with(['\'', '"']) {
        let notes = trimmed.replace(['\'', '"'], "");
        debug!("`{trimmed}` is a quoted note list");
        ChordConstraint::literal(notes.split_whitespace())?
    } else if let Some(chord) = parse_chord_name(trimmed) {
        debug!(
            "`{trimmed}` is a chord: required {:?}, optional {:?}",
            chord.required, chord.optional
        );
        ChordConstraint {
            root: Some(chord.root),
            required: chord.required,
            optional: chord.optional,
        }
    } else {
        debug!("`{trimmed}` is not a chord name, reading it as notes");
        ChordConstraint::literal(trimmed.split_whitespace())?
    };

    if constraint.is_empty() {
        return Err(SearchError::EmptyQuery(query.to_string()));
    }
    Ok(constraint)
}

/// Explicit search arguments, as received over JSON.
///
/// Unset fields fall back to the options passed alongside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    pub required_notes: Vec<String>,
    pub optional_notes: Vec<String>,
    pub tuning: Option<Vec<String>>,
    pub max_span: Option<u8>,
    pub max_fret: Option<u8>,
    pub max_fingers: Option<u8>,
    pub min_notes: Option<u8>,
}

impl SearchRequest {
    /// Normalizes the notes. Fails if no note is given or any is malformed.
    pub fn constraint(&self) -> Result<ChordConstraint, SearchError> {
        if self.required_notes.is_empty() && self.optional_notes.is_empty() {
            return Err(SearchError::MissingConstraint);
        }
        Ok(ChordConstraint {
            root: None,
            required: normalize_all(&self.required_notes)?,
            optional: normalize_all(&self.optional_notes)?,
        })
    }

    /// `defaults` overridden by whatever this request sets, validated.
    pub fn options(&self, defaults: &SearchOptions) -> Result<SearchOptions, SearchError> {
        SearchOptions::builder()
            .tuning(match &self.tuning {
                Some(tuning) => Tuning::from_entries(tuning)?,
                None => defaults.tuning.clone(),
            })
            .max_span(self.max_span.unwrap_or(defaults.max_span))
            .max_fret(self.max_fret.unwrap_or(defaults.max_fret))
            .max_fingers(self.max_fingers.unwrap_or(defaults.max_fingers))
            .min_notes(self.min_notes.or(defaults.min_notes))
            .strings_to_drop(defaults.strings_to_drop)
            .build()
    }
}

fn normalize_all<I, S>(tokens: I) -> Result<Vec<PitchClass>, SearchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|token| PitchClass::normalize(token.as_ref()))
        .collect()
}
