//! Pitch-class arithmetic and absolute pitches of tuned strings.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::SearchError;

const SEMITONES: u8 = 12;

/// Canonical spelling of each pitch class. Flats are never kept.
pub const NOTE_NAMES: [&str; SEMITONES as usize] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Absolute pitch of C in octave 4.
const C4: i32 = 48;

/// One of the twelve octave-independent note names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Pitch class `index` semitones above C, wrapped into `0..12`.
    pub const fn new(index: u8) -> Self {
        PitchClass(index % SEMITONES)
    }

    /// Parses a letter `A`-`G` (any case) followed by any run of `#` and `b`
    /// accidentals, applied in sequence.
    pub fn normalize(token: &str) -> Result<Self, SearchError> {
        let mut chars = token.chars();
        let letter = chars
            .next()
            .and_then(letter_offset)
            .ok_or_else(|| SearchError::InvalidNote(token.to_string()))?;
        let accidentals = accidental_offset(chars.as_str())
            .ok_or_else(|| SearchError::InvalidNote(token.to_string()))?;
        Ok(Self::from_offset(letter as i32 + accidentals))
    }

    fn from_offset(offset: i32) -> Self {
        PitchClass(offset.rem_euclid(SEMITONES as i32) as u8)
    }

    /// Semitones above C.
    pub fn index(self) -> u8 {
        self.0
    }

    /// The canonical name, e.g. `C#`.
    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.0 as usize]
    }

    /// Modulo-12 addition.
    pub fn add(self, semitones: u8) -> Self {
        Self::new(self.0 + semitones % SEMITONES)
    }

    /// The pitch class `interval` above `self`.
    pub fn add_interval(self, interval: Interval) -> Self {
        self.add(interval.semitones())
    }
}

impl FromStr for PitchClass {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PitchClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

fn letter_offset(letter: char) -> Option<u8> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

fn accidental_offset(accidentals: &str) -> Option<i32> {
    accidentals.chars().try_fold(0, |acc, c| match c {
        '#' => Some(acc + 1),
        'b' => Some(acc - 1),
        _ => None,
    })
}

/// Semitone distance above a chord root.
///
/// Variants are ordered by size, so sets of intervals iterate low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Interval {
    MinorSecond = 1,
    MajorSecond = 2,
    MinorThird = 3,
    MajorThird = 4,
    PerfectFourth = 5,
    Tritone = 6,
    PerfectFifth = 7,
    MinorSixth = 8,
    MajorSixth = 9,
    MinorSeventh = 10,
    MajorSeventh = 11,
}

impl Interval {
    pub fn semitones(self) -> u8 {
        self as u8
    }
}

/// An open string: its pitch class and octave, e.g. `E2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningEntry {
    pitch_class: PitchClass,
    /// Absolute pitch of the open string, C4 = 48.
    pitch: i32,
}

impl TuningEntry {
    /// The open string `pitch_class` in `octave`, e.g. E in octave 2.
    pub const fn new(pitch_class: PitchClass, octave: u8) -> Self {
        TuningEntry {
            pitch_class,
            pitch: C4 + (octave as i32 - 4) * SEMITONES as i32 + pitch_class.0 as i32,
        }
    }

    /// Pitch class sounding at `fret`.
    pub fn pitch_class_at(&self, fret: u8) -> PitchClass {
        self.pitch_class.add(fret)
    }

    /// Absolute pitch sounding at `fret`.
    pub fn pitch_at(&self, fret: u8) -> i32 {
        self.pitch + fret as i32
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.pitch_class
    }
}

impl FromStr for TuningEntry {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SearchError::InvalidTuning(s.to_string());

        let mut chars = s.chars();
        let letter = chars.next().and_then(letter_offset).ok_or_else(invalid)?;
        let rest = chars.as_str();
        let digits_at = rest
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (accidentals, octave) = rest.split_at(digits_at);
        let accidentals = accidental_offset(accidentals).ok_or_else(invalid)?;
        // Exactly one octave digit.
        let octave = match octave.as_bytes() {
            &[digit] if digit.is_ascii_digit() => (digit - b'0') as i32,
            _ => return Err(invalid()),
        };

        // Accidentals may cross an octave boundary (B#3 is C4), so the
        // absolute pitch is built from the unwrapped offset.
        let offset = letter as i32 + accidentals;
        Ok(TuningEntry {
            pitch_class: PitchClass::from_offset(offset),
            pitch: C4 + (octave - 4) * SEMITONES as i32 + offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(token: &str) -> PitchClass {
        PitchClass::normalize(token).unwrap()
    }

    #[test]
    fn sharps_and_flats_share_one_spelling() {
        assert_eq!(pc("C#").name(), "C#");
        assert_eq!(pc("Db"), pc("C#"));
        assert_eq!(pc("Bb").name(), "A#");
        assert_eq!(pc("e").name(), "E");
        assert_eq!(pc("bb").name(), "A#");
    }

    #[test]
    fn accidentals_wrap_around_the_octave() {
        assert_eq!(pc("Cb").name(), "B");
        assert_eq!(pc("B#").name(), "C");
        assert_eq!(pc("Ebb").name(), "D");
        assert_eq!(pc("F#b#").name(), "F#");
    }

    #[test]
    fn rejects_bad_letters_and_accidentals() {
        for token in ["", "H", "C2", "Cx", "#"] {
            assert_eq!(
                PitchClass::normalize(token),
                Err(SearchError::InvalidNote(token.to_string()))
            );
        }
    }

    #[test]
    fn addition_is_modulo_twelve() {
        assert_eq!(pc("G").add(4).name(), "B");
        assert_eq!(pc("G").add_interval(Interval::MinorSeventh).name(), "F");
        assert_eq!(pc("B").add(25).name(), "C");
    }

    #[test]
    fn tuning_entries_resolve_absolute_pitch() {
        let e2: TuningEntry = "E2".parse().unwrap();
        assert_eq!(e2.pitch_at(0), 28);
        assert_eq!(e2.pitch_at(3), 31);
        assert_eq!(e2.pitch_class_at(3).name(), "G");

        let c4: TuningEntry = "C4".parse().unwrap();
        assert_eq!(c4.pitch_at(0), 48);

        let b_sharp: TuningEntry = "B#3".parse().unwrap();
        assert_eq!(b_sharp.pitch_at(0), 48);
        assert_eq!(b_sharp.pitch_class().name(), "C");
    }

    #[test]
    fn built_entries_match_parsed_ones() {
        let e2 = TuningEntry::new(PitchClass::new(4), 2);
        assert_eq!("E2".parse::<TuningEntry>(), Ok(e2));
        assert_eq!(TuningEntry::new(PitchClass::new(0), 4).pitch_at(0), 48);
        assert_eq!(TuningEntry::new(PitchClass::new(11), 0).pitch_at(0), 11);
    }

    #[test]
    fn malformed_tuning_entries_fail() {
        for token in ["H2", "E", "Ex2", "E2b", "", "2", "E10", "E999999999"] {
            assert_eq!(
                token.parse::<TuningEntry>(),
                Err(SearchError::InvalidTuning(token.to_string()))
            );
        }
    }
}
