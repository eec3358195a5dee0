//! Chord-name grammar.
//!
//! A chord name is read left to right as
//!
//! ```text
//! root [quality] [extension] [suspension] [alteration]
//! ```
//!
//! with optional whitespace between the parts. Each part is a small matcher
//! that offers its candidate readings in preference order (longer
//! alternatives after shorter ones, "absent" last). The parser takes the first
//! combination that consumes the whole input, so `Cb5` reads as C with a
//! flat fifth while `Cb9` reads as a C-flat ninth chord.
//!
//! Diminished sevenths follow the spelling of the quality token: `dim7` and
//! `o7` are diminished sevenths, `07` is half-diminished. This is a heuristic
//! on the written symbol, not on harmonic intent.

use std::collections::BTreeSet;

use crate::pitch::{Interval, PitchClass};

const QUALITIES: &[&str] = &[
    "ma", "maj", "major", "m", "-", "mi", "min", "minor", "aug", "augmented", "+", "dim",
    "diminished", "o", "O", "0",
];

const EXTENSIONS: &[&str] = &[
    "seven", "seventh", "7", "7th", "nine", "ninth", "9", "9th", "eleven", "eleventh", "11",
    "11th", "thirteen", "thirteenth", "13", "13th", "sixth", "six", "6", "6th",
];

const ALTERATIONS: &[&str] = &["#5", "b5", "#9", "b9", "#11"];

/// The tokens a chord name was split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordSymbol<'a> {
    pub root: &'a str,
    pub quality: Option<&'a str>,
    pub extension: Option<&'a str>,
    pub suspension: Option<&'a str>,
    pub alteration: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Major,
    Minor,
    Augmented,
    Diminished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Sixth,
    Seventh,
    Ninth,
    Eleventh,
    Thirteenth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspension {
    Second,
    Fourth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alteration {
    FlatFive,
    SharpFive,
    SharpNine,
    FlatNine,
    SharpEleven,
}

/// Intervals above the root a chord must or may contain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordIntervals {
    pub required: BTreeSet<Interval>,
    pub optional: BTreeSet<Interval>,
}

/// A parsed chord name: its root and the notes it must or may contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChord {
    pub root: PitchClass,
    /// Root first, then each required interval from the root, low to high.
    pub required: Vec<PitchClass>,
    pub optional: Vec<PitchClass>,
}

/// Parses a chord name such as `G7`, `Bbm7b5` or `D sus4`.
///
/// Returns `None` when the input is not a chord name.
pub fn parse_chord_name(name: &str) -> Option<ParsedChord> {
    let symbol = ChordSymbol::parse(name)?;
    let root = PitchClass::normalize(symbol.root).ok()?;
    let intervals = symbol.intervals();

    let mut required = vec![root];
    required.extend(intervals.required.iter().map(|&i| root.add_interval(i)));
    let optional = intervals.optional.iter().map(|&i| root.add_interval(i)).collect();

    Some(ParsedChord {
        root,
        required,
        optional,
    })
}

impl<'a> ChordSymbol<'a> {
    /// Splits a chord name into its tokens, backtracking over alternative
    /// readings until one consumes the whole input.
    pub fn parse(name: &'a str) -> Option<Self> {
        root(name.trim_start()).into_iter().find_map(|(root, rest)| {
            optional(rest, QUALITIES).into_iter().find_map(|(quality, rest)| {
                optional(rest, EXTENSIONS).into_iter().find_map(|(extension, rest)| {
                    suspension(rest).into_iter().find_map(|(suspension, rest)| {
                        optional(rest, ALTERATIONS).into_iter().find_map(|(alteration, rest)| {
                            rest.is_empty().then_some(ChordSymbol {
                                root,
                                quality,
                                extension,
                                suspension,
                                alteration,
                            })
                        })
                    })
                })
            })
        })
    }

    pub fn quality(&self) -> Quality {
        match self.quality {
            None => Quality::Major,
            Some(q) if q.starts_with("ma") => Quality::Major,
            Some(q) if q == "-" || q == "m" || q.starts_with("mi") => Quality::Minor,
            Some(q) if q.starts_with("aug") || q == "+" => Quality::Augmented,
            Some(_) => Quality::Diminished,
        }
    }

    pub fn extension(&self) -> Option<Extension> {
        let ext = self.extension?;
        let starts = |a: &str, b: &str| ext.starts_with(a) || ext.starts_with(b);
        if starts("se", "7") {
            Some(Extension::Seventh)
        } else if starts("si", "6") {
            Some(Extension::Sixth)
        } else if starts("ni", "9") {
            Some(Extension::Ninth)
        } else if starts("el", "11") {
            Some(Extension::Eleventh)
        } else {
            Some(Extension::Thirteenth)
        }
    }

    pub fn suspension(&self) -> Option<Suspension> {
        self.suspension.map(|s| {
            if s == "sus2" {
                Suspension::Second
            } else {
                Suspension::Fourth
            }
        })
    }

    pub fn alteration(&self) -> Option<Alteration> {
        self.alteration.map(|a| match a {
            "b5" => Alteration::FlatFive,
            "#5" => Alteration::SharpFive,
            "#9" => Alteration::SharpNine,
            "b9" => Alteration::FlatNine,
            _ => Alteration::SharpEleven,
        })
    }

    /// Applies quality, extension, suspension and alteration in that order.
    pub fn intervals(&self) -> ChordIntervals {
        let mut chord = ChordIntervals::default();
        chord.apply_quality(self.quality());
        if let Some(extension) = self.extension() {
            chord.apply_extension(extension, self);
        }
        if let Some(suspension) = self.suspension() {
            chord.apply_suspension(suspension);
        }
        if let Some(alteration) = self.alteration() {
            chord.apply_alteration(alteration);
        }
        chord
    }

    fn seventh(&self) -> Interval {
        match self.quality {
            Some(q) if q.starts_with("ma") => Interval::MajorSeventh,
            Some(q) if self.quality() == Quality::Diminished && q != "0" => Interval::MajorSixth,
            _ => Interval::MinorSeventh,
        }
    }
}

impl ChordIntervals {
    fn apply_quality(&mut self, quality: Quality) {
        use Interval::*;
        match quality {
            Quality::Major => {
                self.required.insert(MajorThird);
                self.optional.insert(PerfectFifth);
            }
            Quality::Minor => {
                self.required.insert(MinorThird);
                self.optional.insert(PerfectFifth);
            }
            Quality::Augmented => {
                self.required.extend([MajorThird, MinorSixth]);
            }
            Quality::Diminished => {
                self.required.extend([MinorThird, Tritone]);
            }
        }
    }

    fn apply_extension(&mut self, extension: Extension, symbol: &ChordSymbol<'_>) {
        use Interval::*;
        match extension {
            // No minor sixth chords.
            Extension::Sixth => {
                self.required.insert(MajorSixth);
            }
            Extension::Seventh => {
                self.required.insert(symbol.seventh());
            }
            Extension::Ninth => {
                self.required.extend([symbol.seventh(), MajorSecond]);
            }
            Extension::Eleventh => {
                self.required
                    .extend([symbol.seventh(), MajorSecond, PerfectFourth]);
                for third in [MajorThird, MinorThird] {
                    if self.required.remove(&third) {
                        self.optional.insert(third);
                    }
                }
            }
            Extension::Thirteenth => {
                self.required
                    .extend([symbol.seventh(), MajorSecond, MajorSixth]);
            }
        }
    }

    fn apply_suspension(&mut self, suspension: Suspension) {
        self.required.remove(&Interval::MajorThird);
        self.required.remove(&Interval::MinorThird);
        self.required.insert(match suspension {
            Suspension::Second => Interval::MajorSecond,
            Suspension::Fourth => Interval::PerfectFourth,
        });
    }

    fn apply_alteration(&mut self, alteration: Alteration) {
        use Interval::*;
        match alteration {
            Alteration::FlatFive => {
                self.optional.remove(&PerfectFifth);
                self.required.insert(Tritone);
            }
            Alteration::SharpFive => {
                self.optional.remove(&PerfectFifth);
                self.required.insert(MinorSixth);
            }
            Alteration::SharpNine => {
                self.required.insert(MinorThird);
            }
            Alteration::FlatNine => {
                self.required.insert(MinorSecond);
            }
            Alteration::SharpEleven => {
                self.required.insert(Tritone);
            }
        }
    }
}

type Candidate<'a> = (Option<&'a str>, &'a str);

/// A letter with an optional single accidental, accidental reading first.
fn root(input: &str) -> Vec<(&str, &str)> {
    let mut candidates = vec![];
    let Some(letter) = input.chars().next() else {
        return candidates;
    };
    if !matches!(letter, 'A'..='G' | 'a'..='g') {
        return candidates;
    }
    if matches!(input[1..].chars().next(), Some('#' | 'b')) {
        candidates.push((&input[..2], input[2..].trim_start()));
    }
    candidates.push((&input[..1], input[1..].trim_start()));
    candidates
}

/// Every listed token that prefixes `input`, in list order, then "absent".
fn optional<'a>(input: &'a str, tokens: &[&str]) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = tokens
        .iter()
        .filter(|token| input.starts_with(**token))
        .map(|token| {
            let (matched, rest) = input.split_at(token.len());
            (Some(matched), rest.trim_start())
        })
        .collect();
    candidates.push((None, input));
    candidates
}

/// `sus`, then `sus2` and `sus4` with at most one whitespace before the digit.
fn suspension(input: &str) -> Vec<Candidate<'_>> {
    let mut candidates = vec![];
    if let Some(after) = input.strip_prefix("sus") {
        candidates.push((Some(&input[..3]), after.trim_start()));
        let space = after
            .chars()
            .next()
            .filter(|c| c.is_whitespace())
            .map(char::len_utf8);
        for digit in ['2', '4'] {
            for gap in space.into_iter().chain([0]) {
                if after[gap..].starts_with(digit) {
                    let end = 3 + gap + 1;
                    candidates.push((Some(&input[..end]), input[end..].trim_start()));
                }
            }
        }
    }
    candidates.push((None, input));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(notes: &[PitchClass]) -> Vec<&'static str> {
        notes.iter().map(|n| n.name()).collect()
    }

    fn chord(name: &str) -> (Vec<&'static str>, Vec<&'static str>) {
        let parsed = parse_chord_name(name).unwrap_or_else(|| panic!("`{name}` should parse"));
        (names(&parsed.required), names(&parsed.optional))
    }

    fn intervals(name: &str) -> ChordIntervals {
        ChordSymbol::parse(name).unwrap().intervals()
    }

    fn set(intervals: &[Interval]) -> BTreeSet<Interval> {
        intervals.iter().copied().collect()
    }

    #[test]
    fn triads() {
        assert_eq!(chord("G"), (vec!["G", "B"], vec!["D"]));
        assert_eq!(chord("Am"), (vec!["A", "C"], vec!["E"]));
        assert_eq!(chord("C-"), (vec!["C", "D#"], vec!["G"]));
        assert_eq!(chord("Caug"), (vec!["C", "E", "G#"], vec![]));
        assert_eq!(chord("C+"), (vec!["C", "E", "G#"], vec![]));
        assert_eq!(chord("Cdim"), (vec!["C", "D#", "F#"], vec![]));
        assert_eq!(chord("Co"), (vec!["C", "D#", "F#"], vec![]));
    }

    #[test]
    fn root_is_case_corrected_and_flats_resolved() {
        assert_eq!(chord("g"), (vec!["G", "B"], vec!["D"]));
        assert_eq!(chord("Bb"), (vec!["A#", "D"], vec!["F"]));
        assert_eq!(chord("f#m"), (vec!["F#", "A"], vec!["C#"]));
    }

    #[test]
    fn sevenths_follow_the_quality_token() {
        assert_eq!(chord("G7"), (vec!["G", "B", "F"], vec!["D"]));
        assert_eq!(chord("Cmaj7"), (vec!["C", "E", "B"], vec!["G"]));
        assert_eq!(chord("Cmajor seventh"), (vec!["C", "E", "B"], vec!["G"]));
        assert_eq!(chord("Dm7"), (vec!["D", "F", "C"], vec!["A"]));
        assert_eq!(chord("Dmin7"), (vec!["D", "F", "C"], vec!["A"]));
    }

    #[test]
    fn diminished_seventh_depends_on_spelling() {
        assert_eq!(chord("Cdim7"), (vec!["C", "D#", "F#", "A"], vec![]));
        assert_eq!(chord("Co7"), (vec!["C", "D#", "F#", "A"], vec![]));
        assert_eq!(chord("C07"), (vec!["C", "D#", "F#", "A#"], vec![]));
    }

    #[test]
    fn sixths_and_upper_extensions() {
        use Interval::*;
        assert_eq!(intervals("C6").required, set(&[MajorThird, MajorSixth]));
        assert_eq!(intervals("Cm6").required, set(&[MinorThird, MajorSixth]));
        assert_eq!(
            intervals("C9").required,
            set(&[MajorSecond, MajorThird, MinorSeventh])
        );
        assert_eq!(
            intervals("C13").required,
            set(&[MajorSecond, MajorThird, MajorSixth, MinorSeventh])
        );
        assert_eq!(
            intervals("Cmaj9").required,
            set(&[MajorSecond, MajorThird, MajorSeventh])
        );
    }

    #[test]
    fn eleventh_demotes_the_third() {
        use Interval::*;
        let major = intervals("C11");
        assert_eq!(
            major.required,
            set(&[MajorSecond, PerfectFourth, MinorSeventh])
        );
        assert_eq!(major.optional, set(&[MajorThird, PerfectFifth]));

        let minor = intervals("Cm11");
        assert_eq!(minor.optional, set(&[MinorThird, PerfectFifth]));
    }

    #[test]
    fn suspensions_replace_the_third() {
        assert_eq!(chord("Dsus2"), (vec!["D", "E"], vec!["A"]));
        assert_eq!(chord("Dsus4"), (vec!["D", "G"], vec!["A"]));
        assert_eq!(chord("Dsus"), (vec!["D", "G"], vec!["A"]));
        assert_eq!(chord("D sus2"), (vec!["D", "E"], vec!["A"]));
        assert_eq!(chord("G7sus4"), (vec!["G", "C", "F"], vec!["D"]));
    }

    #[test]
    fn spaced_sus_two_reads_as_sus_four() {
        let symbol = ChordSymbol::parse("D sus 2").unwrap();
        assert_eq!(symbol.suspension, Some("sus 2"));
        assert_eq!(symbol.suspension(), Some(Suspension::Fourth));
        assert_eq!(chord("D sus 2"), (vec!["D", "G"], vec!["A"]));
    }

    #[test]
    fn alterations() {
        use Interval::*;
        let flat_five = intervals("Cm7b5");
        assert_eq!(flat_five.required, set(&[MinorThird, Tritone, MinorSeventh]));
        assert!(flat_five.optional.is_empty());

        let sharp_five = intervals("C7#5");
        assert_eq!(
            sharp_five.required,
            set(&[MajorThird, MinorSixth, MinorSeventh])
        );
        assert!(sharp_five.optional.is_empty());

        assert!(intervals("C7#9").required.contains(&MinorThird));
        assert!(intervals("C7b9").required.contains(&MinorSecond));
        assert!(intervals("C9#11").required.contains(&Tritone));
    }

    #[test]
    fn backtracks_between_flat_root_and_flat_alteration() {
        let flat_five = ChordSymbol::parse("Cb5").unwrap();
        assert_eq!(flat_five.root, "C");
        assert_eq!(flat_five.alteration(), Some(Alteration::FlatFive));

        let flat_root = ChordSymbol::parse("Cb9").unwrap();
        assert_eq!(flat_root.root, "Cb");
        assert_eq!(flat_root.extension(), Some(Extension::Ninth));
    }

    #[test]
    fn longer_tokens_are_tried_after_shorter_ones_fail() {
        let symbol = ChordSymbol::parse("Cmajor7th").unwrap();
        assert_eq!(symbol.quality, Some("major"));
        assert_eq!(symbol.extension, Some("7th"));
        assert_eq!(symbol.quality(), Quality::Major);
        assert_eq!(symbol.extension(), Some(Extension::Seventh));
    }

    #[test]
    fn whitespace_between_parts_is_allowed() {
        assert_eq!(chord("  G 7  "), chord("G7"));
        assert_eq!(chord("C m 7 b5"), chord("Cm7b5"));
    }

    #[test]
    fn non_chords_do_not_parse() {
        for name in ["", "H", "G B D", "C#m7b5x", "Cmaj7 G", "'G", "Cmin minor"] {
            assert_eq!(parse_chord_name(name), None, "`{name}`");
        }
    }
}
