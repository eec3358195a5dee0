//! Fret-window search.
//!
//! The neck is scanned one window of `max_span` frets at a time. A window is
//! only searched if some string has a usable fret exactly at its start, and
//! only voicings using that start fret are kept from it, so every voicing is
//! attributed to exactly one window.

use log::{debug, trace};

use crate::config::SearchOptions;
use crate::error::SearchError;
use crate::pitch::PitchClass;
use crate::practical::practical_variants;
use crate::query::ChordConstraint;
use crate::voicing::{Voicing, VoicingResult};

/// Frets, per string, whose note the constraint allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FretTable {
    frets: Vec<Vec<u8>>,
}

impl FretTable {
    pub fn build(constraint: &ChordConstraint, options: &SearchOptions) -> Self {
        let frets = options
            .tuning
            .entries()
            .iter()
            .map(|entry| {
                (0..=options.max_fret)
                    .filter(|&fret| constraint.allows(entry.pitch_class_at(fret)))
                    .collect()
            })
            .collect();
        FretTable { frets }
    }

    /// Usable frets of `string`, ascending.
    pub fn frets(&self, string: usize) -> &[u8] {
        &self.frets[string]
    }

    /// The usable frets within `start..start + span`, or `None` when no
    /// string can play `start` itself.
    pub fn window(&self, start: u8, span: u8) -> Option<Window> {
        let end = start.saturating_add(span);
        let frets: Vec<Vec<u8>> = self
            .frets
            .iter()
            .map(|string| {
                string
                    .iter()
                    .copied()
                    .filter(|&fret| fret >= start && fret < end)
                    .collect()
            })
            .collect();

        frets
            .iter()
            .any(|string| string.contains(&start))
            .then_some(Window { start, frets })
    }
}

/// The usable frets of each string within one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    start: u8,
    frets: Vec<Vec<u8>>,
}

impl Window {
    pub fn start(&self) -> u8 {
        self.start
    }

    /// Every combination of one choice per string, the first string varying
    /// slowest. A string with no usable fret is muted.
    pub fn candidates(&self) -> Candidates {
        let choices = self
            .frets
            .iter()
            .map(|string| {
                if string.is_empty() {
                    vec![None]
                } else {
                    string.iter().copied().map(Some).collect()
                }
            })
            .collect();
        Candidates {
            next: Some(vec![0; self.frets.len()]),
            choices,
        }
    }
}

/// Streams the candidates of a [`Window`], one voicing at a time.
#[derive(Debug, Clone)]
pub struct Candidates {
    choices: Vec<Vec<Option<u8>>>,
    /// Index into `choices` per string, or `None` once exhausted.
    next: Option<Vec<usize>>,
}

impl Iterator for Candidates {
    type Item = Voicing;

    fn next(&mut self) -> Option<Voicing> {
        let indices = self.next.as_mut()?;
        let voicing = Voicing::new(
            indices
                .iter()
                .zip(&self.choices)
                .map(|(&i, choices)| choices[i])
                .collect(),
        );

        // Advance like an odometer, last string fastest.
        let mut string = indices.len();
        loop {
            if string == 0 {
                self.next = None;
                break;
            }
            string -= 1;
            indices[string] += 1;
            if indices[string] < self.choices[string].len() {
                break;
            }
            indices[string] = 0;
        }
        Some(voicing)
    }
}

struct Search<'a> {
    constraint: &'a ChordConstraint,
    options: &'a SearchOptions,
}

impl Search<'_> {
    fn run(&self) -> Vec<Voicing> {
        let table = FretTable::build(self.constraint, self.options);
        debug!(
            "usable frets per string: {:?}",
            (0..self.options.tuning.strings())
                .map(|s| table.frets(s).len())
                .collect::<Vec<_>>()
        );

        let mut found = vec![];
        for start in 0..self.options.max_fret {
            let Some(window) = table.window(start, self.options.max_span) else {
                continue;
            };
            let before = found.len();
            found.extend(
                window
                    .candidates()
                    .flat_map(|voicing| practical_variants(voicing, self.options))
                    .filter(|voicing| self.keeps(voicing, window.start())),
            );
            trace!("window at fret {start}: kept {}", found.len() - before);
        }

        found.dedup();
        found
    }

    fn keeps(&self, voicing: &Voicing, start: u8) -> bool {
        if !voicing.contains(start) {
            return false;
        }
        if let Some(min) = self.options.min_notes {
            if voicing.sounding().count() < min as usize {
                return false;
            }
        }
        let notes: Vec<PitchClass> = voicing
            .note_names(&self.options.tuning)
            .into_iter()
            .flatten()
            .collect();
        self.constraint.required.iter().all(|note| notes.contains(note))
    }
}

/// Every playable voicing of `constraint`, lowest window first.
///
/// Adjacent duplicates are collapsed.
pub fn find_voicings(constraint: &ChordConstraint, options: &SearchOptions) -> Vec<Voicing> {
    Search {
        constraint,
        options,
    }
    .run()
}

/// Validates the inputs, searches and assembles the results.
pub fn search(
    constraint: &ChordConstraint,
    options: &SearchOptions,
) -> Result<Vec<VoicingResult>, SearchError> {
    if constraint.is_empty() {
        return Err(SearchError::MissingConstraint);
    }
    options.validate()?;

    let voicings = find_voicings(constraint, options);
    debug!("found {} voicings", voicings.len());
    Ok(voicings
        .into_iter()
        .map(|voicing| VoicingResult::assemble(voicing, &options.tuning))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::normalize_query;

    fn table(query: &str) -> FretTable {
        FretTable::build(&normalize_query(query).unwrap(), &SearchOptions::default())
    }

    #[test]
    fn table_lists_allowed_frets_per_string() {
        let table = table("G");
        assert_eq!(table.frets(0), [3, 7, 10]);
        assert_eq!(table.frets(1), [2, 5, 10]);
        assert_eq!(table.frets(2), [0, 5, 9, 12]);
        assert_eq!(table.frets(3), [0, 4, 7, 12]);
        assert_eq!(table.frets(4), [0, 3, 8, 12]);
        assert_eq!(table.frets(5), [3, 7, 10]);
    }

    #[test]
    fn windows_need_their_start_fret() {
        let table = table("G");
        assert!(table.window(1, 4).is_none());
        assert!(table.window(6, 4).is_none());

        let window = table.window(0, 4).unwrap();
        assert_eq!(
            window.frets,
            vec![vec![3], vec![2], vec![0], vec![0], vec![0, 3], vec![3]]
        );
    }

    #[test]
    fn window_reaches_the_last_fret() {
        let window = table("G").window(10, 4).unwrap();
        assert_eq!(
            window.frets,
            vec![vec![10], vec![10], vec![12], vec![12], vec![12], vec![10]]
        );
    }

    #[test]
    fn candidates_mute_empty_strings_and_vary_the_last_string_fastest() {
        let window = Window {
            start: 0,
            frets: vec![vec![0, 1], vec![], vec![2, 3]],
        };
        let candidates: Vec<String> = window.candidates().map(|v| v.to_string()).collect();
        assert_eq!(candidates, ["0x2", "0x3", "1x2", "1x3"]);
    }

    #[test]
    fn all_muted_window_yields_one_candidate() {
        let window = Window {
            start: 0,
            frets: vec![vec![], vec![]],
        };
        assert_eq!(
            window.candidates().collect::<Vec<_>>(),
            vec![Voicing::new(vec![None, None])]
        );
    }

    #[test]
    fn candidates_are_produced_lazily() {
        let window = Window {
            start: 0,
            frets: vec![vec![0, 1, 2, 3]; 6],
        };
        let mut candidates = window.candidates();
        assert_eq!(candidates.next().unwrap().to_string(), "000000");
        assert_eq!(candidates.next().unwrap().to_string(), "000001");
        assert_eq!(candidates.nth(2).unwrap().to_string(), "000010");
        assert_eq!(candidates.count(), (1 << 12) - 5);
    }

    #[test]
    fn open_g_is_found_first() {
        let constraint = normalize_query("G").unwrap();
        let voicings = find_voicings(&constraint, &SearchOptions::default());
        assert_eq!(voicings[0].to_string(), "320003");
        assert_eq!(voicings[1].to_string(), "320033");
    }

    #[test]
    fn min_notes_drops_thin_voicings() {
        let constraint = normalize_query("'G").unwrap();
        let loose = SearchOptions::default();
        let strict = SearchOptions::builder().min_notes(3).build().unwrap();

        let loose = find_voicings(&constraint, &loose);
        let strict = find_voicings(&constraint, &strict);
        assert!(loose.len() > strict.len());
        assert!(strict.iter().all(|v| v.sounding().count() >= 3));
        assert!(loose.iter().any(|v| v.sounding().count() < 3));
    }

    #[test]
    fn single_note_keeps_thin_voicings_by_default() {
        let constraint = normalize_query("'G").unwrap();
        let voicings: Vec<String> = find_voicings(&constraint, &SearchOptions::default())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            voicings,
            [
                "3xx0x3",
                "3x5xx3",
                "xx5x8x",
                "x, 10, x, x, 8, x",
                "x, 10, x, 12, x, x"
            ]
        );
    }

    #[test]
    fn rejects_empty_constraint_and_bad_options() {
        assert_eq!(
            search(&ChordConstraint::default(), &SearchOptions::default()),
            Err(SearchError::MissingConstraint)
        );

        let constraint = normalize_query("G").unwrap();
        let options = SearchOptions {
            max_span: 0,
            ..SearchOptions::default()
        };
        assert!(matches!(
            search(&constraint, &options),
            Err(SearchError::InvalidOption { arg: "max_span", .. })
        ));
    }
}
