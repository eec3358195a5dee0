use std::fmt::Display;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::config::Tuning;
use crate::pitch::PitchClass;

/// One fret per string, lowest string first; `None` is a muted string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Voicing {
    frets: Vec<Option<u8>>,
}

impl Voicing {
    pub fn new(frets: Vec<Option<u8>>) -> Self {
        Voicing { frets }
    }

    pub fn frets(&self) -> &[Option<u8>] {
        &self.frets
    }

    /// Frets of the strings that sound, open strings included.
    pub fn sounding(&self) -> impl Iterator<Item = u8> + '_ {
        self.frets.iter().flatten().copied()
    }

    /// Frets that need a finger.
    pub fn fretted(&self) -> impl Iterator<Item = u8> + '_ {
        self.sounding().filter(|&f| f > 0)
    }

    pub fn contains(&self, fret: u8) -> bool {
        self.frets.contains(&Some(fret))
    }

    /// The same voicing with `string` muted.
    pub fn muted(&self, string: usize) -> Self {
        let mut frets = self.frets.clone();
        frets[string] = None;
        Voicing { frets }
    }

    /// Lowest sounding fret, 0 if nothing sounds.
    pub fn base_fret(&self) -> u8 {
        self.sounding().min().unwrap_or(0)
    }

    /// Pitch class of each string under `tuning`.
    pub fn note_names(&self, tuning: &Tuning) -> Vec<Option<PitchClass>> {
        self.frets
            .iter()
            .zip(tuning.entries())
            .map(|(fret, entry)| fret.map(|f| entry.pitch_class_at(f)))
            .collect()
    }

    /// Absolute pitch of each string under `tuning`, C4 = 48.
    pub fn pitches(&self, tuning: &Tuning) -> Vec<Option<i32>> {
        self.frets
            .iter()
            .zip(tuning.entries())
            .map(|(fret, entry)| fret.map(|f| entry.pitch_at(f)))
            .collect()
    }

    /// How hard the shape is to play; lower is easier.
    ///
    /// Muting low strings is cheap, muting inner or high strings is not.
    /// A shape with more than three fretted strings is treated as barred at
    /// its lowest fret.
    pub fn difficulty(&self) -> OrderedFloat<f32> {
        let muted = self.frets.iter().filter(|f| f.is_none()).count();
        let low_muted = self.frets.iter().take_while(|f| f.is_none()).count();
        let mute_fine = low_muted as f32 * 0.3 + (muted - low_muted) as f32 * 1.2;

        let fretted: Vec<u8> = self.fretted().collect();
        let (Some(&lowest), Some(&highest)) = (fretted.iter().min(), fretted.iter().max()) else {
            return OrderedFloat(mute_fine);
        };

        let open_low = self
            .frets
            .iter()
            .skip(low_muted)
            .take_while(|&&f| f == Some(0))
            .count();

        let barre = if fretted.len() > 3 { lowest } else { 0 };
        let held = if barre > 0 {
            fretted.iter().filter(|&&f| f > barre).count()
        } else {
            fretted.len()
        };

        let mut stretch_fine = (highest - lowest).saturating_sub(2) as f32 * 0.2;
        if barre > 0 {
            stretch_fine *= 2.0;
        }
        let barre_fine = match barre {
            0 => 0.0,
            1 => 0.5,
            b => 0.3 + 0.05 * b as f32,
        };
        let open_under_barre_fine = if barre > 0 && open_low > 0 { 0.3 } else { 0.0 };
        let position_fine = lowest as f32 * 0.08;
        let hold_fine = if barre == 0 {
            held.saturating_sub(2) as f32 * 0.1
        } else {
            held.saturating_sub(1) as f32 * 0.2
        };

        OrderedFloat(
            mute_fine + stretch_fine + barre_fine + open_under_barre_fine + position_fine + hold_fine,
        )
    }
}

impl Display for Voicing {
    /// `320003`, or `10, 12, x, ...` once any fret has two digits.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbols: Vec<String> = self
            .frets
            .iter()
            .map(|t| match t {
                Some(t) => t.to_string(),
                None => "x".to_string(),
            })
            .collect();
        if self.frets.iter().flatten().all(|&t| t < 10) {
            write!(f, "{}", symbols.concat())
        } else {
            write!(f, "{}", symbols.join(", "))
        }
    }
}

/// A voicing with everything derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicingResult {
    pub strings: Voicing,
    /// Absolute pitch per string, `None` where muted.
    pub notes: Vec<Option<i32>>,
    pub note_names: Vec<Option<PitchClass>>,
    pub base_fret: u8,
    pub difficulty: OrderedFloat<f32>,
}

impl VoicingResult {
    pub fn assemble(voicing: Voicing, tuning: &Tuning) -> Self {
        VoicingResult {
            notes: voicing.pitches(tuning),
            note_names: voicing.note_names(tuning),
            base_fret: voicing.base_fret(),
            difficulty: voicing.difficulty(),
            strings: voicing,
        }
    }
}

impl Display for VoicingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .note_names
            .iter()
            .map(|n| n.map_or("x", PitchClass::name))
            .collect();
        write!(f, "{}  [{}]", self.strings, names.join(" "))
    }
}

/// Orders results from easiest to hardest, keeping search order among ties.
pub fn rank(results: &mut [VoicingResult]) {
    results.sort_by_key(|r| r.difficulty);
}
