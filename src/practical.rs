//! Whether a shape can be held with the available fingers.
//!
//! Only a single barre at the lowest fretted position is considered; shapes
//! needing a partial barre plus a second barre are rejected.

use crate::config::SearchOptions;
use crate::voicing::Voicing;

/// One finger per fretted string.
pub fn is_simple(voicing: &Voicing, max_fingers: u8) -> bool {
    voicing.fretted().count() <= max_fingers as usize
}

/// One finger barred across the lowest fretted position, one finger for
/// every higher fret.
pub fn is_bar(voicing: &Voicing, max_fingers: u8) -> bool {
    let mut fretted: Vec<u8> = vec![];
    for &fret in voicing.frets() {
        match fret {
            // A barre cannot leave a string open above its first fretted note.
            Some(0) if !fretted.is_empty() => return false,
            Some(f) if f > 0 => fretted.push(f),
            _ => {}
        }
    }
    let Some(&barre) = fretted.iter().min() else {
        return true;
    };
    let above = fretted.iter().filter(|&&f| f > barre).count();
    above < max_fingers as usize
}

pub fn is_practical(voicing: &Voicing, max_fingers: u8) -> bool {
    is_simple(voicing, max_fingers) || is_bar(voicing, max_fingers)
}

/// The voicing itself if it is practical. Otherwise, the first practical
/// variant with one of the lowest strings muted and the first with one of
/// the highest strings muted, each tried against the unmodified voicing.
pub fn practical_variants(voicing: Voicing, options: &SearchOptions) -> Vec<Voicing> {
    let fingers = options.max_fingers;
    if is_practical(&voicing, fingers) {
        return vec![voicing];
    }

    let strings = voicing.frets().len();
    let to_drop = options.strings_to_drop.min(strings);
    let low = (0..to_drop)
        .map(|string| voicing.muted(string))
        .find(|v| is_practical(v, fingers));
    let high = (strings - to_drop..strings)
        .rev()
        .map(|string| voicing.muted(string))
        .find(|v| is_practical(v, fingers));

    low.into_iter().chain(high).collect()
}
