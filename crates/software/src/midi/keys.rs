use super::DATA_MASK;

const SEMITONES_PER_OCTAVE: u8 = 12;

/// Determines whether a MIDI note number falls on a white key.
///
/// Below F the white keys (C, D, E) sit on even pitch classes; from F upward the pattern flips and F, G, A and B sit
/// on odd ones.
pub const fn is_white_key(note: u8) -> bool {
    let pitch_class = (note & DATA_MASK) % SEMITONES_PER_OCTAVE;
    if pitch_class > 4 {
        pitch_class % 2 == 1
    } else {
        pitch_class % 2 == 0
    }
}
