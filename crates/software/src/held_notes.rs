//! Provides a struct [`HeldNotes`] for keeping track of which keys are down, based on the events the parser emits.
//! A note is held from its Note On until the matching Note Off (same channel, same note number).

use crate::midi::{NoteEvent, NoteRecord};
use tinyvec::{ArrayVec, array_vec};
use wmidi::{Note, U7};

/// Maximum number of notes tracked at once. Presses beyond this are ignored.
pub const MAX_HELD_NOTES: usize = 16;

/// A key that is currently down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldNote {
    /// Zero-based MIDI channel.
    pub channel: u8,
    /// MIDI note number.
    pub note: u8,
}

impl HeldNote {
    /// Returns the held note as a [`Note`].
    pub fn note(&self) -> Note {
        Note::from(U7::from_u8_lossy(self.note))
    }
}

impl From<&NoteRecord> for HeldNote {
    fn from(record: &NoteRecord) -> Self {
        Self {
            channel: record.channel,
            note: record.note,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HeldNote {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} (ch {})", self.note().to_str(), self.channel);
    }
}

/// An ordered, fixed-capacity set of [`HeldNote`]s, oldest first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeldNotes {
    data: ArrayVec<[HeldNote; MAX_HELD_NOTES]>,
}

#[cfg(feature = "defmt")]
impl defmt::Format for HeldNotes {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "HeldNotes {{ data: [");
        for (i, note) in self.data.iter().enumerate() {
            if i == 0 {
                defmt::write!(fmt, " ");
            } else {
                defmt::write!(fmt, ", ");
            }
            defmt::write!(fmt, "{}", note);
        }
        defmt::write!(fmt, " ] }}");
    }
}

impl HeldNotes {
    /// Construct an empty `HeldNotes`.
    pub fn new() -> Self {
        Self { data: array_vec!() }
    }

    /// Updates the set from a parsed event: Note On presses, Note Off releases, anything else is ignored.
    pub fn apply(&mut self, event: NoteEvent, record: &NoteRecord) {
        match event {
            NoteEvent::NoteOn => self.press(record.into()),
            NoteEvent::NoteOff => self.release(record.into()),
            NoteEvent::None => {}
        }
    }

    /// Marks a note as held. Ignored if already held or if the set is full.
    pub fn press(&mut self, note: HeldNote) {
        if self.data.len() != self.data.capacity() && !self.data.contains(&note) {
            self.data.push(note);
        }
    }

    /// Marks a note as released.
    pub fn release(&mut self, note: HeldNote) {
        self.data.retain(|&n| n != note);
    }

    /// Releases everything, e.g. after an All Notes Off.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Determine if any notes are held.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of held notes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns the most recently pressed note that is still held.
    pub fn last(&self) -> Option<HeldNote> {
        self.data.last().copied()
    }

    /// Returns an [`Iterator`] over the held notes in the order they were pressed.
    pub fn iter(&self) -> impl Iterator<Item = HeldNote> + '_ {
        self.data.iter().copied()
    }
}
